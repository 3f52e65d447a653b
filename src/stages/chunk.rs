use tracing::debug;

use crate::models::{Chunk, Segment};

/// Group segments into chunks at speaker-identity changes.
///
/// Consecutive segments from the same named speaker accumulate into one
/// chunk. A speakerless parenthetical segment (e.g. "(Audience Laughing)")
/// sitting between two segments of the same named speaker is absorbed into
/// that speaker's chunk, so "speaker talks, crowd reacts, speaker continues"
/// stays one utterance. Any other speakerless segment becomes its own
/// unknown-speaker chunk and is never merged.
pub fn build_chunks(segments: &[Segment]) -> Vec<Chunk> {
    if segments.is_empty() {
        return Vec::new();
    }

    // First pass: mark parenthetical interjections flanked by one speaker
    let mut absorb = vec![false; segments.len()];
    for i in 1..segments.len().saturating_sub(1) {
        let seg = &segments[i];
        let prev = &segments[i - 1];
        let next = &segments[i + 1];
        if seg.speaker.is_none()
            && seg.is_parenthetical()
            && prev.speaker.is_some()
            && prev.speaker == next.speaker
        {
            absorb[i] = true;
            debug!(
                "Absorbing interjection '{}' into chunk for {}",
                seg.text,
                prev.speaker.as_deref().unwrap_or_default()
            );
        }
    }

    // Second pass: accumulate runs, folding absorbed interjections in
    let mut chunks = Vec::new();
    let mut i = 0;
    while i < segments.len() {
        let speaker = segments[i].speaker.clone();
        let mut run = vec![segments[i].clone()];

        let mut j = i + 1;
        // Unknown-speaker segments never accumulate with their neighbors
        if speaker.is_some() {
            while j < segments.len() {
                if segments[j].speaker == speaker || absorb[j] {
                    run.push(segments[j].clone());
                    j += 1;
                } else {
                    break;
                }
            }
        }

        chunks.push(Chunk::from_segments(speaker, run));
        i = j;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timecode;

    fn seg(speaker: Option<&str>, text: &str) -> Segment {
        let tc: Timecode = "01:00:00:00".parse().unwrap();
        Segment::new(tc, tc, speaker.map(String::from), text.to_string())
    }

    #[test]
    fn test_same_speaker_runs_accumulate() {
        let chunks = build_chunks(&[
            seg(Some("A"), "one"),
            seg(Some("A"), "two"),
            seg(Some("B"), "three"),
        ]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].original_text, "one two");
        assert_eq!(chunks[1].original_text, "three");
    }

    #[test]
    fn test_interjection_absorbed_between_same_speaker() {
        let chunks = build_chunks(&[
            seg(Some("A"), "hello"),
            seg(None, "(laughs)"),
            seg(Some("A"), "world"),
        ]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].speaker.as_deref(), Some("A"));
        assert_eq!(chunks[0].original_text, "hello (laughs) world");
        assert_eq!(chunks[0].segments.len(), 3);
    }

    #[test]
    fn test_no_merge_across_different_speakers() {
        let chunks = build_chunks(&[
            seg(Some("A"), "hi"),
            seg(None, "(laughs)"),
            seg(Some("B"), "hey"),
        ]);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].speaker.as_deref(), Some("A"));
        assert_eq!(chunks[1].speaker, None);
        assert_eq!(chunks[1].speaker_label(), "(Unknown Speaker)");
        assert_eq!(chunks[2].speaker.as_deref(), Some("B"));
    }

    #[test]
    fn test_non_parenthetical_unknown_is_its_own_chunk() {
        let chunks = build_chunks(&[
            seg(Some("A"), "hello"),
            seg(None, "someone shouts"),
            seg(Some("A"), "world"),
        ]);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].speaker, None);
    }

    #[test]
    fn test_consecutive_unknown_segments_stay_separate() {
        let chunks = build_chunks(&[seg(None, "first"), seg(None, "second")]);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_interjection_at_document_edge_not_absorbed() {
        let chunks = build_chunks(&[seg(None, "(applause)"), seg(Some("A"), "thank you")]);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].speaker, None);
    }
}
