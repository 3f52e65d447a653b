use tracing::debug;

use crate::models::{Chunk, ParagraphStamp, ParagraphTimestampMap, Timecode};
use crate::text::tokenize;

/// Map the paragraphs of a chunk's accepted text back to timestamps.
///
/// Each segment of the chunk contributes a known run of original words with
/// a known start timecode. A paragraph's timestamp comes from the segment
/// whose cumulative word range contains the original word position the
/// paragraph starts at; a position landing exactly on a segment boundary
/// resolves to the earlier segment. Word positions are counted with the same
/// tokenization the verifier uses, so `USE_ORIGINAL` text lines up exactly
/// and `USE_REFORMATTED` text is length-adjacent under the decision rules.
///
/// The first paragraph is never stamped: the chunk-level speaker header
/// already carries its timestamp.
pub fn realign(chunk: &Chunk, accepted_text: &str, adjust_offset: bool) -> ParagraphTimestampMap {
    if chunk.segments.is_empty() {
        return Vec::new();
    }

    // Cumulative word-range starts per segment; range k is
    // [starts[k], starts[k] + word_count(k))
    let mut starts = Vec::with_capacity(chunk.segments.len());
    let mut total = 0usize;
    for segment in &chunk.segments {
        starts.push(total);
        total += segment.word_count();
    }

    let paragraphs = split_paragraphs(accepted_text);
    let mut map = Vec::new();
    let mut consumed = 0usize;

    for (paragraph_index, paragraph) in paragraphs.iter().enumerate() {
        if paragraph_index > 0 {
            let position = consumed.min(total);
            let segment_index = segment_at(&starts, position);
            let mut timestamp = chunk.segments[segment_index].start;
            if adjust_offset {
                timestamp = timestamp.sub_hours(1);
            }
            debug!(
                "Paragraph {} starts at word {} -> segment {} ({})",
                paragraph_index, position, segment_index, timestamp
            );
            map.push(ParagraphStamp {
                paragraph_index,
                timestamp,
            });
        }
        consumed += tokenize(paragraph).len();
    }

    map
}

/// Whether the document timeline starts near the one-hour mark and every
/// reported timecode should have one hour subtracted. Editing timelines
/// commonly begin at 01:00:00; a first segment starting in
/// [01:00:00, 01:05:00) marks the whole document for adjustment. This is a
/// single global decision, made once per document.
pub fn needs_offset_adjustment(chunks: &[Chunk]) -> bool {
    let Some(first) = chunks.iter().find_map(|c| c.start()) else {
        return false;
    };
    first.hours == 1 && first.minutes < 5
}

/// Apply the document-level offset to a chunk-level timecode
pub fn adjusted(timecode: Timecode, adjust_offset: bool) -> Timecode {
    if adjust_offset {
        timecode.sub_hours(1)
    } else {
        timecode
    }
}

/// Split text into paragraphs on blank-line boundaries
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Index of the segment whose word range contains `position`; an exact
/// boundary belongs to the earlier segment
fn segment_at(starts: &[usize], position: usize) -> usize {
    if position == 0 {
        return 0;
    }
    let mut index = 0;
    for (k, &start) in starts.iter().enumerate() {
        if start < position {
            index = k;
        } else {
            break;
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Segment;

    fn seg(start: &str, text: &str) -> Segment {
        Segment::new(
            start.parse().unwrap(),
            start.parse().unwrap(),
            Some("A".to_string()),
            text.to_string(),
        )
    }

    fn chunk() -> Chunk {
        // Word ranges: [0,3), [3,7), [7,9)
        Chunk::from_segments(
            Some("A".to_string()),
            vec![
                seg("01:00:08:15", "one two three"),
                seg("01:00:20:00", "four five six seven"),
                seg("01:00:40:00", "eight nine"),
            ],
        )
    }

    #[test]
    fn test_first_paragraph_is_never_stamped() {
        let map = realign(&chunk(), "one two three four five six seven eight nine", false);
        assert!(map.is_empty());
    }

    #[test]
    fn test_paragraphs_map_to_containing_segments() {
        let accepted = "one two three.\n\nFour five six, seven.\n\nEight nine.";
        let map = realign(&chunk(), accepted, false);
        assert_eq!(map.len(), 2);

        // Second paragraph starts at word 3, the boundary between segment 0
        // and segment 1: the earlier segment supplies the stamp
        assert_eq!(map[0].paragraph_index, 1);
        assert_eq!(map[0].timestamp, "01:00:08:15".parse().unwrap());

        // Third paragraph starts at word 7, boundary of segments 1 and 2
        assert_eq!(map[1].paragraph_index, 2);
        assert_eq!(map[1].timestamp, "01:00:20:00".parse().unwrap());
    }

    #[test]
    fn test_mid_segment_paragraph_break() {
        // Break after word 5, inside segment 1
        let accepted = "one two three four five.\n\nSix seven eight nine.";
        let map = realign(&chunk(), accepted, false);
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].timestamp, "01:00:20:00".parse().unwrap());
    }

    #[test]
    fn test_offset_adjustment_subtracts_one_hour() {
        let accepted = "one two three.\n\nFour five six seven eight nine.";
        let map = realign(&chunk(), accepted, true);
        assert_eq!(map[0].timestamp, "00:00:08:15".parse().unwrap());
    }

    #[test]
    fn test_offset_detection_window() {
        let in_window = vec![Chunk::from_segments(
            Some("A".to_string()),
            vec![seg("01:00:08:15", "hello")],
        )];
        assert!(needs_offset_adjustment(&in_window));

        let at_five = vec![Chunk::from_segments(
            Some("A".to_string()),
            vec![seg("01:05:00:00", "hello")],
        )];
        assert!(!needs_offset_adjustment(&at_five));

        let normal = vec![Chunk::from_segments(
            Some("A".to_string()),
            vec![seg("00:00:02:00", "hello")],
        )];
        assert!(!needs_offset_adjustment(&normal));

        assert!(!needs_offset_adjustment(&[Chunk::plain("text".into())]));
    }

    #[test]
    fn test_plain_chunk_yields_empty_map() {
        let chunk = Chunk::plain("no segments here".to_string());
        assert!(realign(&chunk, "no segments here", true).is_empty());
    }

    #[test]
    fn test_split_paragraphs() {
        let text = "first para\nstill first\n\n\nsecond para\n\nthird";
        let paragraphs = split_paragraphs(text);
        assert_eq!(
            paragraphs,
            vec!["first para\nstill first", "second para", "third"]
        );
    }

    #[test]
    fn test_overlong_accepted_text_clamps_to_last_segment() {
        let accepted = "one two three four five six seven eight nine extra words here.\n\nTail paragraph.";
        let map = realign(&chunk(), accepted, false);
        assert_eq!(map[0].timestamp, "01:00:40:00".parse().unwrap());
    }
}
