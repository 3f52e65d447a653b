use serde::{Deserialize, Serialize};

use super::Timecode;
use crate::text::tokenize;

/// One parsed transcript unit: a timestamp range, an optional speaker label,
/// and the spoken text. Immutable once parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Start of the timestamp range
    pub start: Timecode,
    /// End of the timestamp range
    pub end: Timecode,
    /// Speaker label, if the source line carried one
    pub speaker: Option<String>,
    /// Whitespace-normalized text of the segment
    pub text: String,
}

impl Segment {
    pub fn new(start: Timecode, end: Timecode, speaker: Option<String>, text: String) -> Self {
        Self {
            start,
            end,
            speaker,
            text,
        }
    }

    /// Number of words in this segment, under the shared tokenization rule
    pub fn word_count(&self) -> usize {
        tokenize(&self.text).len()
    }

    /// Whether the trimmed text is fully wrapped in parentheses, e.g. a
    /// crowd reaction like "(Audience Laughing)"
    pub fn is_parenthetical(&self) -> bool {
        let text = self.text.trim();
        text.len() >= 2 && text.starts_with('(') && text.ends_with(')')
    }
}

/// A contiguous run of same-speaker segments processed as one reformatting
/// unit. `original_text` is fixed at creation and is the ground truth for
/// fidelity verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Shared speaker label; `None` marks an unknown speaker
    pub speaker: Option<String>,
    /// Constituent segments, in input order
    pub segments: Vec<Segment>,
    /// Whitespace-joined concatenation of the segment texts
    pub original_text: String,
}

impl Chunk {
    /// Build a chunk from segments, joining their texts with single spaces
    pub fn from_segments(speaker: Option<String>, segments: Vec<Segment>) -> Self {
        let original_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            speaker,
            segments,
            original_text,
        }
    }

    /// A single unsegmented chunk for a document with no timestamp markers
    pub fn plain(text: String) -> Self {
        Self {
            speaker: None,
            segments: Vec::new(),
            original_text: text,
        }
    }

    /// Start of the chunk's time span, from its first segment
    pub fn start(&self) -> Option<Timecode> {
        self.segments.first().map(|s| s.start)
    }

    /// End of the chunk's time span, from its last segment
    pub fn end(&self) -> Option<Timecode> {
        self.segments.last().map(|s| s.end)
    }

    /// Number of words in the chunk's original text
    pub fn word_count(&self) -> usize {
        tokenize(&self.original_text).len()
    }

    /// Display label for logs and the error log
    pub fn speaker_label(&self) -> &str {
        self.speaker.as_deref().unwrap_or("(Unknown Speaker)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tc(s: &str) -> Timecode {
        s.parse().unwrap()
    }

    fn seg(speaker: Option<&str>, text: &str) -> Segment {
        Segment::new(
            tc("00:00:00:00"),
            tc("00:00:05:00"),
            speaker.map(String::from),
            text.to_string(),
        )
    }

    #[test]
    fn test_parenthetical_detection() {
        assert!(seg(None, "(Audience Laughing)").is_parenthetical());
        assert!(seg(None, "  (laughs)  ").is_parenthetical());
        assert!(!seg(None, "(half wrapped").is_parenthetical());
        assert!(!seg(None, "plain speech").is_parenthetical());
    }

    #[test]
    fn test_chunk_joins_segment_texts() {
        let chunk = Chunk::from_segments(
            Some("Alex".to_string()),
            vec![seg(Some("Alex"), "hello"), seg(Some("Alex"), "world")],
        );
        assert_eq!(chunk.original_text, "hello world");
        assert_eq!(chunk.word_count(), 2);
    }

    #[test]
    fn test_chunk_time_span() {
        let a = Segment::new(tc("01:00:00:00"), tc("01:00:05:00"), None, "a".into());
        let b = Segment::new(tc("01:00:05:00"), tc("01:00:09:00"), None, "b".into());
        let chunk = Chunk::from_segments(None, vec![a, b]);
        assert_eq!(chunk.start(), Some(tc("01:00:00:00")));
        assert_eq!(chunk.end(), Some(tc("01:00:09:00")));
    }

    #[test]
    fn test_plain_chunk_has_no_span() {
        let chunk = Chunk::plain("just text".to_string());
        assert!(chunk.start().is_none());
        assert_eq!(chunk.speaker_label(), "(Unknown Speaker)");
    }
}
