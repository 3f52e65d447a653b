use tracing::{debug, warn};

use crate::models::{Segment, Timecode, TimecodeError};

/// Result of parsing raw transcript text
#[derive(Debug, Clone)]
pub enum ParsedDocument {
    /// No timestamp markers anywhere: one unsegmented document, no speaker
    Plain(String),
    /// Timestamped, optionally speaker-tagged segments in input order
    Structured(Vec<Segment>),
}

impl ParsedDocument {
    pub fn is_plain(&self) -> bool {
        matches!(self, ParsedDocument::Plain(_))
    }

    /// Whether any segment carries a speaker label
    pub fn has_speakers(&self) -> bool {
        match self {
            ParsedDocument::Plain(_) => false,
            ParsedDocument::Structured(segments) => segments.iter().any(|s| s.speaker.is_some()),
        }
    }
}

/// How a line relates to the timestamp-marker pattern
enum LineKind {
    /// A well-formed `[start - end]` marker
    Timestamp(Timecode, Timecode),
    /// Bracketed range pattern whose fields do not parse; recoverable
    Malformed(TimecodeError),
    /// Anything else
    Text,
}

/// Parse raw transcript text into segments.
///
/// A timestamp line starts a new segment. The immediately following line is
/// the speaker label only if it is non-blank and unindented; indented lines
/// up to the next timestamp are the segment text, whitespace-normalized.
///
/// A malformed timestamp never aborts the parse: inside a segment it is
/// retained as plain text, and a document with no valid marker at all falls
/// back to `Plain`.
pub fn parse(raw: &str) -> ParsedDocument {
    let lines: Vec<&str> = raw.lines().collect();
    let mut segments = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let (start, end) = match classify_line(lines[i]) {
            LineKind::Timestamp(start, end) => (start, end),
            LineKind::Malformed(err) => {
                // No enclosing segment to attach this to; dropped like any
                // other preamble line
                warn!("Malformed timestamp line skipped: {}", err);
                i += 1;
                continue;
            }
            LineKind::Text => {
                i += 1;
                continue;
            }
        };

        // Speaker label: next line, when non-blank and unindented
        let mut speaker = None;
        let mut text_start = i + 1;
        if let Some(&next) = lines.get(i + 1) {
            if matches!(classify_line(next), LineKind::Text) {
                let indented = next.starts_with(' ') || next.starts_with('\t');
                if !next.trim().is_empty() && !indented {
                    speaker = Some(next.trim().to_string());
                    text_start = i + 2;
                }
            }
        }

        // Collect text lines until the next valid timestamp; malformed
        // markers inside the segment stay as text
        let mut words: Vec<&str> = Vec::new();
        let mut j = text_start;
        while j < lines.len() {
            match classify_line(lines[j]) {
                LineKind::Timestamp(..) => break,
                LineKind::Malformed(err) => {
                    debug!("Keeping malformed timestamp as segment text: {}", err);
                    words.push(lines[j].trim());
                }
                LineKind::Text => {
                    let trimmed = lines[j].trim();
                    if !trimmed.is_empty() {
                        words.push(trimmed);
                    }
                }
            }
            j += 1;
        }

        let text = words.join(" ");
        if !text.is_empty() {
            segments.push(Segment::new(start, end, speaker, text));
        }
        i = j;
    }

    if segments.is_empty() {
        ParsedDocument::Plain(raw.trim().to_string())
    } else {
        ParsedDocument::Structured(segments)
    }
}

/// Decide whether a line is a timestamp-range marker, a malformed one, or
/// plain text. The marker shape is `[<timecode> - <timecode>]` at the start
/// of the line; anything after the closing bracket is ignored.
fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if !trimmed.starts_with('[') {
        return LineKind::Text;
    }
    let Some(close) = trimmed.find(']') else {
        return LineKind::Text;
    };
    let inner = &trimmed[1..close];

    // Bracketed text like "(laughter)" is not a range pattern; require the
    // dash separator and at least one colon before treating parse failures
    // as malformed timestamps
    let Some((start_str, end_str)) = inner.split_once('-') else {
        return LineKind::Text;
    };
    if !inner.contains(':') {
        return LineKind::Text;
    }

    let start = start_str.trim().parse::<Timecode>();
    let end = end_str.trim().parse::<Timecode>();
    match (start, end) {
        (Ok(start), Ok(end)) => LineKind::Timestamp(start, end),
        (Err(err), _) | (_, Err(err)) => LineKind::Malformed(err),
    }
}
