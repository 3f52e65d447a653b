/// Preambles that introduce the text with a colon, e.g.
/// "Here is the reformatted text:"
const COLON_OPENERS: &[&str] = &["here is", "here's", "sure", "okay", "certainly", "of course"];

/// Preambles that narrate intent and end in a sentence, e.g.
/// "Let me reformat this for you."
const PERIOD_OPENERS: &[&str] = &["let me", "i'll", "i will"];

/// Phrases that mark a trailing "should I continue?" line
const CONTINUATION_OPENERS: &[&str] = &["would you like", "should i", "shall i", "let me know"];

/// Strip extraneous chat output from a response chunk: leading preambles,
/// markdown emphasis wrappers, and trailing offers to continue. Only the
/// first chunk gets the preamble pass; continuations are mid-stream text.
///
/// A line is only treated as a preamble when it carries the introducer
/// punctuation (a colon for the "here is" family, a period for the "let me"
/// family). Transcribed speech genuinely opens with words like "Okay, so we
/// started" and must never be dropped.
pub fn clean_response_chunk(chunk: &str, is_first_chunk: bool) -> String {
    let mut lines: Vec<String> = chunk.lines().map(str::to_string).collect();

    if is_first_chunk {
        while let Some(first) = lines.first() {
            let trimmed = first.trim().trim_matches('*').trim();
            if trimmed.is_empty() {
                lines.remove(0);
                continue;
            }
            match strip_preamble(trimmed) {
                Some(rest) if rest.is_empty() => {
                    lines.remove(0);
                    continue;
                }
                Some(rest) => {
                    lines[0] = rest;
                    break;
                }
                None => break,
            }
        }
    }

    // Drop trailing continuation prompts
    while let Some(last) = lines.last() {
        let trimmed = last.trim().trim_end_matches('*').trim();
        if trimmed.is_empty() {
            lines.pop();
            continue;
        }
        let lowered = trimmed.to_lowercase();
        let is_continuation_offer = lowered.contains("continue")
            && (lowered.ends_with('?')
                || CONTINUATION_OPENERS.iter().any(|p| lowered.starts_with(p)));
        if is_continuation_offer {
            lines.pop();
            continue;
        }
        break;
    }

    // Emphasis wrappers around the whole chunk
    if let Some(first) = lines.first_mut() {
        let stripped = first.trim_start();
        if stripped.starts_with('*') {
            *first = stripped.trim_start_matches('*').trim_start().to_string();
        }
    }
    if let Some(last) = lines.last_mut() {
        let stripped = last.trim_end();
        if stripped.ends_with('*') {
            *last = stripped.trim_end_matches('*').trim_end().to_string();
        }
    }
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// If the line is a chat preamble, return what remains after the introducer
/// punctuation. `None` means the line is content and must be kept: an opener
/// word without its anchoring colon or period is ordinary speech.
fn strip_preamble(line: &str) -> Option<String> {
    let lowered = line.to_lowercase();
    if COLON_OPENERS.iter().any(|p| lowered.starts_with(p)) {
        let colon = line.find(':')?;
        return Some(line[colon + 1..].trim_start().to_string());
    }
    if PERIOD_OPENERS.iter().any(|p| lowered.starts_with(p)) {
        let period = line.find('.')?;
        return Some(line[period + 1..].trim_start().to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_leading_preamble() {
        let chunk = "Here is the reformatted text:\nFirst paragraph of actual content.";
        assert_eq!(
            clean_response_chunk(chunk, true),
            "First paragraph of actual content."
        );
    }

    #[test]
    fn test_first_chunk_keeps_conversational_opener() {
        // Spoken text often starts with an acknowledgement word; without the
        // introducer colon it is content, not chat preamble
        let chunk = "Okay, so we started the show that night.\nEveryone was already seated.";
        assert_eq!(clean_response_chunk(chunk, true), chunk);
    }

    #[test]
    fn test_inline_preamble_keeps_text_after_colon() {
        let chunk = "Sure: First words of the actual text.";
        assert_eq!(
            clean_response_chunk(chunk, true),
            "First words of the actual text."
        );
    }

    #[test]
    fn test_narrated_intent_dropped_through_period() {
        let chunk = "Let me reformat this text.\nThe show opened with a song.";
        assert_eq!(
            clean_response_chunk(chunk, true),
            "The show opened with a song."
        );
    }

    #[test]
    fn test_strips_trailing_continuation_offer() {
        let chunk = "Actual content here.\n\nWould you like me to continue?";
        assert_eq!(clean_response_chunk(chunk, true), "Actual content here.");
    }

    #[test]
    fn test_emphasis_wrappers_removed_from_content() {
        assert_eq!(
            clean_response_chunk("**The actual text body.**", true),
            "The actual text body."
        );
        let chunk = "*First paragraph.\n\nSecond paragraph.*";
        assert_eq!(
            clean_response_chunk(chunk, true),
            "First paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_continuation_chunks_keep_leading_text() {
        // Mid-stream text that happens to start with "sure" must survive
        let chunk = "sure enough the crowd went quiet.";
        assert_eq!(clean_response_chunk(chunk, false), chunk);
    }

    #[test]
    fn test_plain_chunk_unchanged() {
        let chunk = "First paragraph.\n\nSecond paragraph.";
        assert_eq!(clean_response_chunk(chunk, true), chunk);
    }
}
