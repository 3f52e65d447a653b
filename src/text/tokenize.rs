/// A word position within a text: the casefolded, edge-punctuation-stripped
/// form used for comparison, plus the surface form as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordToken {
    /// Normalized form: lowercased, leading/trailing punctuation stripped,
    /// internal apostrophes preserved
    pub normalized: String,
    /// The word as it appeared in the source text
    pub surface: String,
}

/// Split a text into word tokens.
///
/// This is the single tokenization rule shared by the parser, the fidelity
/// verifier, and the timestamp realigner; comparisons are only consistent
/// because all three use it.
pub fn tokenize(text: &str) -> Vec<WordToken> {
    text.split_whitespace()
        .filter_map(|surface| {
            let normalized = normalize_word(surface);
            if normalized.is_empty() {
                // Pure punctuation like a lone dash is not a word
                None
            } else {
                Some(WordToken {
                    normalized,
                    surface: surface.to_string(),
                })
            }
        })
        .collect()
}

/// Normalize a single whitespace-delimited word: strip leading and trailing
/// non-alphanumeric characters, lowercase the rest. Internal punctuation
/// (apostrophes in contractions, hyphens in compounds) is kept.
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(text: &str) -> Vec<String> {
        tokenize(text).into_iter().map(|t| t.normalized).collect()
    }

    #[test]
    fn test_strips_edge_punctuation_and_casefolds() {
        assert_eq!(
            normalized("Hello, World! \"quoted\" (aside)"),
            vec!["hello", "world", "quoted", "aside"]
        );
    }

    #[test]
    fn test_preserves_internal_apostrophes() {
        assert_eq!(normalized("Don't they're could've"), vec!["don't", "they're", "could've"]);
    }

    #[test]
    fn test_drops_pure_punctuation_tokens() {
        assert_eq!(normalized("wait -- what ..."), vec!["wait", "what"]);
    }

    #[test]
    fn test_surface_form_is_kept() {
        let tokens = tokenize("Hello,");
        assert_eq!(tokens[0].surface, "Hello,");
        assert_eq!(tokens[0].normalized, "hello");
    }

    #[test]
    fn test_tokenization_is_idempotent() {
        let text = "The Researcher, studied; THERE findings!";
        let once = normalized(text);
        let rejoined = once.join(" ");
        assert_eq!(normalized(&rejoined), once);
    }
}
