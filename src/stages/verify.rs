use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{Chunk, Decision, RuleApplied, VerificationOutcome, WordDiff};
use crate::text::{equivalent, tokenize};

/// Thresholds for the chunk decision rules.
///
/// An explicit struct rather than module constants so tests and callers can
/// run several configurations side by side.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Chunks below this word count always keep the original text;
    /// short chunks (lyrics, interjections) are prone to over-correction
    pub small_chunk_threshold: usize,
    /// Accept the reformatted text when the word count delta is at most
    /// this many words
    pub single_word_delta_threshold: usize,
    /// Chunks above this word count use the percentage rule
    pub large_chunk_threshold: usize,
    /// Accept a large chunk's reformatted text when the percentage difference is
    /// below this
    pub large_chunk_percent_threshold: f64,
    /// User-configured delta tolerance
    pub tolerance: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            small_chunk_threshold: 15,
            single_word_delta_threshold: 1,
            large_chunk_threshold: 70,
            large_chunk_percent_threshold: 6.0,
            tolerance: 0,
        }
    }
}

/// Compare a chunk's original text against its reformatted text and decide
/// which to keep.
///
/// Tokens are aligned index-for-index, not by sequence alignment: the
/// reformatting step is expected to change punctuation and line breaks only,
/// so word order is assumed stable. Positions past the shorter sequence count
/// as differences. The decision rules run in fixed order, first match wins.
///
/// Pure over its inputs; persisting the outcome is the caller's business.
pub fn verify(
    chunk_id: usize,
    chunk: &Chunk,
    reformatted_text: &str,
    config: &VerifyConfig,
) -> VerificationOutcome {
    let original = tokenize(&chunk.original_text);
    let reformatted = tokenize(reformatted_text);

    let original_count = original.len();
    let reformatted_count = reformatted.len();
    let delta = original_count.abs_diff(reformatted_count);
    let percent_diff = if original_count > 0 {
        delta as f64 / original_count as f64 * 100.0
    } else {
        0.0
    };

    let mut diff_details = Vec::new();
    let mut fuzzy_matches = Vec::new();

    let shared = original_count.min(reformatted_count);
    for position in 0..shared {
        let (a, b) = (&original[position], &reformatted[position]);
        if equivalent(a, b) {
            if a.normalized != b.normalized {
                fuzzy_matches.push(WordDiff {
                    position,
                    original: a.normalized.clone(),
                    reformatted: b.normalized.clone(),
                });
            }
        } else {
            diff_details.push(WordDiff {
                position,
                original: a.normalized.clone(),
                reformatted: b.normalized.clone(),
            });
        }
    }

    // Length mismatch past the shared prefix: every extra position is a
    // difference against nothing
    for position in shared..original_count {
        diff_details.push(WordDiff {
            position,
            original: original[position].normalized.clone(),
            reformatted: String::new(),
        });
    }
    for position in shared..reformatted_count {
        diff_details.push(WordDiff {
            position,
            original: String::new(),
            reformatted: reformatted[position].normalized.clone(),
        });
    }

    let (decision, rule_applied) = decide(
        original_count,
        delta,
        percent_diff,
        diff_details.is_empty(),
        config,
    );

    match decision {
        Decision::UseReformatted if rule_applied == RuleApplied::PerfectMatch => {
            debug!("Chunk {}: passed sanity check", chunk_id + 1);
        }
        Decision::UseReformatted => {
            warn!(
                "Chunk {}: {} ({} differences, delta {}), using reformatted",
                chunk_id + 1,
                rule_applied.description(),
                diff_details.len(),
                delta
            );
        }
        Decision::UseOriginal => {
            warn!(
                "Chunk {}: {} ({} words, delta {}, {:.2}%), using original",
                chunk_id + 1,
                rule_applied.description(),
                original_count,
                delta,
                percent_diff
            );
        }
    }

    VerificationOutcome {
        chunk_id,
        rule_applied,
        original_count,
        reformatted_count,
        delta,
        percent_diff,
        decision,
        diff_details,
        fuzzy_matches,
    }
}

/// The fixed decision ladder. A small, closed rule set expressed as explicit
/// early returns rather than a rule-engine abstraction.
fn decide(
    original_count: usize,
    delta: usize,
    percent_diff: f64,
    no_differences: bool,
    config: &VerifyConfig,
) -> (Decision, RuleApplied) {
    if no_differences && delta == 0 {
        return (Decision::UseReformatted, RuleApplied::PerfectMatch);
    }
    // Small chunks keep the original, regardless of how close the
    // reformatted text is
    if original_count < config.small_chunk_threshold {
        return (Decision::UseOriginal, RuleApplied::SmallChunk);
    }
    // A single-word delta is an acceptable formatting artifact
    if delta <= config.single_word_delta_threshold {
        return (Decision::UseReformatted, RuleApplied::SingleWordDelta);
    }
    // Large chunks tolerate a small percentage difference
    if original_count > config.large_chunk_threshold
        && percent_diff < config.large_chunk_percent_threshold
    {
        return (Decision::UseReformatted, RuleApplied::LargeChunkPercent);
    }
    // Explicit user tolerance
    if delta <= config.tolerance {
        return (Decision::UseReformatted, RuleApplied::ConfiguredTolerance);
    }
    // Safe fallback
    (Decision::UseOriginal, RuleApplied::DefaultFallback)
}
