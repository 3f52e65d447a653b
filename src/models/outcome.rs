use serde::{Deserialize, Serialize};

use super::Timecode;

/// Which text to keep for a chunk after verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    UseOriginal,
    UseReformatted,
}

/// Which decision rule fired, in the fixed first-match-wins order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleApplied {
    /// Same word count, no non-equivalent positions
    PerfectMatch,
    /// Chunk below the small-chunk word threshold
    SmallChunk,
    /// Word count delta within the single-word threshold
    SingleWordDelta,
    /// Large chunk with a small percentage difference
    LargeChunkPercent,
    /// Delta within the user-configured tolerance
    ConfiguredTolerance,
    /// Exceeds all thresholds
    DefaultFallback,
}

impl RuleApplied {
    /// Human-readable rule name for the error log
    pub fn description(&self) -> &'static str {
        match self {
            RuleApplied::PerfectMatch => "Perfect match",
            RuleApplied::SmallChunk => "Small chunk",
            RuleApplied::SingleWordDelta => "Single-word delta",
            RuleApplied::LargeChunkPercent => "Large chunk with small percentage difference",
            RuleApplied::ConfiguredTolerance => "Within configured tolerance",
            RuleApplied::DefaultFallback => "Exceeds all thresholds",
        }
    }
}

/// One differing word position between original and reformatted text.
/// An empty side means the other text ran past this one's length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDiff {
    /// Zero-based token position
    pub position: usize,
    pub original: String,
    pub reformatted: String,
}

/// Result of verifying one chunk; derived once, never mutated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Index of the chunk in document order
    pub chunk_id: usize,
    pub rule_applied: RuleApplied,
    pub original_count: usize,
    pub reformatted_count: usize,
    /// Absolute word count difference
    pub delta: usize,
    /// 100 * delta / original_count, zero for an empty chunk
    pub percent_diff: f64,
    pub decision: Decision,
    /// Positions where the tokens are not equivalent
    pub diff_details: Vec<WordDiff>,
    /// Positions that matched only under the fuzzy rules (plural/sound-alike)
    pub fuzzy_matches: Vec<WordDiff>,
}

impl VerificationOutcome {
    /// Whether this outcome should be persisted to the error log
    pub fn has_issues(&self) -> bool {
        self.rule_applied != RuleApplied::PerfectMatch || !self.diff_details.is_empty()
    }
}

/// Timestamp for one paragraph of a chunk's accepted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphStamp {
    /// Zero-based paragraph index within the chunk
    pub paragraph_index: usize,
    pub timestamp: Timecode,
}

/// Per-chunk paragraph timestamps; the first paragraph of a chunk is never
/// stamped, so entries start at paragraph index 1
pub type ParagraphTimestampMap = Vec<ParagraphStamp>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_issues() {
        let clean = VerificationOutcome {
            chunk_id: 0,
            rule_applied: RuleApplied::PerfectMatch,
            original_count: 10,
            reformatted_count: 10,
            delta: 0,
            percent_diff: 0.0,
            decision: Decision::UseReformatted,
            diff_details: vec![],
            fuzzy_matches: vec![],
        };
        assert!(!clean.has_issues());

        let mut flagged = clean.clone();
        flagged.rule_applied = RuleApplied::SmallChunk;
        flagged.decision = Decision::UseOriginal;
        assert!(flagged.has_issues());
    }
}
