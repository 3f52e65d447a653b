use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use crate::models::{Chunk, Decision, ParagraphTimestampMap, Timecode, VerificationOutcome};
use crate::stages::split_paragraphs;

const RULE_WIDTH: usize = 80;

/// Final per-chunk data handed to the assembler: the accepted text plus the
/// timestamp/speaker annotations produced by the core
#[derive(Debug, Clone)]
pub struct RenderedChunk {
    /// Speaker label, `None` for unknown speakers and plain documents
    pub speaker: Option<String>,
    /// Chunk-level start timecode, already offset-adjusted
    pub timestamp: Option<Timecode>,
    /// The accepted text (original or reformatted, per the decision)
    pub text: String,
    /// Paragraph-level stamps, empty when timestamps are disabled
    pub paragraph_stamps: ParagraphTimestampMap,
}

/// Assemble the final document.
///
/// Structured documents get `[HH:MM:SS] **Speaker:**` headers (frames
/// dropped) and paragraph-level stamps from the realigner; the first
/// paragraph of a chunk rides under the header unstamped. Plain documents
/// are the accepted texts joined by blank lines.
pub fn render_document(chunks: &[RenderedChunk], structured: bool, timestamps: bool) -> String {
    if !structured {
        return chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    let mut parts: Vec<String> = Vec::new();
    for chunk in chunks {
        if let Some(speaker) = &chunk.speaker {
            match (timestamps, chunk.timestamp) {
                (true, Some(tc)) => parts.push(format!("{} **{}:**", tc.bracketed(), speaker)),
                _ => parts.push(format!("{speaker}:")),
            }
        }

        if timestamps && !chunk.paragraph_stamps.is_empty() {
            let paragraphs = split_paragraphs(&chunk.text);
            for (index, paragraph) in paragraphs.iter().enumerate() {
                let stamp = chunk
                    .paragraph_stamps
                    .iter()
                    .find(|s| s.paragraph_index == index);
                match stamp {
                    Some(stamp) => {
                        parts.push(format!("{} {}", stamp.timestamp.bracketed(), paragraph))
                    }
                    None => parts.push(paragraph.clone()),
                }
                parts.push(String::new());
            }
        } else {
            parts.push(chunk.text.clone());
            parts.push(String::new());
        }
    }

    parts.join("\n").trim().to_string()
}

/// Write the assembled document
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write output: {:?}", path))
}

/// Persist verification outcomes that carry issues, in a human-auditable
/// block-per-chunk layout with a trailing summary
pub fn write_error_log(
    path: &Path,
    input_file: &Path,
    output_file: &Path,
    chunks: &[Chunk],
    outcomes: &[VerificationOutcome],
) -> Result<()> {
    let issues: Vec<&VerificationOutcome> = outcomes.iter().filter(|o| o.has_issues()).collect();

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create error log: {:?}", path))?;

    let rule = "=".repeat(RULE_WIDTH);
    writeln!(file, "{rule}")?;
    writeln!(file, "TRANSCRIPT REFORMATTER - SANITY CHECK ISSUES LOG")?;
    writeln!(file, "{rule}\n")?;
    writeln!(file, "Input file: {}", input_file.display())?;
    writeln!(file, "Output file: {}", output_file.display())?;
    writeln!(file, "Total chunks: {}", chunks.len())?;
    writeln!(file, "Chunks with issues: {}", issues.len())?;
    writeln!(file, "Timestamp: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file, "\n{rule}\n")?;

    for outcome in &issues {
        let label = chunks
            .get(outcome.chunk_id)
            .map(|c| c.speaker_label())
            .unwrap_or("(Unknown Speaker)");
        writeln!(file, "CHUNK {}: {}", outcome.chunk_id + 1, label)?;
        writeln!(file, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(file, "Rule Applied: {}", outcome.rule_applied.description())?;
        writeln!(file, "Original word count: {}", outcome.original_count)?;
        writeln!(file, "Reformatted word count: {}", outcome.reformatted_count)?;
        writeln!(file, "Word count delta: {}", outcome.delta)?;
        writeln!(file, "Percentage difference: {:.2}%", outcome.percent_diff)?;
        let action = match outcome.decision {
            Decision::UseOriginal => "Using ORIGINAL (unmodified)",
            Decision::UseReformatted => "Using REFORMATTED (acceptable)",
        };
        writeln!(file, "Action: {action}")?;

        writeln!(file, "\nDetails:")?;
        if outcome.diff_details.is_empty() {
            writeln!(file, "  All words match (within acceptable variations)")?;
        } else {
            writeln!(file, "  {} word(s) differ", outcome.diff_details.len())?;
            for diff in outcome.diff_details.iter().take(10) {
                writeln!(
                    file,
                    "  Position {}: '{}' vs '{}'",
                    diff.position + 1,
                    diff.original,
                    diff.reformatted
                )?;
            }
            if outcome.diff_details.len() > 10 {
                writeln!(
                    file,
                    "  ({} more not shown)",
                    outcome.diff_details.len() - 10
                )?;
            }
        }
        if !outcome.fuzzy_matches.is_empty() {
            writeln!(
                file,
                "  Note: {} acceptable variation(s) (plural/sound-alike)",
                outcome.fuzzy_matches.len()
            )?;
            for diff in outcome.fuzzy_matches.iter().take(5) {
                writeln!(
                    file,
                    "    Position {}: '{}' -> '{}'",
                    diff.position + 1,
                    diff.original,
                    diff.reformatted
                )?;
            }
        }
        writeln!(file, "\n{rule}\n")?;
    }

    let original_used = issues
        .iter()
        .filter(|o| o.decision == Decision::UseOriginal)
        .count();
    let reformatted_used = issues.len() - original_used;
    writeln!(file, "SUMMARY")?;
    writeln!(file, "{rule}")?;
    writeln!(file, "Chunks using ORIGINAL text: {original_used}")?;
    writeln!(file, "Chunks using REFORMATTED text: {reformatted_used}")?;
    writeln!(file, "Total issues logged: {}", issues.len())?;

    Ok(())
}
