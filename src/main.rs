use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use reflow::{
    adjusted, build_chunks, default_output_path, error_log_path, needs_offset_adjustment, parse,
    read_transcript, realign, render_document, tokenize, verify, write_error_log, write_output,
    AppConfig, Chunk, Decision, OpenAiClient, ParsedDocument, RenderedChunk, VerificationOutcome,
};

/// Report progress every N chunks
const STATUS_REPORT_CHUNK_INTERVAL: usize = 5;
/// Or every N seconds, whichever comes first
const STATUS_REPORT_TIME_INTERVAL_SECS: u64 = 30;

#[derive(Parser)]
#[command(name = "reflow")]
#[command(author, version, about = "Transcript reformatting with word-level fidelity verification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reformat transcript files into clean paragraphs via the OpenAI API
    Process {
        /// Transcript file(s) to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Configuration file path (default: reflow.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file (default: <input>_reformatted.<ext>); only valid for
        /// a single input file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include timestamps in the output when speakers change
        #[arg(long)]
        timestamps: bool,

        /// Disable the automatic 1-hour subtraction for editing timelines
        /// that start at 01:00:00
        #[arg(long)]
        disable_timestamp_adjustment: bool,

        /// Skip the word comparison sanity check and always keep the
        /// reformatted text
        #[arg(long)]
        skip_sanity_check: bool,

        /// Word count delta tolerance, overriding the configured value
        #[arg(long)]
        tolerance: Option<usize>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare two text files word-by-word, ignoring punctuation, case, and
    /// whitespace; exits non-zero if they differ
    Compare {
        /// The two files to compare
        #[arg(required = true, num_args = 2)]
        files: Vec<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            files,
            config,
            output,
            timestamps,
            disable_timestamp_adjustment,
            skip_sanity_check,
            tolerance,
            verbose,
        } => {
            setup_logging(verbose);
            anyhow::ensure!(
                output.is_none() || files.len() == 1,
                "--output requires exactly one input file"
            );

            let config = AppConfig::load(config.as_deref())?;
            let options = ProcessOptions {
                timestamps,
                disable_timestamp_adjustment,
                skip_sanity_check,
                tolerance,
            };

            for file in &files {
                if !file.exists() {
                    warn!("File not found: {:?}", file);
                    continue;
                }
                info!("Processing file: {:?}", file);
                process_transcript(file, output.as_deref(), &config, &options).await?;
            }
            Ok(())
        }
        Commands::Compare { files, verbose } => {
            setup_logging(verbose);
            let identical = compare_files(&files[0], &files[1])?;
            if !identical {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

struct ProcessOptions {
    timestamps: bool,
    disable_timestamp_adjustment: bool,
    skip_sanity_check: bool,
    tolerance: Option<usize>,
}

async fn process_transcript(
    input: &Path,
    output: Option<&Path>,
    config: &AppConfig,
    options: &ProcessOptions,
) -> Result<()> {
    let raw = read_transcript(input)?;
    if raw.trim().is_empty() {
        warn!("File is empty: {:?}", input);
        return Ok(());
    }

    let parsed = parse(&raw);
    let structured = !parsed.is_plain();
    let chunks = match &parsed {
        ParsedDocument::Plain(text) => {
            info!("No timestamp markers detected, processing as single document");
            vec![Chunk::plain(text.clone())]
        }
        ParsedDocument::Structured(segments) => {
            info!("Detected structured transcript with {} segments", segments.len());
            let chunks = build_chunks(segments);
            info!("Grouped into {} speaker chunks", chunks.len());
            chunks
        }
    };

    let adjust = structured
        && !options.disable_timestamp_adjustment
        && needs_offset_adjustment(&chunks);
    if adjust {
        info!("Detected editing timeline starting near 01:00:00, subtracting 1 hour from all timestamps");
    } else if options.disable_timestamp_adjustment {
        info!("Timestamp adjustment disabled by --disable-timestamp-adjustment");
    }

    let mut verify_config = config.verify.clone();
    if let Some(tolerance) = options.tolerance {
        verify_config.tolerance = tolerance;
    }

    let client = OpenAiClient::new(config.openai_config());
    let total_chunks = chunks.len();
    let mut rendered: Vec<RenderedChunk> = Vec::with_capacity(total_chunks);
    let mut outcomes: Vec<VerificationOutcome> = Vec::new();
    let mut last_status = Instant::now();

    for (idx, chunk) in chunks.iter().enumerate() {
        info!(
            "Processing chunk {}/{}: {}",
            idx + 1,
            total_chunks,
            chunk.speaker_label()
        );

        let chunk_num = idx + 1;
        if chunk_num == 1
            || chunk_num % STATUS_REPORT_CHUNK_INTERVAL == 0
            || last_status.elapsed().as_secs() >= STATUS_REPORT_TIME_INTERVAL_SECS
        {
            info!("Status: processing chunk {} of {}", chunk_num, total_chunks);
            last_status = Instant::now();
        }

        let reformatted = client.reformat(&chunk.original_text).await?;

        // The sanity-check skip is a caller-level override, not a rule
        let (accepted, outcome) = if options.skip_sanity_check {
            (reformatted, None)
        } else {
            let outcome = verify(idx, chunk, &reformatted, &verify_config);
            let accepted = match outcome.decision {
                Decision::UseOriginal => chunk.original_text.clone(),
                Decision::UseReformatted => reformatted,
            };
            (accepted, Some(outcome))
        };

        let paragraph_stamps = if options.timestamps && structured {
            realign(chunk, &accepted, adjust)
        } else {
            Vec::new()
        };

        rendered.push(RenderedChunk {
            speaker: chunk.speaker.clone(),
            timestamp: chunk.start().map(|tc| adjusted(tc, adjust)),
            text: accepted,
            paragraph_stamps,
        });
        outcomes.extend(outcome);
    }

    info!("Completed processing all {} chunks", total_chunks);

    let issue_chunks: Vec<usize> = outcomes
        .iter()
        .filter(|o| o.has_issues())
        .map(|o| o.chunk_id + 1)
        .collect();
    if !options.skip_sanity_check {
        if issue_chunks.is_empty() {
            info!("Sanity check passed: all chunks processed successfully");
        } else {
            warn!(
                "{} chunk(s) had word count differences: {:?} (see error log)",
                issue_chunks.len(),
                issue_chunks
            );
        }
    }

    let final_output = render_document(&rendered, structured, options.timestamps);
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    write_output(&output_path, &final_output)?;
    info!("Reformatted transcript saved to: {:?}", output_path);

    if !issue_chunks.is_empty() {
        let log_path = error_log_path(&output_path);
        write_error_log(&log_path, input, &output_path, &chunks, &outcomes)?;
        info!("Error log saved to: {:?}", log_path);
    }

    Ok(())
}

/// Word-by-word comparison of two files under the shared tokenization rule.
/// Exact normalized matches only; the fuzzy rules are for chunk verification,
/// not for this check.
fn compare_files(a: &Path, b: &Path) -> Result<bool> {
    let text_a = read_transcript(a).with_context(|| format!("Cannot read file {:?}", a))?;
    let text_b = read_transcript(b).with_context(|| format!("Cannot read file {:?}", b))?;

    let words_a = tokenize(&text_a);
    let words_b = tokenize(&text_b);

    info!("File 1 ({:?}): {} words", a, words_a.len());
    info!("File 2 ({:?}): {} words", b, words_b.len());

    if words_a.len() != words_b.len() {
        println!(
            "DIFFERENT: Word counts don't match ({} vs {})",
            words_a.len(),
            words_b.len()
        );
        return Ok(false);
    }

    let differences: Vec<(usize, &str, &str)> = words_a
        .iter()
        .zip(words_b.iter())
        .enumerate()
        .filter(|(_, (wa, wb))| wa.normalized != wb.normalized)
        .map(|(i, (wa, wb))| (i + 1, wa.normalized.as_str(), wb.normalized.as_str()))
        .collect();

    if differences.is_empty() {
        println!("IDENTICAL: All words match");
        return Ok(true);
    }

    println!("DIFFERENT: {} word(s) differ", differences.len());
    if differences.len() > 10 {
        println!("  Showing first 10 differences:");
    }
    for (pos, wa, wb) in differences.iter().take(10) {
        println!("  Position {}: '{}' vs '{}'", pos, wa, wb);
    }
    Ok(false)
}
