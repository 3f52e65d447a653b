pub mod config;
pub mod io;
pub mod llm;
pub mod models;
pub mod stages;
pub mod text;

pub use config::AppConfig;
pub use io::{
    default_output_path, error_log_path, read_transcript, render_document, write_error_log,
    write_output, RenderedChunk,
};
pub use llm::{OpenAiClient, OpenAiConfig};
pub use models::{
    Chunk, Decision, ParagraphStamp, ParagraphTimestampMap, RuleApplied, Segment, Timecode,
    VerificationOutcome, WordDiff,
};
pub use stages::{
    adjusted, build_chunks, needs_offset_adjustment, parse, realign, split_paragraphs, verify,
    ParsedDocument, VerifyConfig,
};
pub use text::{equivalent, tokenize, WordToken};
