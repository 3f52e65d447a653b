use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Read a transcript file as UTF-8 text, stripping a leading BOM if present
pub fn read_transcript(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    info!("Transcript length: {} characters", content.len());
    Ok(content.to_string())
}

/// Default output path: `<stem>_reformatted.<ext>` beside the input
pub fn default_output_path(input: &Path) -> std::path::PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}_reformatted.{}", stem, ext.to_string_lossy()),
        None => format!("{stem}_reformatted"),
    };
    input.with_file_name(name)
}

/// Error log path derived from the output path: `<stem>.errors.<ext>`
pub fn error_log_path(output: &Path) -> std::path::PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{}.errors.{}", stem, ext.to_string_lossy()),
        None => format!("{stem}.errors"),
    };
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_read_transcript_strips_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}hello transcript").unwrap();
        let content = read_transcript(file.path()).unwrap();
        assert_eq!(content, "hello transcript");
    }

    #[test]
    fn test_read_missing_file_fails_with_context() {
        let err = read_transcript(Path::new("/nonexistent/file.txt")).unwrap_err();
        assert!(format!("{err}").contains("Failed to read file"));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(&PathBuf::from("/tmp/show.txt")),
            PathBuf::from("/tmp/show_reformatted.txt")
        );
        assert_eq!(
            default_output_path(&PathBuf::from("notes")),
            PathBuf::from("notes_reformatted")
        );
    }

    #[test]
    fn test_error_log_path() {
        assert_eq!(
            error_log_path(&PathBuf::from("/tmp/show_reformatted.txt")),
            PathBuf::from("/tmp/show_reformatted.errors.txt")
        );
    }
}
