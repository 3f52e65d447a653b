use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::llm::OpenAiConfig;
use crate::stages::VerifyConfig;

/// Default configuration file name, looked up next to the executable and in
/// the current working directory
pub const DEFAULT_CONFIG_FILE: &str = "reflow.toml";

/// Application configuration, loaded from a TOML file with an `[openai]`
/// section for the reformatting client and an optional `[verify]` section
/// overriding the decision thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub openai: OpenAiSettings,
    #[serde(default)]
    pub verify: VerifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_continuations")]
    pub max_continuations: u32,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    16_000
}

fn default_temperature() -> f64 {
    0.3
}

fn default_max_continuations() -> u32 {
    10
}

impl AppConfig {
    /// Load configuration from an explicit path, or fall back to
    /// `reflow.toml` beside the executable and then in the working directory
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => {
                anyhow::ensure!(path.exists(), "Specified config file not found: {:?}", path);
                path.to_path_buf()
            }
            None => Self::locate_default()
                .context(format!("Configuration file not found. Expected: {DEFAULT_CONFIG_FILE}"))?,
        };

        info!("Loading configuration from {:?}", path);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        anyhow::ensure!(
            !config.openai.api_key.trim().is_empty(),
            "API key not found in configuration file"
        );
        debug!(
            "Configuration loaded: model={}, max_tokens={}",
            config.openai.model, config.openai.max_tokens
        );
        Ok(config)
    }

    fn locate_default() -> Option<PathBuf> {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
        }
        let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
        candidate.exists().then_some(candidate)
    }

    /// Client configuration for the reformatting call
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_key: self.openai.api_key.clone(),
            model: self.openai.model.clone(),
            max_tokens: self.openai.max_tokens,
            temperature: self.openai.temperature,
            max_continuations: self.openai.max_continuations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[openai]
api_key = "sk-test"
model = "gpt-4o-mini"
temperature = 0.1

[verify]
small_chunk_threshold = 10
tolerance = 2
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.openai.api_key, "sk-test");
        assert_eq!(config.openai.model, "gpt-4o-mini");
        // Unspecified fields take defaults
        assert_eq!(config.openai.max_tokens, 16_000);
        assert_eq!(config.openai.max_continuations, 10);
        assert_eq!(config.verify.small_chunk_threshold, 10);
        assert_eq!(config.verify.tolerance, 2);
        assert_eq!(config.verify.large_chunk_threshold, 70);
    }

    #[test]
    fn test_missing_verify_section_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[openai]\napi_key = \"sk-test\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.verify.small_chunk_threshold, 15);
        assert_eq!(config.verify.single_word_delta_threshold, 1);
        assert_eq!(config.verify.large_chunk_percent_threshold, 6.0);
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[openai]\napi_key = \"\"").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_path_rejected() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/reflow.toml")));
        assert!(err.is_err());
    }
}
