use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{build_reformat_prompt, clean_response_chunk, CONTINUATION_PROMPT, SYSTEM_PROMPT};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Configuration for the OpenAI chat-completions client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key, from the configuration file
    pub api_key: String,
    /// Model name, e.g. "gpt-4o"
    pub model: String,
    /// Maximum tokens per response
    pub max_tokens: u32,
    /// Sampling temperature (lower = more deterministic)
    pub temperature: f64,
    /// Maximum continuation requests when a response is truncated
    pub max_continuations: u32,
}

impl OpenAiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "gpt-4o".to_string(),
            max_tokens: 16_000,
            temperature: 0.3,
            max_continuations: 10,
        }
    }
}

/// OpenAI API client for the external reformatting step
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Reformat one chunk of transcript text, automatically continuing when
    /// the model stops for length. Assistant turns accumulate in the message
    /// history so each continuation picks up where the last left off.
    pub async fn reformat(&self, chunk_text: &str) -> Result<String> {
        let mut messages = vec![
            Message {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: build_reformat_prompt(chunk_text),
            },
        ];

        let mut full_response = String::new();
        let mut continuation_count = 0u32;

        loop {
            let (content, finish_reason) = match self.send(&messages).await {
                Ok(reply) => reply,
                Err(e) if !full_response.is_empty() => {
                    warn!("API request failed mid-continuation, keeping partial response: {e}");
                    break;
                }
                Err(e) => return Err(e),
            };

            debug!(
                "Received {} characters, finish_reason: {}",
                content.len(),
                finish_reason
            );

            let cleaned = clean_response_chunk(&content, continuation_count == 0);
            full_response.push_str(&cleaned);

            match finish_reason.as_str() {
                "stop" => break,
                "length" => {
                    continuation_count += 1;
                    if continuation_count > self.config.max_continuations {
                        warn!(
                            "Reached maximum continuations ({})",
                            self.config.max_continuations
                        );
                        break;
                    }
                    info!(
                        "Response truncated, requesting continuation {}/{}",
                        continuation_count, self.config.max_continuations
                    );
                    messages.push(Message {
                        role: "assistant".to_string(),
                        content,
                    });
                    messages.push(Message {
                        role: "user".to_string(),
                        content: CONTINUATION_PROMPT.to_string(),
                    });
                }
                other => {
                    warn!("Unexpected finish_reason: {other}");
                    break;
                }
            }
        }

        Ok(full_response.trim().to_string())
    }

    async fn send(&self, messages: &[Message]) -> Result<(String, String)> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error: {} - {}", status, body);
        }

        let response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .context("No choices in API response")?;

        Ok((
            choice.message.content.unwrap_or_default(),
            choice.finish_reason.unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
