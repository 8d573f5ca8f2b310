use std::env;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::text_generator::{
    TextChunkStream, TextGenerator, TextGeneratorError,
};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone)]
pub struct OllamaGeneratorConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl OllamaGeneratorConfig {
    /// Model used for clause and document summarization.
    pub fn summarization_from_env() -> Self {
        Self {
            base_url: env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            model: env::var("LLM_MODEL_NAME").unwrap_or_else(|_| "llama3".to_string()),
            temperature: env_temperature("LLM_TEMPERATURE", 0.1),
            timeout_secs: 120,
        }
    }

    /// Model used for chat answers, quick replies, and suggestions.
    pub fn chat_from_env() -> Self {
        Self {
            base_url: env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string()),
            model: env::var("CHAT_MODEL_NAME").unwrap_or_else(|_| "tinyllama".to_string()),
            temperature: env_temperature("CHAT_TEMPERATURE", 0.3),
            timeout_secs: 120,
        }
    }
}

fn env_temperature(key: &str, default: f32) -> f32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    done: bool,
}

/// Text generation against a local Ollama runtime, in both one-shot and
/// streaming (newline-delimited JSON) forms.
pub struct OllamaGenerator {
    http: Client,
    config: OllamaGeneratorConfig,
}

impl OllamaGenerator {
    pub fn new(config: OllamaGeneratorConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }

    async fn send(&self, prompt: &str, stream: bool) -> Result<reqwest::Response, TextGeneratorError> {
        let payload = json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": stream,
            "options": {
                "temperature": self.config.temperature,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                TextGeneratorError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {}",
                    self.config.base_url,
                    e.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TextGeneratorError::GenerationFailed(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TextGeneratorError> {
        let response = self.send(prompt, false).await?;

        let body: GenerateResponse = response.json().await.map_err(|e| {
            TextGeneratorError::InvalidResponse(format!("failed to decode Ollama response: {}", e))
        })?;

        if !body.done {
            return Err(TextGeneratorError::InvalidResponse(
                "Ollama response marked incomplete".to_string(),
            ));
        }

        Ok(body.response.trim().to_string())
    }

    async fn generate_stream(&self, prompt: &str) -> Result<TextChunkStream, TextGeneratorError> {
        let response = self.send(prompt, true).await?;
        let bytes = response.bytes_stream().boxed();

        // Each line of the body is one JSON fragment; the fragment flagged
        // `done` ends the stream.
        let stream = futures::stream::unfold(
            (bytes, String::new(), false),
            |(mut bytes, mut buffer, finished)| async move {
                if finished {
                    return None;
                }

                loop {
                    if let Some(pos) = buffer.find('\n') {
                        let line: String = buffer.drain(..=pos).collect();
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }

                        return match serde_json::from_str::<GenerateResponse>(line) {
                            Ok(fragment) => {
                                Some((Ok(fragment.response), (bytes, buffer, fragment.done)))
                            }
                            Err(e) => Some((
                                Err(TextGeneratorError::InvalidResponse(format!(
                                    "bad stream fragment: {}",
                                    e
                                ))),
                                (bytes, buffer, true),
                            )),
                        };
                    }

                    match bytes.next().await {
                        Some(Ok(chunk)) => {
                            buffer.push_str(&String::from_utf8_lossy(&chunk));
                        }
                        Some(Err(e)) => {
                            return Some((
                                Err(TextGeneratorError::GenerationFailed(format!(
                                    "stream transport error: {}",
                                    e
                                ))),
                                (bytes, buffer, true),
                            ));
                        }
                        None => {
                            let rest = buffer.trim().to_string();
                            buffer.clear();
                            if rest.is_empty() {
                                return None;
                            }
                            return match serde_json::from_str::<GenerateResponse>(&rest) {
                                Ok(fragment) => {
                                    Some((Ok(fragment.response), (bytes, buffer, true)))
                                }
                                Err(e) => Some((
                                    Err(TextGeneratorError::InvalidResponse(format!(
                                        "bad stream tail: {}",
                                        e
                                    ))),
                                    (bytes, buffer, true),
                                )),
                            };
                        }
                    }
                }
            },
        );

        Ok(stream.boxed())
    }
}
