use std::env;
use std::time::Duration;

use async_trait::async_trait;
use pgvector::Vector;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
    EmbeddingRequest,
};

#[derive(Serialize)]
struct EmbedRequest {
    text: TextInput,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vector>,
    #[serde(default)]
    model_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub model_name: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl Default for EmbeddingsClientConfig {
    fn default() -> Self {
        let service_url = env::var("EMBEDDINGS_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8082".to_string());
        let model_name =
            env::var("EMBEDDINGS_MODEL_NAME").unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string());

        Self {
            service_url,
            model_name,
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
        }
    }
}

/// HTTP adapter for the sentence-embedding inference service, with
/// retry/backoff on transport errors.
pub struct EmbeddingsClient {
    http: Client,
    config: EmbeddingsClientConfig,
}

impl EmbeddingsClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, reqwest::Error> {
        Self::new(EmbeddingsClientConfig::default())
    }

    async fn send_request(&self, request: EmbedRequest) -> Result<EmbedResponse, EmbeddingProviderError> {
        let mut attempts = 0;
        let mut last_error = None;

        loop {
            attempts += 1;

            match self.execute_request(&request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    last_error = Some(e);

                    if attempts > self.config.max_retries {
                        break;
                    }

                    let backoff = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        Err(last_error.unwrap_or(EmbeddingProviderError::ServiceUnavailable))
    }

    async fn execute_request(
        &self,
        request: &EmbedRequest,
    ) -> Result<EmbedResponse, EmbeddingProviderError> {
        let response = self
            .http
            .post(&self.config.service_url)
            .json(request)
            .send()
            .await
            .map_err(|e| EmbeddingProviderError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingProviderError::ApiError(format!(
                "Embedding service returned {}: {}",
                status, body
            )));
        }

        response
            .json::<EmbedResponse>()
            .await
            .map_err(|e| EmbeddingProviderError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for EmbeddingsClient {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<Vector, EmbeddingProviderError> {
        if request.text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        let response = self
            .send_request(EmbedRequest {
                text: TextInput::Single(request.text),
            })
            .await?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingProviderError::ApiError("No embeddings returned".to_string()))
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if request.texts.is_empty() {
            return Ok(BatchEmbeddingResponse {
                embeddings: Vec::new(),
                model_name: self.config.model_name.clone(),
            });
        }

        let response = self
            .send_request(EmbedRequest {
                text: TextInput::Multiple(request.texts),
            })
            .await?;

        Ok(BatchEmbeddingResponse {
            model_name: response
                .model_name
                .unwrap_or_else(|| self.config.model_name.clone()),
            embeddings: response.embeddings,
        })
    }

    fn model_info(&self) -> String {
        self.config.model_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_shapes() {
        let single = serde_json::to_value(&EmbedRequest {
            text: TextInput::Single("Hello".to_string()),
        })
        .unwrap();
        assert_eq!(single["text"], "Hello");

        let multiple = serde_json::to_value(&EmbedRequest {
            text: TextInput::Multiple(vec!["a".to_string(), "b".to_string()]),
        })
        .unwrap();
        assert!(multiple["text"].is_array());
    }

    #[tokio::test]
    async fn test_empty_text_rejected_without_network_call() {
        let client = EmbeddingsClient::new(EmbeddingsClientConfig {
            service_url: "http://192.0.2.1:9".to_string(),
            model_name: "test".to_string(),
            max_retries: 0,
            timeout_secs: 1,
            backoff_factor: 1.0,
        })
        .unwrap();

        let result = client
            .generate_embedding(EmbeddingRequest {
                text: "   ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(EmbeddingProviderError::InvalidInput(_))));
    }
}
