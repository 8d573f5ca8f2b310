use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::token_classifier::{TokenClassifier, TokenClassifierError};

#[derive(Debug, Clone)]
pub struct ClassifierClientConfig {
    pub service_url: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl Default for ClassifierClientConfig {
    fn default() -> Self {
        let service_url = env::var("CLASSIFIER_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8081".to_string());

        Self {
            service_url,
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct ClassifyResponse {
    token_labels: Vec<Vec<String>>,
}

/// HTTP adapter for the fine-tuned token-classification model served as an
/// inference endpoint. Transport failures are retried with backoff; an
/// exhausted retry budget surfaces as `ServiceUnavailable` so callers fail
/// the whole classification rather than guessing labels.
pub struct ClassifierClient {
    http: Client,
    config: ClassifierClientConfig,
}

impl ClassifierClient {
    pub fn new(config: ClassifierClientConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn from_env() -> Result<Self, reqwest::Error> {
        Self::new(ClassifierClientConfig::default())
    }

    fn classify_endpoint(&self) -> String {
        format!("{}/classify", self.config.service_url.trim_end_matches('/'))
    }

    fn health_endpoint(&self) -> String {
        format!("{}/health", self.config.service_url.trim_end_matches('/'))
    }

    async fn execute_classify(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<String>>, TokenClassifierError> {
        let response = self
            .http
            .post(self.classify_endpoint())
            .json(&ClassifyRequest { texts })
            .send()
            .await
            .map_err(|e| TokenClassifierError::ServiceUnavailable(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenClassifierError::ApiError(format!(
                "Classifier returned {}: {}",
                status, body
            )));
        }

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| TokenClassifierError::InvalidResponse(e.to_string()))?;

        Ok(body.token_labels)
    }
}

#[async_trait]
impl TokenClassifier for ClassifierClient {
    async fn classify_tokens(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<String>>, TokenClassifierError> {
        let mut attempts = 0;
        let mut last_error = None;

        loop {
            attempts += 1;

            match self.execute_classify(texts).await {
                Ok(labels) => return Ok(labels),
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

        Err(last_error.unwrap_or(TokenClassifierError::ServiceUnavailable(
            "Max retries exceeded".to_string(),
        )))
    }

    async fn health_check(&self) -> Result<(), TokenClassifierError> {
        let response = self
            .http
            .get(self.health_endpoint())
            .send()
            .await
            .map_err(|e| TokenClassifierError::ServiceUnavailable(e.without_url().to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(TokenClassifierError::ServiceUnavailable(format!(
                "Classifier health endpoint returned {}",
                response.status()
            )))
        }
    }
}
