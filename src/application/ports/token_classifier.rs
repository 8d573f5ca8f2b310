use async_trait::async_trait;

/// Token label meaning "no entity"; tokens carrying it are ignored when the
/// clause label is aggregated.
pub const NO_ENTITY_LABEL: &str = "O";

#[derive(Debug)]
pub enum TokenClassifierError {
    ServiceUnavailable(String),
    ApiError(String),
    InvalidResponse(String),
}

impl std::fmt::Display for TokenClassifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenClassifierError::ServiceUnavailable(msg) => {
                write!(f, "Classifier unavailable: {}", msg)
            }
            TokenClassifierError::ApiError(msg) => write!(f, "Classifier API error: {}", msg),
            TokenClassifierError::InvalidResponse(msg) => {
                write!(f, "Malformed classifier response: {}", msg)
            }
        }
    }
}

impl std::error::Error for TokenClassifierError {}

/// Token-level classification model. Returns one label per token per input
/// text, order-preserving; label aggregation into a clause category is
/// crate logic, not the model's.
///
/// The backing model is loaded once at process start; `health_check` is
/// called during container construction so an unavailable model fails fast
/// instead of mislabeling later.
#[async_trait]
pub trait TokenClassifier: Send + Sync {
    async fn classify_tokens(
        &self,
        texts: &[String],
    ) -> Result<Vec<Vec<String>>, TokenClassifierError>;

    async fn health_check(&self) -> Result<(), TokenClassifierError>;
}
