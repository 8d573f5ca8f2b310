use async_trait::async_trait;
use futures::stream::BoxStream;

#[derive(Debug)]
pub enum TextGeneratorError {
    ProviderUnavailable(String),
    GenerationFailed(String),
    InvalidResponse(String),
}

impl std::fmt::Display for TextGeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextGeneratorError::ProviderUnavailable(msg) => {
                write!(f, "Generation provider unavailable: {}", msg)
            }
            TextGeneratorError::GenerationFailed(msg) => write!(f, "Generation failed: {}", msg),
            TextGeneratorError::InvalidResponse(msg) => {
                write!(f, "Malformed provider response: {}", msg)
            }
        }
    }
}

impl std::error::Error for TextGeneratorError {}

/// Incremental text fragments from a streaming generation call.
pub type TextChunkStream = BoxStream<'static, Result<String, TextGeneratorError>>;

/// External text-completion service. Treated as unreliable: every call site
/// owns its fallback behavior.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, TextGeneratorError>;

    /// Same contract as `generate`, yielding fragments as they arrive.
    async fn generate_stream(&self, prompt: &str) -> Result<TextChunkStream, TextGeneratorError>;
}
