use async_trait::async_trait;

/// Extracted length below this is treated as "too short to summarize".
pub const MIN_EXTRACTED_CHARS: usize = 50;

#[derive(Debug)]
pub enum TextExtractionError {
    UnsupportedFormat(String),
    CorruptedFile(String),
    ExtractionFailed(String),
    IoError(String),
}

impl std::fmt::Display for TextExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextExtractionError::UnsupportedFormat(msg) => {
                write!(f, "Unsupported format: {}", msg)
            }
            TextExtractionError::CorruptedFile(msg) => write!(f, "Corrupted file: {}", msg),
            TextExtractionError::ExtractionFailed(msg) => write!(f, "Extraction failed: {}", msg),
            TextExtractionError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for TextExtractionError {}

/// Result of extracting a document. `skipped_pages` records pages that
/// failed individually; a document where every page failed still produces a
/// value, with `text` empty, so callers get an explicit too-short signal
/// rather than an opaque error.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub page_count: i32,
    pub skipped_pages: i32,
}

impl ExtractedText {
    pub fn is_too_short(&self) -> bool {
        self.text.trim().len() < MIN_EXTRACTED_CHARS
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract page texts joined by newlines, trimmed. Per-page failures are
    /// skipped with a logged warning, never fatal.
    async fn extract(&self, file_path: &str) -> Result<ExtractedText, TextExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_short_signal() {
        let short = ExtractedText {
            text: "ten chars.".to_string(),
            page_count: 1,
            skipped_pages: 0,
        };
        assert!(short.is_too_short());

        let long = ExtractedText {
            text: "x".repeat(MIN_EXTRACTED_CHARS),
            page_count: 1,
            skipped_pages: 0,
        };
        assert!(!long.is_too_short());
    }
}
