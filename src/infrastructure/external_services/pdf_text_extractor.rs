use async_trait::async_trait;
use lopdf::Document;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::application::ports::text_extractor::{
    ExtractedText, TextExtractionError, TextExtractor,
};

/// lopdf-backed extractor. Loading and text extraction are CPU-bound, so the
/// whole read runs on the blocking pool with pages extracted in parallel;
/// a page that fails to extract is skipped with a warning.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(file_path: &str) -> Result<ExtractedText, TextExtractionError> {
        let doc = Document::load(file_path)
            .map_err(|e| TextExtractionError::CorruptedFile(e.to_string()))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let page_count = page_numbers.len() as i32;

        let extracted: Vec<Result<(u32, String), (u32, String)>> = page_numbers
            .into_par_iter()
            .map(|page_num| {
                doc.extract_text(&[page_num])
                    .map(|text| (page_num, text))
                    .map_err(|e| (page_num, e.to_string()))
            })
            .collect();

        let mut pages: Vec<(u32, String)> = Vec::new();
        let mut skipped_pages = 0;

        for result in extracted {
            match result {
                Ok((page_num, text)) => pages.push((page_num, text)),
                Err((page_num, error)) => {
                    skipped_pages += 1;
                    tracing::warn!(
                        "Skipping unreadable page {} of {}: {}",
                        page_num,
                        file_path,
                        error
                    );
                }
            }
        }

        pages.sort_by_key(|(page_num, _)| *page_num);

        let text = pages
            .into_iter()
            .map(|(_, text)| text.trim_end().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        Ok(ExtractedText {
            text,
            page_count,
            skipped_pages,
        })
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, file_path: &str) -> Result<ExtractedText, TextExtractionError> {
        let path = file_path.to_string();

        tokio::task::spawn_blocking(move || Self::extract_blocking(&path))
            .await
            .map_err(|e| TextExtractionError::ExtractionFailed(format!("Task join error: {}", e)))?
    }
}
