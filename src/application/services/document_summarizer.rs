use std::sync::Arc;

use futures::future::join_all;

use crate::application::ports::text_extractor::MIN_EXTRACTED_CHARS;
use crate::application::ports::text_generator::TextGenerator;

/// Target chunk size and overlap, in bytes of (predominantly ASCII) text.
pub const DOC_CHUNK_SIZE: usize = 4000;
pub const DOC_CHUNK_OVERLAP: usize = 200;

/// Returned without any model call when the input is below the minimum.
pub const TOO_SHORT_MESSAGE: &str = "Not enough text to generate a document summary.";

/// Returned when no chunk summary could be produced, or the merge failed.
pub const SUMMARY_FAILED_MESSAGE: &str = "Document summary unavailable due to processing error.";

/// Split points are only accepted in the tail of a window so chunks stay
/// near the target size.
const SNAP_FLOOR_RATIO: usize = 2;

/// Separator preference when snapping a chunk boundary: paragraph, line,
/// sentence, word.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

/// Map-reduce summarizer over the full raw document text: overlapping
/// chunks are summarized independently (map), surviving chunk summaries are
/// merged into one executive summary (reduce). Shares no state with
/// clause-level summarization, so the two phases run concurrently in the
/// pipeline.
pub struct DocumentSummarizerService {
    generator: Arc<dyn TextGenerator>,
}

impl DocumentSummarizerService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn summarize(&self, text: &str) -> String {
        if text.trim().len() < MIN_EXTRACTED_CHARS {
            return TOO_SHORT_MESSAGE.to_string();
        }

        let chunks = split_with_overlap(text, DOC_CHUNK_SIZE, DOC_CHUNK_OVERLAP);
        let total_chunks = chunks.len();

        let prompts: Vec<String> = chunks.iter().map(|c| build_chunk_prompt(c)).collect();
        let map_results =
            join_all(prompts.iter().map(|prompt| self.generator.generate(prompt))).await;

        let chunk_summaries: Vec<String> = map_results
            .into_iter()
            .enumerate()
            .filter_map(|(i, result)| match result {
                Ok(summary) => Some(summary.trim().to_string()),
                Err(e) => {
                    tracing::warn!(
                        "Chunk {}/{} summarization failed, skipping: {}",
                        i + 1,
                        total_chunks,
                        e
                    );
                    None
                }
            })
            .filter(|s| !s.is_empty())
            .collect();

        if chunk_summaries.is_empty() {
            tracing::warn!("No chunk summaries produced, skipping merge");
            return SUMMARY_FAILED_MESSAGE.to_string();
        }

        match self
            .generator
            .generate(&build_merge_prompt(&chunk_summaries))
            .await
        {
            Ok(summary) => summary.trim().to_string(),
            Err(e) => {
                tracing::warn!("Executive summary merge failed: {}", e);
                SUMMARY_FAILED_MESSAGE.to_string()
            }
        }
    }
}

fn build_chunk_prompt(chunk: &str) -> String {
    format!(
        "You are an expert legal analyst. Summarize the following contract excerpt.\n\
         Capture the key terms, dates, figures, and obligations it contains.\n\
         Be concise and factual.\n\
         \n\
         EXCERPT:\n\
         {chunk}\n\
         \n\
         Summary:",
    )
}

fn build_merge_prompt(chunk_summaries: &[String]) -> String {
    format!(
        "You are a Senior Legal Partner. Based on the section summaries below, write an Executive Summary.\n\
         \n\
         SECTION SUMMARIES:\n\
         - {summaries}\n\
         \n\
         FORMAT:\n\
         - **Core Purpose**: what the agreement covers\n\
         - **Key Terms**: the obligations, payments, and deadlines that matter\n\
         - **Critical Risks**: liability, termination, and dispute exposure\n\
         \n\
         Executive Summary:",
        summaries = chunk_summaries.join("\n- "),
    )
}

/// Partition `text` into overlapping windows of at most `chunk_size` bytes,
/// snapping each cut to the best available separator (paragraph, then line,
/// then sentence, then word) in the window's tail. The next window starts
/// `overlap` bytes before the previous cut.
pub fn split_with_overlap(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let mut end = (start + chunk_size).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        if end < text.len() {
            end = snap_to_separator(text, start, end);
        }

        chunks.push(text[start..end].to_string());

        if end >= text.len() {
            break;
        }

        let mut next = end.saturating_sub(overlap).max(start + 1);
        while !text.is_char_boundary(next) {
            next += 1;
        }
        start = next;
    }

    chunks
}

fn snap_to_separator(text: &str, start: usize, end: usize) -> usize {
    let window = &text[start..end];
    let floor = window.len() / SNAP_FLOOR_RATIO;

    for sep in SEPARATORS {
        if let Some(pos) = window.rfind(sep) {
            if pos >= floor {
                return start + pos + sep.len();
            }
        }
    }

    end
}
