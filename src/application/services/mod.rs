pub mod analysis_pipeline;
pub mod chat_service;
pub mod clause_extraction;
pub mod clause_segmenter;
pub mod clause_summarizer;
pub mod document_summarizer;
pub mod retrieval_service;

pub use analysis_pipeline::AnalysisPipelineService;
pub use chat_service::ChatService;
pub use clause_extraction::ClauseExtractionService;
pub use clause_segmenter::ClauseSegmenter;
pub use clause_summarizer::ClauseSummarizerService;
pub use document_summarizer::DocumentSummarizerService;
pub use retrieval_service::RetrievalService;
