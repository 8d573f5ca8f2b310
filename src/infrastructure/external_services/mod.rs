pub mod classifier_client;
pub mod embeddings_client;
pub mod local_file_storage;
pub mod ollama_generator;
pub mod pdf_text_extractor;

pub use classifier_client::ClassifierClient;
pub use embeddings_client::EmbeddingsClient;
pub use local_file_storage::LocalFileStorage;
pub use ollama_generator::OllamaGenerator;
pub use pdf_text_extractor::PdfTextExtractor;
