use std::{env, sync::Arc};

use crate::{
    application::{
        ports::{
            ClauseRetriever, EmbeddingProvider, FileStorage, JobQueue, TextExtractor,
            TextGenerator, TokenClassifier,
        },
        services::{
            AnalysisPipelineService, ChatService, ClauseExtractionService,
            ClauseSummarizerService, DocumentSummarizerService, RetrievalService,
        },
        use_cases::{
            GetConversationUseCase, GetJobStatusUseCase, SendChatMessageUseCase,
            StartAnalysisUseCase, SuggestQuestionsUseCase, SummarizeClauseUseCase,
            UploadDocumentUseCase,
        },
    },
    domain::{
        entities::AnalysisMode,
        repositories::{
            ClauseCacheRepository, ClauseEmbeddingRepository, ConversationRepository,
            DocumentRepository, JobRepository, MessageRepository,
        },
    },
    infrastructure::{
        database::{
            create_connection_pool, get_connection_from_pool,
            repositories::{
                PostgresClauseCacheRepository, PostgresClauseEmbeddingRepository,
                PostgresConversationRepository, PostgresDocumentRepository,
                PostgresJobRepository, PostgresMessageRepository,
            },
            run_migrations,
        },
        external_services::{
            ClassifierClient, EmbeddingsClient, LocalFileStorage, OllamaGenerator,
            PdfTextExtractor,
        },
        external_services::ollama_generator::OllamaGeneratorConfig,
        messaging::{BackgroundProcessor, MpscJobQueue},
    },
    presentation::http::handlers::{ChatHandler, DocumentHandler, JobHandler},
};

pub struct AppContainer {
    // Repositories
    pub document_repository: Arc<dyn DocumentRepository>,
    pub job_repository: Arc<dyn JobRepository>,
    pub clause_cache_repository: Arc<dyn ClauseCacheRepository>,
    pub clause_embedding_repository: Arc<dyn ClauseEmbeddingRepository>,
    pub conversation_repository: Arc<dyn ConversationRepository>,
    pub message_repository: Arc<dyn MessageRepository>,

    // External services
    pub token_classifier: Arc<dyn TokenClassifier>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub file_storage: Arc<dyn FileStorage>,

    // Job queue and background processing
    pub job_queue: Arc<dyn JobQueue>,
    pub background_processor: Arc<BackgroundProcessor>,

    // Application services
    pub retriever: Arc<dyn ClauseRetriever>,
    pub chat_service: Arc<ChatService>,

    // Use cases
    pub upload_document_use_case: Arc<UploadDocumentUseCase>,
    pub start_analysis_use_case: Arc<StartAnalysisUseCase>,
    pub get_job_status_use_case: Arc<GetJobStatusUseCase>,
    pub summarize_clause_use_case: Arc<SummarizeClauseUseCase>,
    pub send_chat_message_use_case: Arc<SendChatMessageUseCase>,
    pub suggest_questions_use_case: Arc<SuggestQuestionsUseCase>,
    pub get_conversation_use_case: Arc<GetConversationUseCase>,

    // HTTP handlers
    pub document_handler: Arc<DocumentHandler>,
    pub job_handler: Arc<JobHandler>,
    pub chat_handler: Arc<ChatHandler>,
}

impl AppContainer {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let db_pool = create_connection_pool()?;
        {
            let mut conn = get_connection_from_pool(&db_pool)
                .map_err(|e| format!("Failed to check out a database connection: {}", e))?;
            run_migrations(&mut conn).map_err(|e| format!("Failed to run migrations: {}", e))?;
        }

        // Repositories
        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
        let job_repository: Arc<dyn JobRepository> =
            Arc::new(PostgresJobRepository::new(db_pool.clone()));
        let clause_cache_repository: Arc<dyn ClauseCacheRepository> =
            Arc::new(PostgresClauseCacheRepository::new(db_pool.clone()));
        let clause_embedding_repository: Arc<dyn ClauseEmbeddingRepository> =
            Arc::new(PostgresClauseEmbeddingRepository::new(db_pool.clone()));
        let conversation_repository: Arc<dyn ConversationRepository> =
            Arc::new(PostgresConversationRepository::new(db_pool.clone()));
        let message_repository: Arc<dyn MessageRepository> =
            Arc::new(PostgresMessageRepository::new(db_pool));

        // External inference services. The classifier is the one dependency
        // that must be up before we accept work: verify it now and fail
        // fast, rather than mislabeling clauses later.
        let token_classifier: Arc<dyn TokenClassifier> = Arc::new(
            ClassifierClient::from_env()
                .map_err(|e| format!("Failed to create classifier client: {}", e))?,
        );
        token_classifier
            .health_check()
            .await
            .map_err(|e| format!("Token classifier unavailable at startup: {}", e))?;

        let embedding_provider: Arc<dyn EmbeddingProvider> = Arc::new(
            EmbeddingsClient::from_env()
                .map_err(|e| format!("Failed to create embeddings client: {}", e))?,
        );

        let summary_generator: Arc<dyn TextGenerator> = Arc::new(
            OllamaGenerator::new(OllamaGeneratorConfig::summarization_from_env())
                .map_err(|e| format!("Failed to create summarization generator: {}", e))?,
        );
        let chat_generator: Arc<dyn TextGenerator> = Arc::new(
            OllamaGenerator::new(OllamaGeneratorConfig::chat_from_env())
                .map_err(|e| format!("Failed to create chat generator: {}", e))?,
        );

        let text_extractor: Arc<dyn TextExtractor> = Arc::new(PdfTextExtractor::new());
        let file_storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::from_env());

        let model_version =
            env::var("LLM_MODEL_VERSION").unwrap_or_else(|_| "llama3-legal-v1".to_string());
        let prompt_version =
            env::var("LLM_PROMPT_VERSION").unwrap_or_else(|_| "v2.0-context-aware".to_string());
        let analysis_mode = match env::var("DEFERRED_CLAUSE_SUMMARIES").as_deref() {
            Ok("1") | Ok("true") => AnalysisMode::Deferred,
            _ => AnalysisMode::Eager,
        };

        // Application services
        let retriever: Arc<dyn ClauseRetriever> = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            clause_embedding_repository.clone(),
        ));

        let extraction_service = Arc::new(ClauseExtractionService::new(
            text_extractor.clone(),
            token_classifier.clone(),
            clause_cache_repository.clone(),
        ));

        let clause_summarizer = Arc::new(ClauseSummarizerService::new(
            summary_generator.clone(),
            retriever.clone(),
            model_version.clone(),
            prompt_version.clone(),
        ));

        let document_summarizer = Arc::new(DocumentSummarizerService::new(summary_generator));

        let pipeline = Arc::new(AnalysisPipelineService::new(
            extraction_service,
            retriever.clone(),
            clause_summarizer.clone(),
            document_summarizer,
            document_repository.clone(),
        ));

        let chat_service = Arc::new(ChatService::new(
            chat_generator,
            retriever.clone(),
            conversation_repository.clone(),
            message_repository.clone(),
        ));

        // Job queue and worker pool
        let (job_queue, job_receiver) = MpscJobQueue::create_pair();
        let job_queue: Arc<dyn JobQueue> = Arc::new(job_queue);

        let worker_count = env::var("ANALYSIS_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let background_processor = Arc::new(
            BackgroundProcessor::new(
                Arc::new(job_receiver),
                job_repository.clone(),
                document_repository.clone(),
                pipeline,
            )
            .with_worker_count(worker_count),
        );

        // Use cases
        let upload_document_use_case = Arc::new(UploadDocumentUseCase::new(
            document_repository.clone(),
            file_storage.clone(),
        ));

        let start_analysis_use_case = Arc::new(StartAnalysisUseCase::new(
            document_repository.clone(),
            job_repository.clone(),
            job_queue.clone(),
            analysis_mode,
            model_version,
            prompt_version,
        ));

        let get_job_status_use_case = Arc::new(GetJobStatusUseCase::new(job_repository.clone()));

        let summarize_clause_use_case =
            Arc::new(SummarizeClauseUseCase::new(clause_summarizer));

        let send_chat_message_use_case = Arc::new(SendChatMessageUseCase::new(
            document_repository.clone(),
            chat_service.clone(),
        ));

        let suggest_questions_use_case = Arc::new(SuggestQuestionsUseCase::new(
            job_repository.clone(),
            clause_embedding_repository.clone(),
            chat_service.clone(),
        ));

        let get_conversation_use_case = Arc::new(GetConversationUseCase::new(
            conversation_repository.clone(),
            message_repository.clone(),
        ));

        // HTTP handlers
        let document_handler = Arc::new(DocumentHandler::new(upload_document_use_case.clone()));
        let job_handler = Arc::new(JobHandler::new(
            start_analysis_use_case.clone(),
            get_job_status_use_case.clone(),
            summarize_clause_use_case.clone(),
            suggest_questions_use_case.clone(),
        ));
        let chat_handler = Arc::new(ChatHandler::new(
            send_chat_message_use_case.clone(),
            get_conversation_use_case.clone(),
        ));

        Ok(Self {
            document_repository,
            job_repository,
            clause_cache_repository,
            clause_embedding_repository,
            conversation_repository,
            message_repository,
            token_classifier,
            embedding_provider,
            file_storage,
            job_queue,
            background_processor,
            retriever,
            chat_service,
            upload_document_use_case,
            start_analysis_use_case,
            get_job_status_use_case,
            summarize_clause_use_case,
            send_chat_message_use_case,
            suggest_questions_use_case,
            get_conversation_use_case,
            document_handler,
            job_handler,
            chat_handler,
        })
    }
}
