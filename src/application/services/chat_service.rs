use std::sync::Arc;

use futures::StreamExt;
use uuid::Uuid;

use crate::application::ports::clause_retriever::{ClauseRetriever, RetrievedClause};
use crate::application::ports::text_generator::{
    TextChunkStream, TextGenerator, TextGeneratorError,
};
use crate::domain::entities::{Conversation, Message, SourceCitation};
use crate::domain::repositories::{ConversationRepository, MessageRepository};
use crate::domain::value_objects::ClauseCategory;

/// Messages containing any of these always take the retrieval-augmented
/// path, whatever else they contain.
const DOCUMENT_KEYWORDS: [&str; 20] = [
    "clause",
    "section",
    "term",
    "condition",
    "obligation",
    "contract",
    "agreement",
    "document",
    "states",
    "says",
    "according",
    "specified",
    "mentioned",
    "payment",
    "liability",
    "termination",
    "deadline",
    "date",
    "party",
    "parties",
];

const GREETINGS: [&str; 5] = ["hello", "hi", "hey", "thanks", "thank you"];

/// Prior messages included as conversation history.
const HISTORY_LIMIT: i64 = 5;

/// Clauses retrieved as answer context.
const CHAT_RETRIEVAL_K: usize = 3;

/// Citation excerpts are trimmed to this many characters.
const EXCERPT_MAX_CHARS: usize = 200;

const CHAT_FALLBACK: &str =
    "I apologize, but I encountered an error processing your question. Please try again.";

const QUICK_REPLY_FALLBACK: &str = "Hello! How can I help you understand your contract today?";

const SYSTEM_PROMPT: &str = "You are an expert legal assistant specialized in contract analysis. \
Answer questions accurately based only on the contract content provided, cite specific clauses \
when relevant, explain legal terms in plain language, and state clearly when the information is \
not present in the provided context.";

pub const DEFAULT_SUGGESTED_QUESTIONS: [&str; 4] = [
    "What are the key obligations in this contract?",
    "What are the termination conditions?",
    "Are there any payment terms specified?",
    "What are the main risks or liabilities?",
];

#[derive(Debug)]
pub enum ChatServiceError {
    ConversationNotFound(Uuid),
    AccessDenied(Uuid),
    RetrievalFailed(String),
    StorageError(String),
}

impl std::fmt::Display for ChatServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatServiceError::ConversationNotFound(id) => {
                write!(f, "Conversation not found: {}", id)
            }
            ChatServiceError::AccessDenied(id) => {
                write!(f, "Conversation {} belongs to another user", id)
            }
            ChatServiceError::RetrievalFailed(msg) => write!(f, "Retrieval failed: {}", msg),
            ChatServiceError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for ChatServiceError {}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub user_id: String,
    pub document_id: Uuid,
    pub conversation_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub conversation_id: Uuid,
    pub answer: String,
    pub sources: Vec<SourceCitation>,
}

/// Multi-turn chat over one analyzed document. Each exchange routes to
/// either a quick canned-style reply or a retrieval-augmented answer with
/// citations; both paths end with the assistant message persisted.
pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
    retriever: Arc<dyn ClauseRetriever>,
    conversation_repository: Arc<dyn ConversationRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl ChatService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        retriever: Arc<dyn ClauseRetriever>,
        conversation_repository: Arc<dyn ConversationRepository>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            generator,
            retriever,
            conversation_repository,
            message_repository,
        }
    }

    pub async fn respond(&self, request: ChatRequest) -> Result<ChatResponse, ChatServiceError> {
        let (mut conversation, history) = self.open_exchange(&request).await?;

        let (answer, sources) = if needs_retrieval(&request.message) {
            let retrieved = self
                .retriever
                .retrieve(request.document_id, &request.message, CHAT_RETRIEVAL_K)
                .await
                .map_err(|e| ChatServiceError::RetrievalFailed(e.to_string()))?;

            let prompt = build_rag_prompt(&retrieved, &history, &request.message);
            match self.generator.generate(&prompt).await {
                Ok(answer) => (answer.trim().to_string(), citations(&retrieved)),
                Err(e) => {
                    tracing::warn!("Chat generation failed: {}", e);
                    (CHAT_FALLBACK.to_string(), Vec::new())
                }
            }
        } else {
            let prompt = build_quick_prompt(&request.message);
            let answer = match self.generator.generate(&prompt).await {
                Ok(answer) => answer.trim().to_string(),
                Err(e) => {
                    tracing::warn!("Quick reply generation failed: {}", e);
                    QUICK_REPLY_FALLBACK.to_string()
                }
            };
            (answer, Vec::new())
        };

        self.append_assistant_message(&mut conversation, answer.clone(), sources.clone())
            .await?;

        Ok(ChatResponse {
            conversation_id: conversation.id(),
            answer,
            sources,
        })
    }

    /// Streaming variant: same routing and context assembly, but fragments
    /// are yielded as they arrive and the concatenation is persisted as the
    /// assistant message only once the stream has completed.
    pub async fn respond_stream(
        &self,
        request: ChatRequest,
    ) -> Result<(Uuid, TextChunkStream), ChatServiceError> {
        let (conversation, history) = self.open_exchange(&request).await?;
        let conversation_id = conversation.id();

        let (prompt, sources) = if needs_retrieval(&request.message) {
            let retrieved = self
                .retriever
                .retrieve(request.document_id, &request.message, CHAT_RETRIEVAL_K)
                .await
                .map_err(|e| ChatServiceError::RetrievalFailed(e.to_string()))?;

            let prompt = build_rag_prompt(&retrieved, &history, &request.message);
            (prompt, citations(&retrieved))
        } else {
            (build_quick_prompt(&request.message), Vec::new())
        };

        let upstream = self.generator.generate_stream(&prompt).await;

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<String>();
        let conversations = self.conversation_repository.clone();
        let messages = self.message_repository.clone();

        tokio::spawn(async move {
            let mut conversation = conversation;
            let mut full = String::new();

            match upstream {
                Ok(mut stream) => {
                    while let Some(item) = stream.next().await {
                        match item {
                            Ok(fragment) => {
                                full.push_str(&fragment);
                                if tx.send(fragment).is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::warn!("Chat stream interrupted: {}", e);
                                break;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Chat stream unavailable: {}", e);
                    full = CHAT_FALLBACK.to_string();
                    let _ = tx.send(full.clone());
                }
            }

            if full.is_empty() {
                full = CHAT_FALLBACK.to_string();
                let _ = tx.send(full.clone());
            }

            let assistant = Message::assistant(conversation.id(), full, sources);
            if let Err(e) = messages.save(&assistant).await {
                tracing::error!("Failed to persist streamed assistant message: {}", e);
            }
            conversation.record_message(false, assistant.content());
            if let Err(e) = conversations.update(&conversation).await {
                tracing::error!("Failed to update conversation after stream: {}", e);
            }
            // tx drops here, ending the downstream after persistence.
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv()
                .await
                .map(|fragment| (Ok::<_, TextGeneratorError>(fragment), rx))
        })
        .boxed();

        Ok((conversation_id, stream))
    }

    /// Up to 4 short candidate questions for a document. Degrades to a fixed
    /// default list on any failure; never fails the caller.
    pub async fn suggest_questions(
        &self,
        document_summary: &str,
        categories: &[ClauseCategory],
    ) -> Vec<String> {
        let doc_type = infer_contract_type(categories);
        let prompt = build_suggestions_prompt(document_summary, doc_type);

        let parsed = match self.generator.generate(&prompt).await {
            Ok(response) => parse_numbered_list(&response),
            Err(e) => {
                tracing::warn!("Suggested question generation failed: {}", e);
                Vec::new()
            }
        };

        if parsed.is_empty() {
            DEFAULT_SUGGESTED_QUESTIONS
                .iter()
                .map(|q| q.to_string())
                .collect()
        } else {
            parsed
        }
    }

    /// Resolve or create the conversation, capture the prior history window,
    /// and persist the incoming user message.
    async fn open_exchange(
        &self,
        request: &ChatRequest,
    ) -> Result<(Conversation, Vec<Message>), ChatServiceError> {
        let mut conversation = match request.conversation_id {
            Some(id) => {
                let conversation = self
                    .conversation_repository
                    .find_by_id(id)
                    .await
                    .map_err(|e| ChatServiceError::StorageError(e.to_string()))?
                    .ok_or(ChatServiceError::ConversationNotFound(id))?;

                if !conversation.is_owned_by(&request.user_id) {
                    return Err(ChatServiceError::AccessDenied(id));
                }
                conversation
            }
            None => {
                let conversation =
                    Conversation::new(request.user_id.clone(), request.document_id);
                self.conversation_repository
                    .save(&conversation)
                    .await
                    .map_err(|e| ChatServiceError::StorageError(e.to_string()))?;
                conversation
            }
        };

        let history = self
            .message_repository
            .find_recent(conversation.id(), HISTORY_LIMIT)
            .await
            .map_err(|e| ChatServiceError::StorageError(e.to_string()))?;

        let user_message = Message::user(conversation.id(), request.message.clone());
        self.message_repository
            .save(&user_message)
            .await
            .map_err(|e| ChatServiceError::StorageError(e.to_string()))?;

        conversation.record_message(true, &request.message);
        self.conversation_repository
            .update(&conversation)
            .await
            .map_err(|e| ChatServiceError::StorageError(e.to_string()))?;

        Ok((conversation, history))
    }

    async fn append_assistant_message(
        &self,
        conversation: &mut Conversation,
        answer: String,
        sources: Vec<SourceCitation>,
    ) -> Result<(), ChatServiceError> {
        let message = Message::assistant(conversation.id(), answer, sources);
        self.message_repository
            .save(&message)
            .await
            .map_err(|e| ChatServiceError::StorageError(e.to_string()))?;

        conversation.record_message(false, message.content());
        self.conversation_repository
            .update(conversation)
            .await
            .map_err(|e| ChatServiceError::StorageError(e.to_string()))?;

        Ok(())
    }
}

/// Routing decision for one incoming message. Document keywords take
/// precedence over greeting matches, and the default favors retrieval:
/// over-retrieving is safer than under-informing.
pub fn needs_retrieval(message: &str) -> bool {
    let lowered = message.to_lowercase();

    if DOCUMENT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return true;
    }

    if GREETINGS.iter().any(|g| lowered.contains(g)) {
        return false;
    }

    true
}

/// Contract type inferred by counting clause categories against a small
/// rule table.
pub fn infer_contract_type(categories: &[ClauseCategory]) -> &'static str {
    if categories.is_empty() {
        return "general contract";
    }

    let count = |label: &str| categories.iter().filter(|c| c.as_str() == label).count();

    if count("Employment") > 2 {
        "employment contract"
    } else if count("Payment") > 2 || count("Pricing") > 1 {
        "service agreement"
    } else if count("Confidentiality") > 1 {
        "NDA or confidentiality agreement"
    } else if count("IP") > 1 || count("License") > 1 {
        "licensing agreement"
    } else {
        "legal contract"
    }
}

/// Parse a numbered or dashed list into at most 4 questions.
pub fn parse_numbered_list(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| {
            let cleaned = line.trim();
            let first = cleaned.chars().next()?;
            if !first.is_ascii_digit() && first != '-' {
                return None;
            }
            let question = cleaned
                .trim_start_matches(|c: char| {
                    c.is_ascii_digit() || c == '.' || c == '-' || c == ')' || c == ' '
                })
                .trim();
            if question.is_empty() {
                None
            } else {
                Some(question.to_string())
            }
        })
        .take(4)
        .collect()
}

fn citations(retrieved: &[RetrievedClause]) -> Vec<SourceCitation> {
    retrieved
        .iter()
        .map(|r| SourceCitation {
            excerpt: truncate_excerpt(&r.text),
            category: r.category.as_str().to_string(),
            clause_no: r.clause_no,
        })
        .collect()
}

fn truncate_excerpt(text: &str) -> String {
    if text.chars().count() > EXCERPT_MAX_CHARS {
        let cut: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

fn format_history(history: &[Message]) -> String {
    if history.is_empty() {
        return "No previous conversation.".to_string();
    }

    history
        .iter()
        .map(|m| {
            let role = match m.role() {
                crate::domain::entities::MessageRole::User => "User",
                crate::domain::entities::MessageRole::Assistant => "Assistant",
            };
            format!("{}: {}", role, m.content())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_context(retrieved: &[RetrievedClause]) -> String {
    if retrieved.is_empty() {
        return "No relevant sections found in the document.".to_string();
    }

    retrieved
        .iter()
        .map(|r| format!("[Clause {} - {}]\n{}", r.clause_no, r.category, r.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_rag_prompt(retrieved: &[RetrievedClause], history: &[Message], question: &str) -> String {
    format!(
        "{system}\n\
         \n\
         RELEVANT CONTRACT SECTIONS:\n\
         {context}\n\
         \n\
         CONVERSATION HISTORY:\n\
         {history}\n\
         \n\
         USER QUESTION: {question}\n\
         \n\
         Based on the contract sections above and our conversation history, provide a clear and \
         accurate answer. If the answer requires information not in the provided sections, \
         clearly state that.\n\
         \n\
         ANSWER:",
        system = SYSTEM_PROMPT,
        context = format_context(retrieved),
        history = format_history(history),
        question = question,
    )
}

fn build_quick_prompt(message: &str) -> String {
    format!(
        "Respond briefly and professionally to this message: \"{message}\"\n\
         \n\
         Keep it conversational and helpful. If they're asking about the contract, suggest they \
         ask a specific question.\n\
         \n\
         Response:",
    )
}

fn build_suggestions_prompt(document_summary: &str, doc_type: &str) -> String {
    let summary: String = document_summary.chars().take(1000).collect();
    format!(
        "Based on this contract summary, generate 4 relevant questions a user might ask:\n\
         \n\
         CONTRACT SUMMARY:\n\
         {summary}\n\
         \n\
         DOCUMENT TYPE: {doc_type}\n\
         \n\
         Generate 4 short, specific questions (max 10 words each) that would be useful for \
         understanding this contract. Format as a simple numbered list.\n\
         \n\
         QUESTIONS:",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::application::ports::clause_retriever::RetrievalError;
    use crate::application::ports::text_generator::TextGeneratorError;
    use crate::domain::entities::Clause;
    use crate::domain::repositories::conversation_repository::ConversationRepositoryError;
    use crate::domain::repositories::message_repository::MessageRepositoryError;

    struct StubGenerator {
        answer: String,
        fail: bool,
        stream_fragments: Vec<String>,
    }

    impl StubGenerator {
        fn answering(answer: &str) -> Self {
            Self {
                answer: answer.to_string(),
                fail: false,
                stream_fragments: Vec::new(),
            }
        }

        fn failing() -> Self {
            Self {
                answer: String::new(),
                fail: true,
                stream_fragments: Vec::new(),
            }
        }

        fn streaming(fragments: &[&str]) -> Self {
            Self {
                answer: String::new(),
                fail: false,
                stream_fragments: fragments.iter().map(|f| f.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, TextGeneratorError> {
            if self.fail {
                Err(TextGeneratorError::GenerationFailed("down".to_string()))
            } else {
                Ok(self.answer.clone())
            }
        }

        async fn generate_stream(
            &self,
            _prompt: &str,
        ) -> Result<TextChunkStream, TextGeneratorError> {
            if self.fail {
                return Err(TextGeneratorError::ProviderUnavailable("down".to_string()));
            }
            let fragments = self.stream_fragments.clone();
            Ok(futures::stream::iter(
                fragments.into_iter().map(Ok::<_, TextGeneratorError>),
            )
            .boxed())
        }
    }

    struct CountingRetriever {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingRetriever {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl ClauseRetriever for CountingRetriever {
        async fn index_document(
            &self,
            _document_id: Uuid,
            _clauses: &[Clause],
        ) -> Result<(), RetrievalError> {
            Ok(())
        }

        async fn retrieve(
            &self,
            document_id: Uuid,
            _query: &str,
            _k: usize,
        ) -> Result<Vec<RetrievedClause>, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RetrievalError::IndexNotAvailable(document_id));
            }
            Ok(vec![RetrievedClause {
                clause_no: 7,
                category: ClauseCategory::new("Termination"),
                text: "t".repeat(250),
                similarity: 0.95,
            }])
        }
    }

    #[derive(Default)]
    struct InMemoryConversations {
        rows: Mutex<HashMap<Uuid, Conversation>>,
    }

    #[async_trait]
    impl ConversationRepository for InMemoryConversations {
        async fn save(
            &self,
            conversation: &Conversation,
        ) -> Result<(), ConversationRepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(conversation.id(), conversation.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            id: Uuid,
        ) -> Result<Option<Conversation>, ConversationRepositoryError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_user(
            &self,
            user_id: &str,
            document_id: Option<Uuid>,
            _limit: i64,
        ) -> Result<Vec<Conversation>, ConversationRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|c| c.user_id() == user_id)
                .filter(|c| document_id.map(|d| c.document_id() == d).unwrap_or(true))
                .cloned()
                .collect())
        }

        async fn update(
            &self,
            conversation: &Conversation,
        ) -> Result<(), ConversationRepositoryError> {
            self.rows
                .lock()
                .unwrap()
                .insert(conversation.id(), conversation.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct InMemoryMessages {
        rows: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl MessageRepository for InMemoryMessages {
        async fn save(&self, message: &Message) -> Result<(), MessageRepositoryError> {
            self.rows.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn find_by_conversation(
            &self,
            conversation_id: Uuid,
        ) -> Result<Vec<Message>, MessageRepositoryError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.conversation_id() == conversation_id)
                .cloned()
                .collect())
        }

        async fn find_recent(
            &self,
            conversation_id: Uuid,
            limit: i64,
        ) -> Result<Vec<Message>, MessageRepositoryError> {
            let all: Vec<Message> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.conversation_id() == conversation_id)
                .cloned()
                .collect();
            let skip = all.len().saturating_sub(limit as usize);
            Ok(all.into_iter().skip(skip).collect())
        }
    }

    struct Harness {
        service: ChatService,
        retriever: Arc<CountingRetriever>,
        conversations: Arc<InMemoryConversations>,
        messages: Arc<InMemoryMessages>,
    }

    fn harness(generator: StubGenerator, retriever_fails: bool) -> Harness {
        let retriever = Arc::new(CountingRetriever::new(retriever_fails));
        let conversations = Arc::new(InMemoryConversations::default());
        let messages = Arc::new(InMemoryMessages::default());
        let service = ChatService::new(
            Arc::new(generator),
            retriever.clone(),
            conversations.clone(),
            messages.clone(),
        );
        Harness {
            service,
            retriever,
            conversations,
            messages,
        }
    }

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            user_id: "user-1".to_string(),
            document_id: Uuid::new_v4(),
            conversation_id: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_greeting_routes_to_quick_reply() {
        assert!(!needs_retrieval("Hello"));
        assert!(!needs_retrieval("hey there"));
        assert!(!needs_retrieval("Thank you!"));
    }

    #[test]
    fn test_document_keyword_forces_retrieval() {
        assert!(needs_retrieval("What is the termination notice period?"));
        // Keyword presence beats a greeting match.
        assert!(needs_retrieval("Thanks, and what does the contract say?"));
    }

    #[test]
    fn test_default_routing_favors_retrieval() {
        assert!(needs_retrieval("What happens if we breach?"));
    }

    #[tokio::test]
    async fn test_quick_path_issues_no_retrieval_call() {
        let h = harness(StubGenerator::answering("Happy to help!"), false);

        let response = h.service.respond(request("Hello")).await.unwrap();

        assert_eq!(response.answer, "Happy to help!");
        assert!(response.sources.is_empty());
        assert_eq!(h.retriever.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rag_path_cites_retrieved_clauses() {
        let h = harness(StubGenerator::answering("Thirty days, per clause 7."), false);

        let response = h
            .service
            .respond(request("What is the termination notice period?"))
            .await
            .unwrap();

        assert_eq!(h.retriever.calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].clause_no, 7);
        assert_eq!(response.sources[0].category, "Termination");
        // 200-char excerpt plus ellipsis.
        assert_eq!(response.sources[0].excerpt.chars().count(), 203);
    }

    #[tokio::test]
    async fn test_rag_path_requires_retrieval() {
        let h = harness(StubGenerator::answering("unused"), true);

        let result = h
            .service
            .respond(request("What is the termination notice period?"))
            .await;

        assert!(matches!(result, Err(ChatServiceError::RetrievalFailed(_))));
    }

    #[tokio::test]
    async fn test_generation_failure_degrades_to_fallback() {
        let h = harness(StubGenerator::failing(), false);

        let response = h
            .service
            .respond(request("What is the termination notice period?"))
            .await
            .unwrap();

        assert_eq!(response.answer, CHAT_FALLBACK);
        assert!(response.sources.is_empty());
    }

    #[tokio::test]
    async fn test_exchange_persists_both_messages_and_titles_conversation() {
        let h = harness(StubGenerator::answering("Net thirty."), false);

        let response = h
            .service
            .respond(request("What are the payment terms?"))
            .await
            .unwrap();

        let stored = h
            .messages
            .find_by_conversation(response.conversation_id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].content(), "What are the payment terms?");
        assert_eq!(stored[1].content(), "Net thirty.");

        let conversation = h
            .conversations
            .find_by_id(response.conversation_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(conversation.title(), "What are the payment terms?");
        assert_eq!(conversation.message_count(), 2);
    }

    #[tokio::test]
    async fn test_existing_conversation_of_other_user_is_denied() {
        let h = harness(StubGenerator::answering("answer"), false);
        let other = Conversation::new("user-2".to_string(), Uuid::new_v4());
        h.conversations.save(&other).await.unwrap();

        let mut req = request("What are the payment terms?");
        req.conversation_id = Some(other.id());

        let result = h.service.respond(req).await;
        assert!(matches!(result, Err(ChatServiceError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_stream_persists_full_concatenation_after_completion() {
        let h = harness(
            StubGenerator::streaming(&["The notice ", "period is ", "30 days."]),
            false,
        );

        let (conversation_id, mut stream) = h
            .service
            .respond_stream(request("What is the termination notice period?"))
            .await
            .unwrap();

        let mut received = String::new();
        while let Some(fragment) = stream.next().await {
            received.push_str(&fragment.unwrap());
        }
        assert_eq!(received, "The notice period is 30 days.");

        // The stream only ends after the assistant message is persisted.
        let stored = h.messages.find_by_conversation(conversation_id).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].content(), "The notice period is 30 days.");
        assert_eq!(stored[1].sources().len(), 1);
    }

    #[tokio::test]
    async fn test_suggestions_parse_numbered_list() {
        let h = harness(
            StubGenerator::answering(
                "1. What are the payment terms?\n2) Who owns the IP?\n- When does it expire?\nnot a list line\n4. What law governs?\n5. Extra question?",
            ),
            false,
        );

        let questions = h.service.suggest_questions("summary", &[]).await;

        assert_eq!(
            questions,
            vec![
                "What are the payment terms?",
                "Who owns the IP?",
                "When does it expire?",
                "What law governs?",
            ]
        );
    }

    #[tokio::test]
    async fn test_suggestions_fall_back_on_failure() {
        let h = harness(StubGenerator::failing(), false);

        let questions = h.service.suggest_questions("summary", &[]).await;

        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0], DEFAULT_SUGGESTED_QUESTIONS[0]);
    }

    #[test]
    fn test_contract_type_rule_table() {
        let cats = |labels: &[&str]| -> Vec<ClauseCategory> {
            labels.iter().map(|l| ClauseCategory::new(*l)).collect()
        };

        assert_eq!(infer_contract_type(&[]), "general contract");
        assert_eq!(
            infer_contract_type(&cats(&["Employment", "Employment", "Employment"])),
            "employment contract"
        );
        assert_eq!(
            infer_contract_type(&cats(&["Payment", "Payment", "Payment"])),
            "service agreement"
        );
        assert_eq!(
            infer_contract_type(&cats(&["Confidentiality", "Confidentiality"])),
            "NDA or confidentiality agreement"
        );
        assert_eq!(
            infer_contract_type(&cats(&["License", "License"])),
            "licensing agreement"
        );
        assert_eq!(infer_contract_type(&cats(&["Other"])), "legal contract");
    }
}
