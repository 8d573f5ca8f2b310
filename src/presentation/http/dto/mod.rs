pub mod chat_dto;
pub mod document_dto;
pub mod job_dto;
pub mod response_dto;

pub use chat_dto::{
    ChatMessageRequestDto, ChatMessageResponseDto, ConversationDto, MessageDto, SourceCitationDto,
};
pub use document_dto::UploadDocumentDto;
pub use job_dto::{
    ClauseSummaryDto, JobStatusDto, StartAnalysisDto, SuggestedQuestionsDto, SummarizeClauseDto,
    SummarizeClauseRequestDto,
};
pub use response_dto::ApiResponse;
