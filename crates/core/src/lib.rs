//! fckty core library
//!
//! Builds search-grounded fact-check prompts for a video, turns the model's
//! free-text reply into a structured report, and drives the follow-up chat.

pub mod analyzer;
pub mod cache;
pub mod chat;
pub mod error;
pub mod extract;
pub mod format;
pub mod gemini;
pub mod metadata;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod types;
pub mod workspace;

// Re-export commonly used items at crate root
pub use analyzer::Analyzer;
pub use cache::{get_cache_dir, get_report_path, load_report, save_report};
pub use chat::{ChatSession, ChatTranscript};
pub use error::{FcktyError, Result, user_message};
pub use format::format_report_readable;
pub use gemini::{GeminiClient, Generation, GenerationRequest, GenerativeBackend};
pub use metadata::{MetadataSource, NoembedClient};
pub use pipeline::{AnalysisOutcome, open_chat, run_analysis, settle};
pub use provider::ProviderConfig;
pub use types::{
    AnalysisRequest, AnalysisResult, ChatMessage, ChatRole, Claim, CommentAnalysis, Source,
    VideoMetadata,
};
pub use workspace::{Phase, Ticket, Workspace};
