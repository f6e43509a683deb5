use tracing::warn;

use crate::{
    analyzer::Analyzer,
    chat::ChatSession,
    error::Result,
    types::{AnalysisRequest, AnalysisResult},
    workspace::{Ticket, Workspace},
};

/// A finished analysis together with its seeded follow-up chat, if seeding
/// worked.
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub chat: Option<ChatSession>,
}

/// Open a chat session for `result` and send it the hidden context message.
/// Seeding failures are logged and leave the report usable without chat.
pub async fn open_chat(
    analyzer: &Analyzer,
    request: &AnalysisRequest,
    result: &AnalysisResult,
) -> Option<ChatSession> {
    let mut chat = ChatSession::new(analyzer.backend(), analyzer.model());
    match chat.seed(&request.video_url, result).await {
        Ok(()) => Some(chat),
        Err(e) => {
            warn!(error = %e, "failed to seed chat session");
            None
        }
    }
}

/// Analyze, then open a seeded chat session when `with_chat` is set.
/// Without it no chat request is sent at all.
pub async fn run_analysis(
    analyzer: &Analyzer,
    request: &AnalysisRequest,
    with_chat: bool,
) -> Result<AnalysisOutcome> {
    let result = analyzer.analyze(request).await?;
    let chat = if with_chat {
        open_chat(analyzer, request, &result).await
    } else {
        None
    };
    Ok(AnalysisOutcome { result, chat })
}

/// Apply the outcome of the analysis started with `ticket`. Returns whether
/// it was applied; a superseded ticket is ignored.
pub fn settle(
    workspace: &mut Workspace,
    ticket: &Ticket,
    outcome: Result<AnalysisOutcome>,
) -> bool {
    match outcome {
        Ok(AnalysisOutcome { result, chat }) => workspace.complete(ticket, result, chat),
        Err(e) => workspace.fail(ticket, &e),
    }
}
