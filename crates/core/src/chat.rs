use std::sync::Arc;

use tracing::debug;

use crate::{
    error::Result,
    gemini::{GenerationRequest, GenerativeBackend, Turn},
    prompt::{CHAT_SYSTEM_PROMPT, build_chat_context},
    types::{AnalysisResult, ChatMessage, ChatRole},
};

pub const EMPTY_REPLY_FALLBACK: &str = "I couldn't generate a response.";

pub const CHAT_GREETING: &str = "I have analyzed the content. Do you have any specific questions about the facts, sources, or sentiment?";

/// A follow-up conversation about one analysis.
///
/// The service is stateless, so the history lives here and is replayed on
/// every turn. Turns are strictly sequential: `send_message` takes `&mut self`.
pub struct ChatSession {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
    history: Vec<Turn>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            history: Vec::new(),
        }
    }

    /// Send one user message and return the model's reply. An empty reply
    /// becomes [`EMPTY_REPLY_FALLBACK`]; a failed call leaves the history
    /// untouched.
    pub async fn send_message(&mut self, text: &str) -> Result<String> {
        let mut contents = self.history.clone();
        contents.push(Turn::user(text));

        let generation = self
            .backend
            .generate(GenerationRequest {
                model: self.model.clone(),
                system_instruction: CHAT_SYSTEM_PROMPT.to_string(),
                contents,
                web_search: false,
                temperature: None,
            })
            .await?;

        let reply = generation
            .text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string());

        self.history.push(Turn::user(text));
        self.history.push(Turn::model(reply.clone()));
        debug!(turns = self.history.len(), "chat turn completed");

        Ok(reply)
    }

    /// Send the hidden context message describing `result`. The reply is
    /// discarded.
    pub async fn seed(&mut self, video_url: &str, result: &AnalysisResult) -> Result<()> {
        let context = build_chat_context(video_url, result)?;
        self.send_message(&context).await?;
        Ok(())
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }
}

/// The messages a user actually sees. The seeding exchange is never part of it.
#[derive(Debug, Clone)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Model, CHAT_GREETING)],
        }
    }

    pub fn push(&mut self, role: ChatRole, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, text));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        error::{FcktyError, ServiceError},
        gemini::Generation,
        types::Sentiment,
    };

    #[derive(Default)]
    struct Scripted {
        replies: Mutex<Vec<Result<Option<String>>>>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl Scripted {
        fn with(replies: Vec<Result<Option<String>>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl GenerativeBackend for Scripted {
        async fn generate(&self, request: GenerationRequest) -> Result<Generation> {
            self.seen.lock().unwrap().push(request);
            let text = self.replies.lock().unwrap().pop().expect("unexpected call")?;
            Ok(Generation {
                text,
                grounding: vec![],
            })
        }
    }

    fn result() -> AnalysisResult {
        AnalysisResult {
            accuracy_rating: 6,
            overall_sentiment: Sentiment::Neutral,
            summary: "Analysis of X: fine".into(),
            key_takeaways: vec![],
            claims: vec![],
            comment_analysis: None,
            sources: vec![],
        }
    }

    #[tokio::test]
    async fn empty_reply_uses_fallback() {
        let backend = Scripted::with(vec![Ok(None), Ok(Some("  ".into()))]);
        let mut chat = ChatSession::new(backend, "m");

        assert_eq!(chat.send_message("hi").await.unwrap(), EMPTY_REPLY_FALLBACK);
        assert_eq!(chat.send_message("again").await.unwrap(), EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn history_is_replayed_in_order() {
        let backend = Scripted::with(vec![Ok(Some("ack".into())), Ok(Some("because".into()))]);
        let mut chat = ChatSession::new(backend.clone(), "m");

        chat.seed("https://youtu.be/abc", &result()).await.unwrap();
        let reply = chat.send_message("why 6?").await.unwrap();
        assert_eq!(reply, "because");

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(!seen[1].web_search);
        assert_eq!(seen[1].system_instruction, CHAT_SYSTEM_PROMPT);
        let second = &seen[1].contents;
        assert_eq!(second.len(), 3);
        assert!(second[0].text.starts_with("CONTEXT OF ANALYSIS:"));
        assert_eq!(second[1], Turn::model("ack"));
        assert_eq!(second[2], Turn::user("why 6?"));
    }

    #[tokio::test]
    async fn failed_turn_leaves_history_alone() {
        let backend = Scripted::with(vec![
            Err(FcktyError::Service(ServiceError::new("boom"))),
            Ok(Some("ok".into())),
        ]);
        let mut chat = ChatSession::new(backend, "m");

        assert!(chat.send_message("first").await.is_err());
        assert!(chat.history().is_empty());

        chat.send_message("second").await.unwrap();
        assert_eq!(chat.history().len(), 2);
    }

    #[test]
    fn transcript_opens_with_greeting() {
        let mut transcript = ChatTranscript::new();
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.messages()[0].role, ChatRole::Model);

        let id = transcript.push(ChatRole::User, "q").id;
        assert_ne!(id, transcript.messages()[0].id);
        assert_eq!(transcript.messages().len(), 2);
    }
}
