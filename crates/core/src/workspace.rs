//! The one analysis a front-end is currently showing.
//!
//! Starting a new analysis replaces the slot outright: the previous report
//! and chat session are dropped, and any result still in flight for them is
//! rejected when it arrives because its ticket no longer matches.

use tracing::{debug, warn};

use crate::{
    chat::{ChatSession, ChatTranscript},
    error::{FcktyError, Result, user_message},
    types::{AnalysisRequest, AnalysisResult, ChatRole},
};

/// Proof that a caller started a particular analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    request: AnalysisRequest,
}

impl Ticket {
    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub enum Phase {
    Analyzing,
    Ready {
        result: AnalysisResult,
        chat: Option<ChatSession>,
        transcript: ChatTranscript,
    },
    Failed {
        message: String,
    },
}

struct Slot {
    generation: u64,
    request: AnalysisRequest,
    phase: Phase,
}

#[derive(Default)]
pub struct Workspace {
    next_generation: u64,
    slot: Option<Slot>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new analysis, discarding whatever was there before.
    pub fn begin(&mut self, request: AnalysisRequest) -> Ticket {
        self.next_generation += 1;
        let generation = self.next_generation;

        if let Some(old) = self.slot.take() {
            debug!(generation = old.generation, "discarding previous analysis");
        }

        self.slot = Some(Slot {
            generation,
            request: request.clone(),
            phase: Phase::Analyzing,
        });

        Ticket {
            generation,
            request,
        }
    }

    fn is_current(&self, ticket: &Ticket) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|slot| slot.generation == ticket.generation)
    }

    /// Store a finished analysis. Returns `false` (and drops the result) when
    /// the ticket has been superseded.
    pub fn complete(
        &mut self,
        ticket: &Ticket,
        result: AnalysisResult,
        chat: Option<ChatSession>,
    ) -> bool {
        if !self.is_current(ticket) {
            warn!(generation = ticket.generation, "dropping stale analysis result");
            return false;
        }
        if let Some(slot) = self.slot.as_mut() {
            slot.phase = Phase::Ready {
                result,
                chat,
                transcript: ChatTranscript::new(),
            };
        }
        true
    }

    /// Record a failed analysis as its user-facing message. Returns `false`
    /// when the ticket has been superseded.
    pub fn fail(&mut self, ticket: &Ticket, err: &FcktyError) -> bool {
        if !self.is_current(ticket) {
            warn!(generation = ticket.generation, "dropping stale analysis failure");
            return false;
        }
        if let Some(slot) = self.slot.as_mut() {
            slot.phase = Phase::Failed {
                message: user_message(err),
            };
        }
        true
    }

    pub fn phase(&self) -> Option<&Phase> {
        self.slot.as_ref().map(|slot| &slot.phase)
    }

    pub fn request(&self) -> Option<&AnalysisRequest> {
        self.slot.as_ref().map(|slot| &slot.request)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self.phase()? {
            Phase::Ready { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn transcript(&self) -> Option<&ChatTranscript> {
        match self.phase()? {
            Phase::Ready { transcript, .. } => Some(transcript),
            _ => None,
        }
    }

    pub fn has_chat(&self) -> bool {
        matches!(self.phase(), Some(Phase::Ready { chat: Some(_), .. }))
    }

    /// Ask a follow-up question. With no chat session, or blank input, this
    /// does nothing and returns `Ok(None)`.
    pub async fn send_message(&mut self, text: &str) -> Result<Option<String>> {
        let Some(Slot {
            phase:
                Phase::Ready {
                    chat: Some(chat),
                    transcript,
                    ..
                },
            ..
        }) = self.slot.as_mut()
        else {
            return Ok(None);
        };

        if text.trim().is_empty() {
            return Ok(None);
        }

        transcript.push(ChatRole::User, text);
        let reply = chat.send_message(text).await?;
        transcript.push(ChatRole::Model, reply.clone());

        Ok(Some(reply))
    }
}
