//! Chat session controller.
//!
//! Owns the ordered turn list and the single in-flight ask. A submission is
//! split in two halves so that callers which run the network call elsewhere
//! (the GUI worker thread) and callers which await it inline (the terminal
//! app) share one state machine:
//!
//! 1. [`SessionController::submit`] snapshots history, appends the user turn,
//!    clears the input and marks the session busy, returning a [`PendingAsk`].
//! 2. [`SessionController::complete`] appends the assistant turn for that ask
//!    (answer or fixed failure text) and releases the busy flag.

use chrono::{DateTime, Utc};
use shared::{
    domain::{Citation, Role},
    protocol::{AskRequest, AskResponse, HistoryMessage, SearchFilters},
};
use tracing::{debug, info, warn};

use crate::{
    error::ClientError, settings::ClientSettings, transport::VachanamrutApi, ASK_FAILURE_MESSAGE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    role: Role,
    content: String,
    citations: Vec<Citation>,
    created_at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            citations: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            citations,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Empty for user turns and for assistant turns without sources.
    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Projects turns to the `{role, content}` pairs the backend expects.
pub fn history_payload(turns: &[ChatTurn]) -> Vec<HistoryMessage> {
    turns
        .iter()
        .map(|turn| HistoryMessage {
            role: turn.role,
            content: turn.content.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AskId(pub u64);

/// An ask that has been recorded locally and still needs a backend answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAsk {
    pub id: AskId,
    pub request: AskRequest,
}

/// Result of running a [`PendingAsk`] against the backend.
#[derive(Debug)]
pub struct AskResult {
    pub id: AskId,
    pub outcome: Result<AskResponse, ClientError>,
}

/// Runs the network half of a submission.
pub async fn run_ask(api: &dyn VachanamrutApi, pending: PendingAsk) -> AskResult {
    let outcome = api.ask(&pending.request).await;
    AskResult {
        id: pending.id,
        outcome,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input or another ask still outstanding; nothing changed.
    Ignored,
    Answered,
    Failed,
}

#[derive(Debug)]
pub struct SessionController {
    turns: Vec<ChatTurn>,
    input: String,
    in_flight: Option<AskId>,
    next_ask: u64,
    filters: SearchFilters,
}

impl SessionController {
    pub fn new(greeting: impl Into<String>, filters: SearchFilters) -> Self {
        Self {
            turns: vec![ChatTurn::assistant(greeting, Vec::new())],
            input: String::new(),
            in_flight: None,
            next_ask: 1,
            filters,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.greeting.clone(), settings.filters.clone())
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Editable input buffer for text widgets.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_submit(&self) -> bool {
        self.in_flight.is_none() && !self.input.trim().is_empty()
    }

    /// Submits the current input buffer.
    pub fn submit(&mut self) -> Option<PendingAsk> {
        let text = self.input.clone();
        self.submit_text(&text)
    }

    /// Records `text` as the next user turn and prepares its backend request.
    ///
    /// Returns `None` without touching any state when `text` is blank or an ask
    /// is already outstanding.
    pub fn submit_text(&mut self, text: &str) -> Option<PendingAsk> {
        if text.trim().is_empty() {
            return None;
        }
        if let Some(id) = self.in_flight {
            debug!(in_flight = id.0, "session: submit ignored while ask is outstanding");
            return None;
        }

        // History must be captured before the new user turn is appended.
        let history = history_payload(&self.turns);

        self.turns.push(ChatTurn::user(text));
        self.input.clear();

        let id = AskId(self.next_ask);
        self.next_ask += 1;
        self.in_flight = Some(id);

        info!(ask = id.0, history_len = history.len(), "session: ask submitted");
        Some(PendingAsk {
            id,
            request: AskRequest {
                question: text.to_string(),
                history,
                filters: self.filters.clone(),
            },
        })
    }

    /// Applies the backend outcome for `id` and releases the in-flight flag.
    ///
    /// Returns `false` when `id` is not the outstanding ask.
    pub fn complete(&mut self, id: AskId, outcome: Result<AskResponse, ClientError>) -> bool {
        if self.in_flight != Some(id) {
            warn!(ask = id.0, "session: ignoring completion for unknown ask");
            return false;
        }

        let turn = match outcome {
            Ok(response) => {
                info!(
                    ask = id.0,
                    citations = response.citations.len(),
                    "session: answer received"
                );
                ChatTurn::assistant(response.answer, response.citations)
            }
            Err(err) => {
                warn!(ask = id.0, timeout = err.is_timeout(), "session: ask failed: {err}");
                ChatTurn::assistant(ASK_FAILURE_MESSAGE, Vec::new())
            }
        };
        self.turns.push(turn);
        self.in_flight = None;
        true
    }

    pub fn apply(&mut self, result: AskResult) -> bool {
        self.complete(result.id, result.outcome)
    }

    /// Submits the input buffer and awaits the answer inline.
    pub async fn submit_with(&mut self, api: &dyn VachanamrutApi) -> SubmitOutcome {
        let Some(pending) = self.submit() else {
            return SubmitOutcome::Ignored;
        };
        self.finish_with(api, pending).await
    }

    /// Same as [`SessionController::submit_with`] for an explicit question.
    pub async fn ask_with(&mut self, api: &dyn VachanamrutApi, text: &str) -> SubmitOutcome {
        let Some(pending) = self.submit_text(text) else {
            return SubmitOutcome::Ignored;
        };
        self.finish_with(api, pending).await
    }

    async fn finish_with(&mut self, api: &dyn VachanamrutApi, pending: PendingAsk) -> SubmitOutcome {
        let result = run_ask(api, pending).await;
        let outcome = if result.outcome.is_ok() {
            SubmitOutcome::Answered
        } else {
            SubmitOutcome::Failed
        };
        self.apply(result);
        outcome
    }

    /// Most recent assistant turn that carries citations.
    pub fn latest_citations(&self) -> &[Citation] {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant && !turn.citations.is_empty())
            .map(|turn| turn.citations.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
