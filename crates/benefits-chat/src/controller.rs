//! Conversation controller.
//!
//! Owns the live transcript for the logged-in employee. A send appends the
//! user's message immediately, waits for the analysis service, appends the
//! reply (or a fixed fallback), and hands the transcript to history in the
//! background.
//!
//! `send` takes `&mut self`, so one controller never has two requests in
//! flight and replies always land in send order. Background saves are
//! chained so they reach the store in the order they were issued.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use benefits_auth::session::SessionStore;
use benefits_core::models::analysis::{AnalyzeRequest, AnalyzeResponse};
use benefits_core::models::chat::{ChatMessage, MessageIdGen};
use benefits_core::models::session::Session;
use benefits_core::models::trace::DebugEntry;
use benefits_history::sync::HistorySync;

use crate::error::AnalysisError;
use crate::service::AnalysisService;
use crate::trace::{self, TraceView, TraceViewer};

pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);

/// Assistant text shown whenever the analysis call fails.
pub const FALLBACK_REPLY: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug)]
pub enum SendOutcome {
    /// Blank input or no bound employee; nothing was appended or sent.
    Ignored,
    /// The service replied and the answer was appended.
    Answered,
    /// The call failed and the fallback reply was appended.
    Failed(AnalysisError),
}

pub struct ConversationController {
    session: SessionStore,
    history: HistorySync,
    analysis: Arc<dyn AnalysisService>,
    analysis_timeout: Duration,
    messages: Vec<ChatMessage>,
    trace: Vec<DebugEntry>,
    viewer: TraceViewer,
    state: ConversationState,
    ids: MessageIdGen,
    pending_save: Option<JoinHandle<bool>>,
}

impl ConversationController {
    pub fn new(
        session: SessionStore,
        history: HistorySync,
        analysis: Arc<dyn AnalysisService>,
        analysis_timeout: Duration,
    ) -> Self {
        Self {
            session,
            history,
            analysis,
            analysis_timeout,
            messages: Vec::new(),
            trace: Vec::new(),
            viewer: TraceViewer::default(),
            state: ConversationState::Idle,
            ids: MessageIdGen::default(),
            pending_save: None,
        }
    }

    /// Authenticate through the session store. Does not load history.
    ///
    /// Switching to a different employee drops the previous transcript and
    /// trace from memory.
    pub async fn login(&mut self, employee_id: &str) -> bool {
        let previous = self.session.employee_id().map(str::to_string);
        if !self.session.login(employee_id).await {
            return false;
        }

        if previous.as_deref() != self.session.employee_id() {
            self.flush().await;
            self.reset_local();
        }
        true
    }

    /// Merge the stored transcript into the local one.
    ///
    /// Messages are keyed by id; stored messages not already present are
    /// added and the result is kept in id order. Returns how many were added.
    pub async fn load_history(&mut self) -> usize {
        let Some(employee_id) = self.bound_employee_id() else {
            return 0;
        };

        let stored = self.history.load(&employee_id).await;
        let before = self.messages.len();
        for message in stored {
            self.ids.observe(message.id);
            if !self.messages.iter().any(|m| m.id == message.id) {
                self.messages.push(message);
            }
        }
        self.messages.sort_by_key(|m| m.id);

        let added = self.messages.len() - before;
        info!(employee_id = %employee_id, added, "history loaded");
        added
    }

    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let query = text.trim();
        if query.is_empty() {
            return SendOutcome::Ignored;
        }
        let Some(employee_id) = self.bound_employee_id() else {
            debug!("ignoring send without an authenticated employee");
            return SendOutcome::Ignored;
        };

        let now = jiff::Timestamp::now();
        let id = self.ids.next_at(now);
        self.messages.push(ChatMessage::user(id, query, now));
        self.state = ConversationState::AwaitingResponse;

        let request = AnalyzeRequest {
            employee_id: employee_id.clone(),
            query: query.to_string(),
        };

        let outcome = match self.dispatch(&request).await {
            Ok(response) => {
                self.append_reply(response);
                self.schedule_save(&employee_id);
                SendOutcome::Answered
            }
            Err(e) => {
                warn!(employee_id = %employee_id, error = %e, "analysis request failed");
                let now = jiff::Timestamp::now();
                let id = self.ids.next_at(now);
                self.messages.push(ChatMessage::assistant(id, FALLBACK_REPLY, now));
                SendOutcome::Failed(e)
            }
        };

        self.state = ConversationState::Idle;
        outcome
    }

    /// Wipe the transcript and trace, then store an empty transcript.
    /// Returns whether that save succeeded.
    pub async fn clear(&mut self) -> bool {
        self.reset_local();

        let Some(employee_id) = self.bound_employee_id() else {
            return false;
        };

        // An earlier save still in flight must not land after the wipe.
        self.flush().await;
        self.history
            .save(&employee_id, &[], jiff::Timestamp::now())
            .await
    }

    /// Final save, then log out and drop all local conversation state.
    pub async fn close(&mut self) {
        self.flush().await;

        if let Some(employee_id) = self.bound_employee_id() {
            if !self.messages.is_empty() {
                let saved = self
                    .history
                    .save(&employee_id, &self.messages, jiff::Timestamp::now())
                    .await;
                if !saved {
                    warn!(employee_id = %employee_id, "final transcript save failed");
                }
            }
        }

        self.session.logout();
        self.reset_local();
    }

    /// Wait for the latest background save. True when there was none.
    pub async fn flush(&mut self) -> bool {
        let Some(handle) = self.pending_save.take() else {
            return true;
        };
        match handle.await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "transcript save task failed");
                false
            }
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn trace(&self) -> &[DebugEntry] {
        &self.trace
    }

    pub fn trace_view(&self) -> TraceView {
        trace::project(&self.trace)
    }

    pub fn viewer(&self) -> &TraceViewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut TraceViewer {
        &mut self.viewer
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    fn bound_employee_id(&self) -> Option<String> {
        if !self.session.is_authenticated() {
            return None;
        }
        self.session.employee_id().map(str::to_string)
    }

    async fn dispatch(&self, request: &AnalyzeRequest) -> Result<AnalyzeResponse, AnalysisError> {
        tokio::time::timeout(self.analysis_timeout, self.analysis.analyze(request))
            .await
            .map_err(|_| AnalysisError::Timeout(self.analysis_timeout))?
    }

    fn append_reply(&mut self, response: AnalyzeResponse) {
        if let Some(context) = &response.context {
            debug!(context = %context, "analysis context");
        }

        let suggestions = response.suggestions();
        let now = jiff::Timestamp::now();
        let id = self.ids.next_at(now);
        self.messages.push(
            ChatMessage::assistant(id, response.response.message, now)
                .with_details(response.response.details)
                .with_suggestions(suggestions),
        );

        if !response.debug_info.is_empty() {
            debug!(entries = response.debug_info.len(), "agent trace received");
            self.trace = response.debug_info;
            self.viewer.show();
        }
    }

    /// Save the current transcript in the background, after any earlier
    /// save has finished.
    fn schedule_save(&mut self, employee_id: &str) {
        let history = self.history.clone();
        let employee_id = employee_id.to_string();
        let messages = self.messages.clone();
        let previous = self.pending_save.take();

        self.pending_save = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    warn!(error = %e, "previous transcript save task failed");
                }
            }
            history
                .save(&employee_id, &messages, jiff::Timestamp::now())
                .await
        }));
    }

    fn reset_local(&mut self) {
        self.messages.clear();
        self.trace.clear();
        self.viewer.hide();
        self.state = ConversationState::Idle;
    }
}
