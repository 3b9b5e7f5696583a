//! The conversational session state machine.
//!
//! One `SessionStore` owns one linear conversation for the lifetime of an
//! open chat view. All writes go through [`SessionStore::send`]; everything
//! else is a read-only view. State moves `idle → pending → idle` and nothing
//! else — there is no queueing, no retry, and no cancellation of an
//! outstanding turn.

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::ChatBackend;
use crate::config::AppConfig;
use crate::types::{ChatModel, Message};

/// Assistant greeting seeded into a fresh session.
pub const GREETING: &str =
    "Hey there! I'm MindMate. I'm here to listen and support you. How are you feeling today?";

/// Synchronous result of a `send` call.
///
/// Rejections are ordinary outcomes, not errors: invalid local input and
/// duplicate in-flight requests are dropped before any backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The turn ran: one user message and exactly one assistant message
    /// (real reply or fallback) were appended.
    Completed,
    /// Blank or whitespace-only text; nothing appended, no call made.
    EmptyInput,
    /// A round-trip was already outstanding; nothing appended, no call made.
    Busy,
}

/// Owns the ordered message history, the in-flight flag, and the selected
/// assistant model for one chat session.
pub struct SessionStore {
    id: String,
    history: Vec<Message>,
    pending: bool,
    selected_model: ChatModel,
    next_id: u64,
    backend: Arc<dyn ChatBackend>,
}

impl SessionStore {
    pub fn new(config: &AppConfig, backend: Arc<dyn ChatBackend>) -> Self {
        let mut store = Self {
            id: Uuid::new_v4().to_string(),
            history: Vec::new(),
            pending: false,
            selected_model: config.session.default_model,
            next_id: 0,
            backend,
        };
        if config.session.greeting {
            let id = store.alloc_id();
            store.history.push(Message::assistant(id, GREETING, chrono::Utc::now()));
        }
        store
    }

    /// Send one user turn and fold the assistant's reply into history.
    ///
    /// The user message is appended before the backend call suspends, so the
    /// caller's view shows it immediately. On any backend failure exactly one
    /// fixed fallback assistant message is appended instead of a raw error.
    /// `pending` is cleared on every path: there is no return between setting
    /// and clearing it, so a failed round-trip cannot strand the store.
    pub async fn send(&mut self, user_id: &str, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::EmptyInput;
        }
        if self.pending {
            tracing::debug!(session = %self.id, "send rejected: round-trip outstanding");
            return SendOutcome::Busy;
        }

        let id = self.alloc_id();
        self.history.push(Message::user(id, text));
        self.pending = true;

        let backend = Arc::clone(&self.backend);
        let result = backend
            .send_chat(user_id, text, self.selected_model)
            .await;

        let id = self.alloc_id();
        let message = match result {
            Ok(reply) => {
                if reply.crisis_flag {
                    Message::assistant_with_helplines(
                        id,
                        reply.reply_text,
                        reply.timestamp,
                        reply.helplines.unwrap_or_default(),
                    )
                } else {
                    Message::assistant(id, reply.reply_text, reply.timestamp)
                }
            }
            Err(err) => {
                tracing::warn!(session = %self.id, "chat backend failed: {}", err);
                Message::fallback(id)
            }
        };
        self.history.push(message);
        self.pending = false;
        SendOutcome::Completed
    }

    /// Select the assistant model for subsequent sends. Pure state update.
    pub fn set_model(&mut self, model: ChatModel) {
        self.selected_model = model;
    }

    pub fn model(&self) -> ChatModel {
        self.selected_model
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The full ordered message history.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.history.last()
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}
