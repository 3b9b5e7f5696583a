//! Collaborator contracts for the wellness backend.
//!
//! The core never owns transport policy beyond a single request per call:
//! no retries, no failover. Traits keep the session store and the drivers
//! testable against mock backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::{MindmateError, Result};
use crate::types::{ChatModel, MoodEntry};

/// One assistant reply from the chat endpoint.
///
/// Field names mirror the chat API wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(rename = "response")]
    pub reply_text: String,
    #[serde(rename = "is_crisis", default)]
    pub crisis_flag: bool,
    /// Helpline name → contact number; sent only on crisis replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helplines: Option<BTreeMap<String, String>>,
    /// Server-assigned reply timestamp.
    pub timestamp: DateTime<Utc>,
}

/// The external chat collaborator: classifies crisis content and produces
/// the assistant reply. One outbound call per conversational turn.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, user_id: &str, text: &str, model: ChatModel) -> Result<ChatReply>;
}

/// The external mood collaborator: reads the raw entry list and accepts
/// new samples.
#[async_trait]
pub trait MoodStore: Send + Sync {
    async fn fetch_entries(&self, user_id: &str) -> Result<Vec<MoodEntry>>;

    async fn submit_entry(
        &self,
        user_id: &str,
        emoji: &str,
        score: u8,
        note: Option<&str>,
    ) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    user_id: &'a str,
    message: &'a str,
    model_choice: &'a str,
}

#[derive(Debug, Serialize)]
struct MoodLogBody<'a> {
    user_id: &'a str,
    mood_emoji: &'a str,
    mood_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct MoodLogResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: String,
}

/// The week endpoint also returns pre-bucketed chart data and statistics;
/// the core recomputes those locally and only reads the raw entries.
#[derive(Debug, Deserialize)]
struct MoodWeekResponse {
    #[serde(default)]
    moods: Vec<MoodEntry>,
}

/// Production backend speaking HTTP to the MindMate API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    api_base: String,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.backend.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(&self, user_id: &str, text: &str, model: ChatModel) -> Result<ChatReply> {
        tracing::debug!(model = model.as_str(), "dispatching chat turn");
        let body = ChatRequestBody {
            user_id,
            message: text,
            model_choice: model.as_str(),
        };
        let reply = self
            .client
            .post(self.url("/chat"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatReply>()
            .await?;
        Ok(reply)
    }
}

#[async_trait]
impl MoodStore for HttpBackend {
    async fn fetch_entries(&self, user_id: &str) -> Result<Vec<MoodEntry>> {
        let response = self
            .client
            .get(self.url(&format!("/mood/week/{}", user_id)))
            .send()
            .await?
            .error_for_status()?
            .json::<MoodWeekResponse>()
            .await?;
        Ok(response.moods)
    }

    async fn submit_entry(
        &self,
        user_id: &str,
        emoji: &str,
        score: u8,
        note: Option<&str>,
    ) -> Result<()> {
        let body = MoodLogBody {
            user_id,
            mood_emoji: emoji,
            mood_score: score,
            note,
            timestamp: Utc::now(),
        };
        let response = self
            .client
            .post(self.url("/mood/log"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<MoodLogResponse>()
            .await?;
        if response.success {
            Ok(())
        } else {
            Err(MindmateError::Backend(response.message))
        }
    }
}
