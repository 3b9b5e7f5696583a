use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::MindmateError;

/// Fixed assistant reply substituted when the chat backend is unreachable.
pub const FALLBACK_REPLY: &str = "I'm having trouble connecting right now. Please try again.";

/// A single message in a conversation.
///
/// Messages are append-only: once created they are never mutated or removed.
/// The `id` is assigned by the owning session store and increases strictly
/// with each appended message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub role: Role,
    pub content: String,
    /// True when the backend classified the conversation as crisis content.
    /// Only ever set on assistant messages.
    #[serde(default)]
    pub crisis_flag: bool,
    /// Helpline name → contact number, present only alongside `crisis_flag`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helplines: Option<BTreeMap<String, String>>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// A user turn, timestamped client-side at creation.
    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            crisis_flag: false,
            helplines: None,
            timestamp: Utc::now(),
        }
    }

    /// An assistant turn carrying the server-assigned timestamp.
    pub fn assistant(id: u64, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: content.into(),
            crisis_flag: false,
            helplines: None,
            timestamp,
        }
    }

    /// A crisis-flagged assistant turn with its helpline directory.
    pub fn assistant_with_helplines(
        id: u64,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        helplines: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: content.into(),
            crisis_flag: true,
            helplines: Some(helplines),
            timestamp,
        }
    }

    /// The fixed apologetic reply appended when the backend call fails.
    pub fn fallback(id: u64) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: FALLBACK_REPLY.into(),
            crisis_flag: false,
            helplines: None,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Assistant backend selection. Takes effect on the next send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatModel {
    #[default]
    Fast,
    Balanced,
    Accurate,
}

impl ChatModel {
    /// Wire name sent to the chat backend as `model_choice`.
    pub fn as_str(self) -> &'static str {
        match self {
            ChatModel::Fast => "fast",
            ChatModel::Balanced => "balanced",
            ChatModel::Accurate => "accurate",
        }
    }
}

impl FromStr for ChatModel {
    type Err = MindmateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(ChatModel::Fast),
            "balanced" => Ok(ChatModel::Balanced),
            "accurate" => Ok(ChatModel::Accurate),
            other => Err(MindmateError::Config(format!("Unknown model: {}", other))),
        }
    }
}

/// One user-submitted mood sample. Immutable once created.
///
/// Field names mirror the mood API wire format so entries deserialize
/// straight off the week endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    /// 1 = most negative, 5 = most positive.
    #[serde(rename = "mood_score")]
    pub score: u8,
    /// Display glyph chosen by the user; never used in computation.
    #[serde(rename = "mood_emoji")]
    pub emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }

    #[test]
    fn test_model_default_and_names() {
        assert_eq!(ChatModel::default(), ChatModel::Fast);
        assert_eq!(ChatModel::Balanced.as_str(), "balanced");
        assert_eq!("Accurate".parse::<ChatModel>().unwrap(), ChatModel::Accurate);
        assert!("gpt-5".parse::<ChatModel>().is_err());
    }

    #[test]
    fn test_helplines_omitted_unless_crisis() {
        let msg = Message::assistant(2, "hello", Utc::now());
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("helplines"));

        let mut directory = BTreeMap::new();
        directory.insert("iCall".to_string(), "1800-389-5146".to_string());
        let crisis = Message::assistant_with_helplines(3, "you are not alone", Utc::now(), directory);
        let json = serde_json::to_string(&crisis).unwrap();
        assert!(json.contains("\"crisis_flag\":true"));
        assert!(json.contains("iCall"));
    }

    #[test]
    fn test_mood_entry_deserializes_wire_format() {
        let raw = r#"{
            "mood_score": 4,
            "mood_emoji": "🙂",
            "note": "slept well",
            "timestamp": "2025-12-07T20:30:00Z"
        }"#;
        let entry: MoodEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.score, 4);
        assert_eq!(entry.emoji, "🙂");
        assert_eq!(entry.note.as_deref(), Some("slept well"));
    }

    #[test]
    fn test_fallback_message_shape() {
        let msg = Message::fallback(7);
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, FALLBACK_REPLY);
        assert!(!msg.crisis_flag);
        assert!(msg.helplines.is_none());
    }
}
