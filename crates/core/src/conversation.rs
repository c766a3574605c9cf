//! Conversation turns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::IntentLabel;

/// Role in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Visitor message
    User,
    /// Responder reply
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for TurnRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single message exchanged in a session.
///
/// Turns are immutable once appended to a session; only assistant turns
/// carry the intent that selected their reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Role of the speaker
    pub role: TurnRole,
    /// Message text
    pub content: String,
    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
    /// Intent that produced an assistant reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentLabel>,
}

impl Turn {
    /// Create a new turn stamped with the current time
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
            intent: None,
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    /// Tag the turn with the intent that produced it
    pub fn with_intent(mut self, intent: IntentLabel) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }
}
