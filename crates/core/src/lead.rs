//! Lead types
//!
//! `LeadInfo` is the raw result of scanning a conversation for contact
//! details. `Lead` is the record kept once a phone number has been seen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Turn;

/// Contact details extracted from a conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl LeadInfo {
    /// A lead counts as captured once a phone number is known
    pub fn is_captured(&self) -> bool {
        self.phone.is_some()
    }
}

/// Captured sales lead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Lead identifier (LEADxxxxxxxx)
    pub id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub session_id: String,
    /// Conversation as it stood when the lead was recorded
    pub captured_turns: Vec<Turn>,
    pub captured_at: DateTime<Utc>,
}

impl Lead {
    /// Record a lead from extracted details and the session history
    pub fn new(info: LeadInfo, session_id: impl Into<String>, turns: Vec<Turn>) -> Self {
        Self {
            id: format!(
                "LEAD{}",
                uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
            ),
            name: info.name,
            phone: info.phone,
            session_id: session_id.into(),
            captured_turns: turns,
            captured_at: Utc::now(),
        }
    }

    /// Extracted details carried by this record
    pub fn info(&self) -> LeadInfo {
        LeadInfo {
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }
}
