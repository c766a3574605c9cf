//! Core types for the farmland chat responder
//!
//! This crate provides the types shared by every other crate:
//! - Conversation turns and speaker roles
//! - The fixed intent label set
//! - Extracted lead details and captured lead records
//! - Error types

pub mod conversation;
pub mod error;
pub mod intent;
pub mod lead;

pub use conversation::{Turn, TurnRole};
pub use error::{Error, Result};
pub use intent::{IntentLabel, ParseIntentError};
pub use lead::{Lead, LeadInfo};
