//! Centralized defaults
//!
//! Single source of truth for values shared between settings defaults,
//! the responders and the HTTP layer.

/// Session defaults
pub mod sessions {
    /// Session id used when a chat request carries none
    pub const DEFAULT_SESSION_ID: &str = "default";

    /// Interval between idle-session sweeps (seconds)
    pub const CLEANUP_INTERVAL_SECS: u64 = 300;
}

/// Responder defaults
pub mod responder {
    /// Prior turns sent to an external model as context
    pub const HISTORY_WINDOW: usize = 10;

    /// Reply used when the external model cannot be reached
    pub const FALLBACK_MESSAGE: &str = "I apologize, but I'm having trouble processing your request. Please try again or contact our team directly.";
}

/// External model defaults
pub mod llm {
    pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &str = "gpt-4";
    pub const MAX_TOKENS: usize = 500;
    pub const TEMPERATURE: f32 = 0.7;
    pub const TIMEOUT_SECS: u64 = 30;
}

/// HTTP defaults
pub mod server {
    pub const DEFAULT_PORT: u16 = 5000;
    pub const SERVICE_NAME: &str = "Neralu Farms Chatbot";
}
