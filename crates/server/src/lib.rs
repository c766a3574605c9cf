//! Farm Chat Server
//!
//! HTTP API for the farmland chat widget: message handling, lead listing,
//! health and metrics.

pub mod chat;
pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use chat::{ChatOutcome, ChatService};
pub use http::create_router;
pub use metrics::init_metrics;
pub use session::{ConversationStore, InMemoryConversationStore};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Store error: {0}")]
    Store(String),
}

impl From<farm_chat_core::Error> for ServerError {
    fn from(err: farm_chat_core::Error) -> Self {
        match err {
            farm_chat_core::Error::Store(msg) => ServerError::Store(msg),
        }
    }
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Store(_) => axum::http::StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
