//! Application State
//!
//! Shared state across all handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use farm_chat_agent::{build_responder, Responder};
use farm_chat_config::{KnowledgeBase, Settings};

use crate::chat::ChatService;
use crate::session::{ConversationStore, InMemoryConversationStore};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub chat: Arc<ChatService>,
    /// Prometheus handle, None when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state with the responder selected in settings and an in-memory store
    pub fn new(config: Settings, knowledge: Arc<KnowledgeBase>) -> Self {
        let responder = build_responder(&config, knowledge);
        Self::with_responder(config, responder)
    }

    /// Create state with an explicit responder
    pub fn with_responder(config: Settings, responder: Arc<dyn Responder>) -> Self {
        Self::with_store(config, responder, Arc::new(InMemoryConversationStore::new()))
    }

    /// Create state with a custom conversation store
    pub fn with_store(
        config: Settings,
        responder: Arc<dyn Responder>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        let chat = ChatService::new(store, responder, config.sessions.lead_policy);
        Self {
            config: Arc::new(config),
            chat: Arc::new(chat),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        self.chat.store()
    }
}
