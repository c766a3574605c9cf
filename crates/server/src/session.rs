//! Conversation and lead storage
//!
//! Storage sits behind the `ConversationStore` trait so the in-memory maps
//! can be swapped for a persistent backend without touching the chat cycle.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use farm_chat_core::{Lead, Result, Turn};

/// Storage for per-session turn logs and the global lead list
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append a turn, creating the session if absent
    async fn append(&self, session_id: &str, turn: Turn) -> Result<()>;

    /// Turns of a session in insertion order (empty if unknown)
    async fn turns(&self, session_id: &str) -> Result<Vec<Turn>>;

    /// Append a lead record
    async fn append_lead(&self, lead: Lead) -> Result<()>;

    /// Replace the record for the lead's session, or append if none exists.
    /// The replaced record keeps its id and its position in the list.
    async fn upsert_lead(&self, lead: Lead) -> Result<()>;

    /// All leads in capture order
    async fn leads(&self) -> Result<Vec<Lead>>;

    /// Number of live sessions
    async fn session_count(&self) -> usize;

    /// Drop the turn logs of the given sessions, returning how many existed.
    /// Leads are kept. Callers must hold the sessions' cycle locks.
    async fn evict(&self, session_ids: &[String]) -> usize;

    /// Whether data survives a restart
    fn is_persistent(&self) -> bool;
}

/// In-memory store; everything is lost on restart
#[derive(Default)]
pub struct InMemoryConversationStore {
    sessions: RwLock<HashMap<String, Vec<Turn>>>,
    leads: RwLock<Vec<Lead>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, session_id: &str, turn: Turn) -> Result<()> {
        self.sessions
            .write()
            .entry(session_id.to_string())
            .or_default()
            .push(turn);
        Ok(())
    }

    async fn turns(&self, session_id: &str) -> Result<Vec<Turn>> {
        Ok(self
            .sessions
            .read()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_lead(&self, lead: Lead) -> Result<()> {
        self.leads.write().push(lead);
        Ok(())
    }

    async fn upsert_lead(&self, mut lead: Lead) -> Result<()> {
        let mut leads = self.leads.write();
        match leads.iter_mut().find(|l| l.session_id == lead.session_id) {
            Some(existing) => {
                lead.id = std::mem::take(&mut existing.id);
                *existing = lead;
            }
            None => leads.push(lead),
        }
        Ok(())
    }

    async fn leads(&self) -> Result<Vec<Lead>> {
        Ok(self.leads.read().clone())
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    async fn evict(&self, session_ids: &[String]) -> usize {
        let mut sessions = self.sessions.write();
        session_ids
            .iter()
            .filter(|id| sessions.remove(id.as_str()).is_some())
            .count()
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_chat_core::LeadInfo;

    fn info(name: Option<&str>, phone: &str) -> LeadInfo {
        LeadInfo {
            name: name.map(str::to_string),
            phone: Some(phone.to_string()),
        }
    }

    #[tokio::test]
    async fn test_append_creates_session() {
        let store = InMemoryConversationStore::new();
        assert!(store.turns("s1").await.unwrap().is_empty());

        store.append("s1", Turn::user("hi")).await.unwrap();
        store.append("s1", Turn::assistant("hello")).await.unwrap();
        store.append("s2", Turn::user("yo")).await.unwrap();

        let turns = store.turns("s1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "hi");
        assert_eq!(turns[1].content, "hello");
        assert_eq!(store.session_count().await, 2);
        assert!(!store.is_persistent());
    }

    #[tokio::test]
    async fn test_upsert_keeps_id_and_position() {
        let store = InMemoryConversationStore::new();

        let first = Lead::new(info(None, "9876543210"), "s1", vec![]);
        let first_id = first.id.clone();
        store.upsert_lead(first).await.unwrap();
        store
            .upsert_lead(Lead::new(info(None, "9123456789"), "s2", vec![]))
            .await
            .unwrap();
        store
            .upsert_lead(Lead::new(info(Some("Ravi"), "9876543210"), "s1", vec![]))
            .await
            .unwrap();

        let leads = store.leads().await.unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].id, first_id);
        assert_eq!(leads[0].name.as_deref(), Some("Ravi"));
        assert_eq!(leads[1].session_id, "s2");
    }

    #[tokio::test]
    async fn test_append_lead_keeps_duplicates() {
        let store = InMemoryConversationStore::new();
        store
            .append_lead(Lead::new(info(None, "9876543210"), "s1", vec![]))
            .await
            .unwrap();
        store
            .append_lead(Lead::new(info(None, "9876543210"), "s1", vec![]))
            .await
            .unwrap();
        assert_eq!(store.leads().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_evict_named_sessions_keeps_leads() {
        let store = InMemoryConversationStore::new();
        store.append("old", Turn::user("hi")).await.unwrap();
        store.append("fresh", Turn::user("hi")).await.unwrap();
        store
            .append_lead(Lead::new(info(None, "9876543210"), "old", vec![]))
            .await
            .unwrap();

        let evicted = store
            .evict(&["old".to_string(), "unknown".to_string()])
            .await;
        assert_eq!(evicted, 1);
        assert_eq!(store.session_count().await, 1);
        assert!(store.turns("old").await.unwrap().is_empty());
        assert_eq!(store.turns("fresh").await.unwrap().len(), 1);
        assert_eq!(store.leads().await.unwrap().len(), 1);
    }
}
