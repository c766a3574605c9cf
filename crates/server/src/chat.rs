//! Chat cycle
//!
//! One inbound message runs: append user turn, respond, append assistant
//! turn, re-extract lead details over the whole log, record the lead. The
//! cycle holds a per-session lock from the first append until the lead is
//! recorded, so concurrent requests for one session never interleave.
//! Different sessions proceed in parallel.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use farm_chat_agent::{LeadExtractor, Responder};
use farm_chat_config::LeadPolicy;
use farm_chat_core::{IntentLabel, Lead, LeadInfo, Turn};

use crate::metrics;
use crate::session::ConversationStore;
use crate::ServerError;

/// Result of one chat cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatOutcome {
    pub response: String,
    pub intent: IntentLabel,
    /// A phone number has been seen anywhere in the session's user turns
    pub lead_captured: bool,
}

/// Per-session cycle state, guarded by the session lock
struct SessionSlot {
    /// Details last written under `LeadPolicy::PerSession`
    recorded: Option<LeadInfo>,
    last_seen: Instant,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            recorded: None,
            last_seen: Instant::now(),
        }
    }
}

/// Runs chat cycles against a store and a responder
pub struct ChatService {
    store: Arc<dyn ConversationStore>,
    responder: Arc<dyn Responder>,
    extractor: LeadExtractor,
    lead_policy: LeadPolicy,
    slots: Mutex<HashMap<String, Arc<tokio::sync::Mutex<SessionSlot>>>>,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        responder: Arc<dyn Responder>,
        lead_policy: LeadPolicy,
    ) -> Self {
        Self {
            store,
            responder,
            extractor: LeadExtractor::new(),
            lead_policy,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    pub fn responder_name(&self) -> &'static str {
        self.responder.name()
    }

    fn slot(&self, session_id: &str) -> Arc<tokio::sync::Mutex<SessionSlot>> {
        self.slots
            .lock()
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(SessionSlot::new())))
            .clone()
    }

    /// Handle one message for a session
    pub async fn handle(&self, session_id: &str, message: &str) -> Result<ChatOutcome, ServerError> {
        let start = Instant::now();
        let slot = self.slot(session_id);
        let mut slot = slot.lock().await;
        slot.last_seen = Instant::now();

        self.store.append(session_id, Turn::user(message)).await?;
        let history = self.store.turns(session_id).await?;

        let reply = self.responder.respond(message, &history).await;
        if reply.degraded {
            metrics::record_llm_fallback();
        }

        self.store
            .append(
                session_id,
                Turn::assistant(reply.text.clone()).with_intent(reply.intent),
            )
            .await?;

        let turns = self.store.turns(session_id).await?;
        let info = self.extractor.extract(&turns);
        let lead_captured = info.is_captured();

        if lead_captured {
            self.record_lead(session_id, &mut slot, info, turns).await?;
        }

        slot.last_seen = Instant::now();
        metrics::record_message(reply.intent);
        metrics::record_cycle(start.elapsed());

        tracing::debug!(
            session_id = %session_id,
            intent = %reply.intent,
            lead_captured,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Chat cycle complete"
        );

        Ok(ChatOutcome {
            response: reply.text,
            intent: reply.intent,
            lead_captured,
        })
    }

    async fn record_lead(
        &self,
        session_id: &str,
        slot: &mut SessionSlot,
        info: LeadInfo,
        turns: Vec<Turn>,
    ) -> Result<(), ServerError> {
        match self.lead_policy {
            LeadPolicy::Snapshots => {
                let lead = Lead::new(info, session_id, turns);
                tracing::info!(lead_id = %lead.id, session_id = %session_id, "Lead snapshot recorded");
                self.store.append_lead(lead).await?;
                metrics::record_lead_captured();
            }
            LeadPolicy::PerSession => {
                if slot.recorded.as_ref() == Some(&info) {
                    return Ok(());
                }
                let first = slot.recorded.is_none();
                slot.recorded = Some(info.clone());

                let lead = Lead::new(info, session_id, turns);
                if first {
                    tracing::info!(session_id = %session_id, "Lead captured");
                    metrics::record_lead_captured();
                } else {
                    tracing::info!(session_id = %session_id, "Lead details updated");
                }
                self.store.upsert_lead(lead).await?;
            }
        }
        Ok(())
    }

    /// Evict sessions idle for longer than `ttl` from the store and drop
    /// their locks. Sessions with a cycle in flight are skipped.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let held: Vec<(String, tokio::sync::OwnedMutexGuard<SessionSlot>)> = self
            .slots
            .lock()
            .iter()
            .filter_map(|(id, slot)| {
                let guard = Arc::clone(slot).try_lock_owned().ok()?;
                (guard.last_seen.elapsed() > ttl).then(|| (id.clone(), guard))
            })
            .collect();
        if held.is_empty() {
            return 0;
        }

        let ids: Vec<String> = held.iter().map(|(id, _)| id.clone()).collect();
        let evicted = self.store.evict(&ids).await;

        // Only the map and our guard reference an unclaimed slot; a request
        // that arrived meanwhile keeps it and starts a fresh log.
        self.slots.lock().retain(|id, slot| {
            !(ids.contains(id) && Arc::strong_count(slot) == 2)
        });
        drop(held);

        evicted
    }

    /// Start the background eviction task
    ///
    /// Returns a shutdown sender that stops the task.
    pub fn start_cleanup_task(
        self: &Arc<Self>,
        interval: Duration,
        ttl: Duration,
    ) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let service = Arc::clone(self);

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let evicted = service.evict_idle(ttl).await;
                        if evicted > 0 {
                            let remaining = service.store.session_count().await;
                            tracing::info!(evicted, remaining, "Evicted idle sessions");
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::InMemoryConversationStore;
    use async_trait::async_trait;
    use farm_chat_agent::{Reply, RuleBasedResponder};
    use farm_chat_config::KnowledgeBase;
    use farm_chat_core::TurnRole;

    fn service(policy: LeadPolicy) -> ChatService {
        ChatService::new(
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(RuleBasedResponder::new(Arc::new(KnowledgeBase::default()))),
            policy,
        )
    }

    #[tokio::test]
    async fn test_cycle_appends_both_turns() {
        let service = service(LeadPolicy::PerSession);
        let outcome = service.handle("s1", "hi").await.unwrap();

        assert_eq!(outcome.intent, IntentLabel::Greeting);
        assert!(!outcome.lead_captured);

        let turns = service.store().turns("s1").await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].intent, Some(IntentLabel::Greeting));
        assert_eq!(turns[1].content, outcome.response);
    }

    #[tokio::test]
    async fn test_per_session_policy_single_record() {
        let service = service(LeadPolicy::PerSession);

        service.handle("s2", "call me at 9876543210").await.unwrap();
        let outcome = service.handle("s2", "what is the price?").await.unwrap();
        assert!(outcome.lead_captured);
        service.handle("s2", "thanks").await.unwrap();

        let leads = service.store().leads().await.unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].phone.as_deref(), Some("9876543210"));
        assert_eq!(leads[0].session_id, "s2");
    }

    #[tokio::test]
    async fn test_per_session_policy_updates_name() {
        let service = service(LeadPolicy::PerSession);

        service.handle("s1", "call me at 9876543210").await.unwrap();
        let first_id = service.store().leads().await.unwrap()[0].id.clone();

        service.handle("s1", "My name is Asha").await.unwrap();
        let leads = service.store().leads().await.unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, first_id);
        assert_eq!(leads[0].name.as_deref(), Some("name is Asha"));
        assert_eq!(leads[0].captured_turns.len(), 4);
    }

    #[tokio::test]
    async fn test_snapshot_policy_appends_every_message() {
        let service = service(LeadPolicy::Snapshots);

        service.handle("s2", "call me at 9876543210").await.unwrap();
        service.handle("s2", "what is the price?").await.unwrap();

        let leads = service.store().leads().await.unwrap();
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].captured_turns.len(), 2);
        assert_eq!(leads[1].captured_turns.len(), 4);
        assert_ne!(leads[0].id, leads[1].id);
    }

    #[tokio::test]
    async fn test_concurrent_cycles_do_not_interleave() {
        let service = Arc::new(service(LeadPolicy::PerSession));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service.handle("shared", &format!("message {}", i)).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let turns = service.store().turns("shared").await.unwrap();
        assert_eq!(turns.len(), 40);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].role, TurnRole::User);
            assert_eq!(pair[1].role, TurnRole::Assistant);
        }
    }

    #[tokio::test]
    async fn test_evict_idle_drops_slots() {
        let service = service(LeadPolicy::PerSession);
        service.handle("s1", "hi").await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(service.evict_idle(Duration::from_millis(10)).await, 1);
        assert!(service.slots.lock().is_empty());
        assert_eq!(service.store().session_count().await, 0);
    }

    /// Responder that takes a while to answer
    struct SlowResponder(Duration);

    #[async_trait]
    impl Responder for SlowResponder {
        async fn respond(&self, _message: &str, _history: &[Turn]) -> Reply {
            tokio::time::sleep(self.0).await;
            Reply {
                text: "done".to_string(),
                intent: IntentLabel::General,
                degraded: false,
            }
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_evict_idle_skips_session_mid_cycle() {
        let service = Arc::new(ChatService::new(
            Arc::new(InMemoryConversationStore::new()),
            Arc::new(SlowResponder(Duration::from_millis(150))),
            LeadPolicy::PerSession,
        ));

        let cycle = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.handle("busy", "hello").await })
        };
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(service.evict_idle(Duration::from_millis(20)).await, 0);
        cycle.await.unwrap().unwrap();

        let roles: Vec<TurnRole> = service
            .store()
            .turns("busy")
            .await
            .unwrap()
            .iter()
            .map(|t| t.role)
            .collect();
        assert_eq!(roles, vec![TurnRole::User, TurnRole::Assistant]);
        assert_eq!(service.slots.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_evict_idle_keeps_recent_sessions() {
        let service = service(LeadPolicy::PerSession);
        service.handle("old", "hi").await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        service.handle("fresh", "hi").await.unwrap();

        assert_eq!(service.evict_idle(Duration::from_millis(40)).await, 1);
        assert_eq!(service.store().session_count().await, 1);
        assert_eq!(service.store().turns("fresh").await.unwrap().len(), 2);
        assert!(service.slots.lock().contains_key("fresh"));
    }
}
