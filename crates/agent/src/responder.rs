//! Reply strategies
//!
//! A `Responder` turns the latest visitor message into a reply. The
//! rule-based strategy is the default; the external-model strategy sends
//! the conversation to an OpenAI-compatible backend and degrades to a fixed
//! apology when the call fails.

use std::sync::Arc;

use async_trait::async_trait;

use farm_chat_config::{KnowledgeBase, ResponderConfig, ResponderStrategyKind, Settings};
use farm_chat_core::{IntentLabel, Turn};
use farm_chat_llm::{LlmBackend, OpenAIBackend, OpenAIConfig, PromptBuilder};

use crate::intent::IntentClassifier;
use crate::templates;

/// Reply produced for one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub intent: IntentLabel,
    /// True when the text is the fallback apology
    pub degraded: bool,
}

/// Reply strategy
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a reply. `history` already ends with the user turn for `message`.
    async fn respond(&self, message: &str, history: &[Turn]) -> Reply;

    /// Strategy name for logs
    fn name(&self) -> &'static str;
}

/// Keyword intents rendered through canned templates
pub struct RuleBasedResponder {
    classifier: IntentClassifier,
    kb: Arc<KnowledgeBase>,
}

impl RuleBasedResponder {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self::with_classifier(IntentClassifier::new(), kb)
    }

    pub fn with_classifier(classifier: IntentClassifier, kb: Arc<KnowledgeBase>) -> Self {
        Self { classifier, kb }
    }

    /// Synchronous core shared with the async trait method
    pub fn reply(&self, message: &str) -> Reply {
        let classification = self.classifier.classify_detailed(message);
        tracing::debug!(
            intent = %classification.label,
            phrase = ?classification.matched_phrase,
            "Classified message"
        );

        Reply {
            text: templates::render(classification.label, &self.kb),
            intent: classification.label,
            degraded: false,
        }
    }
}

#[async_trait]
impl Responder for RuleBasedResponder {
    async fn respond(&self, message: &str, _history: &[Turn]) -> Reply {
        self.reply(message)
    }

    fn name(&self) -> &'static str {
        "rule_based"
    }
}

/// Replies generated by an external chat-completion model
pub struct ExternalModelResponder {
    backend: Arc<dyn LlmBackend>,
    classifier: IntentClassifier,
    kb: Arc<KnowledgeBase>,
    history_window: usize,
    fallback_message: String,
}

impl ExternalModelResponder {
    pub fn new(
        backend: Arc<dyn LlmBackend>,
        kb: Arc<KnowledgeBase>,
        config: &ResponderConfig,
    ) -> Self {
        Self {
            backend,
            classifier: IntentClassifier::new(),
            kb,
            history_window: config.history_window,
            fallback_message: config.fallback_message.clone(),
        }
    }
}

#[async_trait]
impl Responder for ExternalModelResponder {
    async fn respond(&self, message: &str, history: &[Turn]) -> Reply {
        let intent = self.classifier.classify(message);
        let messages = PromptBuilder::new(&self.kb).build_messages(history, self.history_window);

        match self.backend.generate(&messages).await {
            Ok(result) => {
                tracing::debug!(
                    model = self.backend.model_name(),
                    tokens = result.tokens,
                    latency_ms = result.total_time_ms,
                    "Model reply generated"
                );
                Reply {
                    text: result.text.trim().to_string(),
                    intent,
                    degraded: false,
                }
            }
            Err(e) => {
                tracing::warn!(
                    model = self.backend.model_name(),
                    error = %e,
                    "Model call failed, sending fallback reply"
                );
                Reply {
                    text: self.fallback_message.clone(),
                    intent,
                    degraded: true,
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "external_model"
    }
}

/// Build the responder selected in settings.
///
/// An external backend that cannot be constructed (missing API key, bad
/// client setup) is reported and replaced by the rule-based responder.
pub fn build_responder(settings: &Settings, kb: Arc<KnowledgeBase>) -> Arc<dyn Responder> {
    match settings.responder.strategy {
        ResponderStrategyKind::RuleBased => Arc::new(RuleBasedResponder::new(kb)),
        ResponderStrategyKind::ExternalModel => {
            match OpenAIBackend::new(OpenAIConfig::from(&settings.llm)) {
                Ok(backend) => {
                    tracing::info!(model = %settings.llm.model, "Using external model responder");
                    Arc::new(ExternalModelResponder::new(
                        Arc::new(backend),
                        kb,
                        &settings.responder,
                    ))
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "External model unavailable, falling back to rule-based responder"
                    );
                    Arc::new(RuleBasedResponder::new(kb))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_chat_llm::{FinishReason, GenerationResult, LlmError, Message, Role};
    use std::sync::Mutex;

    /// Backend double recording the messages it was sent
    struct ScriptedBackend {
        reply: Option<String>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedBackend {
        fn answering(text: &str) -> Self {
            Self {
                reply: Some(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn generate(&self, messages: &[Message]) -> Result<GenerationResult, LlmError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            match &self.reply {
                Some(text) => Ok(GenerationResult {
                    text: text.clone(),
                    tokens: 3,
                    total_time_ms: 1,
                    finish_reason: FinishReason::Stop,
                }),
                None => Err(LlmError::Network("connection refused".to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn kb() -> Arc<KnowledgeBase> {
        Arc::new(KnowledgeBase::default())
    }

    #[tokio::test]
    async fn test_rule_based_reply() {
        let responder = RuleBasedResponder::new(kb());
        let reply = responder.respond("hi", &[Turn::user("hi")]).await;

        assert_eq!(reply.intent, IntentLabel::Greeting);
        assert_eq!(reply.text, templates::render(IntentLabel::Greeting, &KnowledgeBase::default()));
        assert!(!reply.degraded);
        assert_eq!(responder.name(), "rule_based");
    }

    #[tokio::test]
    async fn test_rule_based_ignores_history() {
        let responder = RuleBasedResponder::new(kb());
        let history = vec![Turn::user("tell me about pricing"), Turn::user("zzz")];

        let reply = responder.respond("zzz", &history).await;
        assert_eq!(reply.intent, IntentLabel::General);
    }

    #[tokio::test]
    async fn test_external_model_reply() {
        let backend = Arc::new(ScriptedBackend::answering("  Plots start from a site visit.  "));
        let responder =
            ExternalModelResponder::new(backend.clone(), kb(), &ResponderConfig::default());

        let history = vec![Turn::user("what is the price?")];
        let reply = responder.respond("what is the price?", &history).await;

        assert_eq!(reply.text, "Plots start from a site visit.");
        assert_eq!(reply.intent, IntentLabel::Pricing);
        assert!(!reply.degraded);

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].role, Role::System);
        assert_eq!(seen[0][1], Message::user("what is the price?"));
    }

    #[tokio::test]
    async fn test_external_model_window() {
        let backend = Arc::new(ScriptedBackend::answering("ok"));
        let config = ResponderConfig {
            history_window: 2,
            ..ResponderConfig::default()
        };
        let responder = ExternalModelResponder::new(backend.clone(), kb(), &config);

        let history = vec![
            Turn::user("first"),
            Turn::assistant("reply"),
            Turn::user("second"),
        ];
        responder.respond("second", &history).await;

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 3);
        assert_eq!(seen[0][1], Message::assistant("reply"));
        assert_eq!(seen[0][2], Message::user("second"));
    }

    #[tokio::test]
    async fn test_external_model_failure_falls_back() {
        let responder = ExternalModelResponder::new(
            Arc::new(ScriptedBackend::failing()),
            kb(),
            &ResponderConfig::default(),
        );

        let reply = responder.respond("hello", &[Turn::user("hello")]).await;
        assert_eq!(
            reply.text,
            "I apologize, but I'm having trouble processing your request. Please try again or contact our team directly."
        );
        assert_eq!(reply.intent, IntentLabel::Greeting);
        assert!(reply.degraded);
    }

    #[test]
    fn test_build_responder_defaults_to_rule_based() {
        let responder = build_responder(&Settings::default(), kb());
        assert_eq!(responder.name(), "rule_based");
    }

    #[test]
    fn test_build_responder_without_key_falls_back() {
        let mut settings = Settings::default();
        settings.responder.strategy = ResponderStrategyKind::ExternalModel;
        settings.llm.api_key = String::new();
        settings.llm.endpoint = "https://api.openai.com/v1".to_string();

        let responder = build_responder(&settings, kb());
        assert_eq!(responder.name(), "rule_based");
    }

    #[test]
    fn test_build_responder_local_endpoint() {
        let mut settings = Settings::default();
        settings.responder.strategy = ResponderStrategyKind::ExternalModel;
        settings.llm.api_key = String::new();
        settings.llm.endpoint = "http://localhost:11434/v1".to_string();

        let responder = build_responder(&settings, kb());
        assert_eq!(responder.name(), "external_model");
    }
}
