//! Rule-based conversational responder
//!
//! This crate contains the decision logic of the chat widget:
//! - `IntentClassifier`: ordered keyword matching, first match wins
//! - `templates::render`: one canned reply per intent, filled from the knowledge base
//! - `LeadExtractor`: phone number and name heuristics over user turns
//! - `Responder`: pluggable reply strategy (rule-based or external model)

pub mod extractor;
pub mod intent;
pub mod responder;
pub mod templates;

pub use extractor::LeadExtractor;
pub use intent::{Classification, IntentClassifier, IntentPattern};
pub use responder::{
    build_responder, ExternalModelResponder, Reply, Responder, RuleBasedResponder,
};
pub use templates::render;

