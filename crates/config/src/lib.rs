//! Configuration management for the farmland chat responder
//!
//! Supports loading configuration from:
//! - YAML/TOML files under `config/`
//! - Environment variables (`FARM_CHAT_<SECTION>__<KEY>`)
//!
//! The knowledge base is a separate, read-only document. It defaults to the
//! built-in Neralu Farms facts and can be replaced by a YAML file.

pub mod constants;
pub mod knowledge;
pub mod settings;

pub use knowledge::{
    Amenities, BrandInfo, Concept, Investment, KnowledgeBase, Plantation, Project,
};
pub use settings::{
    load_settings, LeadPolicy, LlmSettings, ObservabilityConfig, ResponderConfig,
    ResponderStrategyKind, ServerConfig, SessionConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
