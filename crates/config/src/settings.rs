//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{llm, responder, server, sessions};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Reply strategy selection
    #[serde(default)]
    pub responder: ResponderConfig,

    /// External model connection (used by the external_model strategy)
    #[serde(default)]
    pub llm: LlmSettings,

    /// Session and lead bookkeeping
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Optional YAML knowledge base replacing the built-in one
    #[serde(default)]
    pub knowledge_base_path: Option<String>,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.responder.history_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "responder.history_window".to_string(),
                message: "History window must hold at least one turn".to_string(),
            });
        }

        if self.sessions.eviction_enabled() && self.sessions.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sessions.cleanup_interval_secs".to_string(),
                message: "Must be greater than 0 when idle eviction is enabled".to_string(),
            });
        }

        self.validate_llm()
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS restrictions (false = permissive)
    #[serde(default)]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Name reported by the health endpoint
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    server::DEFAULT_PORT
}
fn default_service_name() -> String {
    server::SERVICE_NAME.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: false,
            cors_origins: Vec::new(),
            service_name: default_service_name(),
        }
    }
}

/// Which responder produces replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponderStrategyKind {
    /// Keyword intents and canned templates
    #[default]
    RuleBased,
    /// Remote text-completion service
    ExternalModel,
}

/// Responder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    #[serde(default)]
    pub strategy: ResponderStrategyKind,

    /// Prior turns passed to the external model
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Reply used when the external model fails
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

fn default_history_window() -> usize {
    responder::HISTORY_WINDOW
}
fn default_fallback_message() -> String {
    responder::FALLBACK_MESSAGE.to_string()
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            strategy: ResponderStrategyKind::default(),
            history_window: default_history_window(),
            fallback_message: default_fallback_message(),
        }
    }
}

/// External model connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key (falls back to OPENAI_API_KEY)
    #[serde(default = "default_api_key")]
    pub api_key: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    llm::OPENAI_ENDPOINT.to_string()
}
fn default_llm_model() -> String {
    llm::DEFAULT_MODEL.to_string()
}
fn default_api_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}
fn default_max_tokens() -> usize {
    llm::MAX_TOKENS
}
fn default_temperature() -> f32 {
    llm::TEMPERATURE
}
fn default_llm_timeout() -> u64 {
    llm::TIMEOUT_SECS
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: default_api_key(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// How captured leads are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadPolicy {
    /// One record per session, updated in place when the details change
    #[default]
    PerSession,
    /// Append a record on every message that carries a phone number
    Snapshots,
}

/// Session bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Evict sessions idle longer than this (0 = keep forever)
    #[serde(default)]
    pub idle_timeout_secs: u64,

    /// Interval between eviction sweeps
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    #[serde(default)]
    pub lead_policy: LeadPolicy,
}

fn default_cleanup_interval() -> u64 {
    sessions::CLEANUP_INTERVAL_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 0,
            cleanup_interval_secs: default_cleanup_interval(),
            lead_policy: LeadPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn eviction_enabled(&self) -> bool {
        self.idle_timeout_secs > 0
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (`FARM_CHAT_<SECTION>__<KEY>`, e.g. `FARM_CHAT_SERVER__PORT`)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("FARM_CHAT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.service_name, "Neralu Farms Chatbot");
        assert_eq!(settings.responder.strategy, ResponderStrategyKind::RuleBased);
        assert_eq!(settings.responder.history_window, 10);
        assert_eq!(settings.sessions.lead_policy, LeadPolicy::PerSession);
        assert!(!settings.sessions.eviction_enabled());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());

        settings.server.port = 8080;
        settings.responder.history_window = 0;
        assert!(settings.validate().is_err());

        settings.responder.history_window = 4;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cleanup_interval_required_with_eviction() {
        let mut settings = Settings::default();
        settings.sessions.cleanup_interval_secs = 0;
        assert!(settings.validate().is_ok());

        settings.sessions.idle_timeout_secs = 600;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "sessions.cleanup_interval_secs"
        ));

        settings.sessions.cleanup_interval_secs = 60;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_use_section_keys() {
        std::env::set_var("FARM_CHAT_SERVER__PORT", "8081");
        std::env::set_var("FARM_CHAT_SESSIONS__LEAD_POLICY", "snapshots");

        let settings = load_settings(None);

        std::env::remove_var("FARM_CHAT_SERVER__PORT");
        std::env::remove_var("FARM_CHAT_SESSIONS__LEAD_POLICY");

        let settings = settings.unwrap();
        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.sessions.lead_policy, LeadPolicy::Snapshots);
    }

    #[test]
    fn test_llm_validation() {
        let mut settings = Settings::default();

        settings.llm.temperature = 2.5;
        assert!(settings.validate_llm().is_err());

        settings.llm.temperature = -0.1;
        assert!(settings.validate_llm().is_err());

        settings.llm.temperature = 1.0;
        settings.llm.max_tokens = 0;
        assert!(settings.validate_llm().is_err());

        settings.llm.max_tokens = 200;
        assert!(settings.validate_llm().is_ok());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let yaml = "responder:\n  strategy: external_model\nsessions:\n  lead_policy: snapshots\n  idle_timeout_secs: 600\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(settings.responder.strategy, ResponderStrategyKind::ExternalModel);
        assert_eq!(settings.responder.history_window, 10);
        assert_eq!(settings.sessions.lead_policy, LeadPolicy::Snapshots);
        assert!(settings.sessions.eviction_enabled());
        assert_eq!(settings.sessions.cleanup_interval_secs, 300);
        assert_eq!(settings.server.port, 5000);
    }
}
