use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use agentry_macros::agentry_agent;
pub use inventory;

mod params;

pub use params::{Params, ParamsError};

/// SDK version stamped into every registrar by `#[agentry_agent]`.
/// The harness refuses registrars built against an incompatible SDK.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seal emitted by the official macro. Hand-written registrars that do not
/// carry it are rejected during discovery.
pub const OFFICIAL_SDK_SEAL: u32 = 0x4147_4E54; // "AGNT"

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Result of an agent self-test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthReport {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: message.into(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Configuration handed to an agent factory. Values come from the
/// component manifest and are overridden by `AGENTRY_<NAME>_<KEY>`.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    pub name: String,
    pub config_values: HashMap<String, String>,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_values.insert(key.into(), value.into());
        self
    }

    /// Returns the value for `key`, treating empty strings as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config_values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }
}

/// The capability contract every component implements.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Perform the agent's unit of work against the shared parameter set.
    async fn execute(&self, params: &Params) -> anyhow::Result<serde_json::Value>;

    /// Lightweight self-test. Implementations report failures as
    /// [`HealthStatus::Unhealthy`] instead of returning an error.
    async fn health_check(&self) -> HealthReport;
}

pub type AgentFactory = fn(AgentConfig) -> anyhow::Result<Box<dyn Agent>>;

/// Link-time registration record. One is submitted per agent type by
/// `#[agentry_agent]` and collected by the harness through `inventory`.
#[derive(Clone, Copy)]
pub struct AgentRegistrar {
    pub module_path: &'static str,
    pub class_name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub config_keys: &'static [&'static str],
    pub sdk_seal: u32,
    pub sdk_version: &'static str,
    pub factory: AgentFactory,
}

impl std::fmt::Debug for AgentRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistrar")
            .field("module_path", &self.module_path)
            .field("class_name", &self.class_name)
            .field("version", &self.version)
            .field("sdk_version", &self.sdk_version)
            .finish_non_exhaustive()
    }
}

inventory::collect!(AgentRegistrar);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_treats_empty_as_unset() {
        let config = AgentConfig::new("weather")
            .with_value("api_key", "")
            .with_value("base_url", "http://localhost:1234");

        assert_eq!(config.get("api_key"), None);
        assert_eq!(config.get("base_url"), Some("http://localhost:1234"));
        assert_eq!(config.get_or("api_key", "fallback"), "fallback");
    }

    #[test]
    fn test_health_report_serializes_lowercase_status() {
        let report = HealthReport::unhealthy("No API key provided");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["message"], "No API key provided");
        assert!(!report.is_healthy());
    }
}
