use agentry_shared::{agentry_agent, Agent, AgentConfig, HealthReport, Params};
use async_trait::async_trait;
use std::sync::Mutex;

/// Every `RecordingAgent::execute` call, in invocation order.
/// Instances are created fresh per invocation, so recording has to live
/// outside the agent.
static RECORDS: Mutex<Vec<(String, Params)>> = Mutex::new(Vec::new());

/// Parameter sets observed by the component named `component`.
pub fn recorded(component: &str) -> Vec<Params> {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(name, _)| name == component)
        .map(|(_, params)| params.clone())
        .collect()
}

/// Names of the given components in the order they executed.
pub fn execution_order(components: &[&str]) -> Vec<String> {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|(name, _)| components.contains(&name.as_str()))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Records its parameters and echoes them back together with its config.
#[agentry_agent(
    module = "test_agents",
    class = "RecordingAgent",
    description = "Records the parameters it receives",
    config_keys = ["token"]
)]
pub struct RecordingAgent {
    config: AgentConfig,
}

impl RecordingAgent {
    pub fn new_agent(config: AgentConfig) -> anyhow::Result<Self> {
        Ok(Self { config })
    }
}

#[async_trait]
impl Agent for RecordingAgent {
    async fn execute(&self, params: &Params) -> anyhow::Result<serde_json::Value> {
        RECORDS
            .lock()
            .unwrap()
            .push((self.config.name.clone(), params.clone()));
        Ok(serde_json::json!({
            "component": self.config.name,
            "params": params,
            "token": self.config.get("token"),
        }))
    }

    async fn health_check(&self) -> HealthReport {
        HealthReport::healthy("recording")
    }
}

#[agentry_agent(module = "test_agents", class = "FailingAgent")]
pub struct FailingAgent;

impl FailingAgent {
    pub fn new_agent(_config: AgentConfig) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait]
impl Agent for FailingAgent {
    async fn execute(&self, _params: &Params) -> anyhow::Result<serde_json::Value> {
        Err(anyhow::anyhow!("upstream exploded"))
    }

    async fn health_check(&self) -> HealthReport {
        HealthReport::unhealthy("always failing")
    }
}

#[agentry_agent(module = "test_agents", class = "PanickingAgent")]
pub struct PanickingAgent;

impl PanickingAgent {
    pub fn new_agent(_config: AgentConfig) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

#[async_trait]
impl Agent for PanickingAgent {
    async fn execute(&self, _params: &Params) -> anyhow::Result<serde_json::Value> {
        panic!("agent lost its mind")
    }

    async fn health_check(&self) -> HealthReport {
        panic!("health probe lost its mind")
    }
}

/// Construction always fails, e.g. a required setting is absent.
#[agentry_agent(module = "test_agents", class = "UnconfigurableAgent")]
pub struct UnconfigurableAgent;

impl UnconfigurableAgent {
    pub fn new_agent(config: AgentConfig) -> anyhow::Result<Self> {
        anyhow::bail!("component '{}' requires an endpoint", config.name)
    }
}

#[async_trait]
impl Agent for UnconfigurableAgent {
    async fn execute(&self, _params: &Params) -> anyhow::Result<serde_json::Value> {
        Ok(serde_json::Value::Null)
    }

    async fn health_check(&self) -> HealthReport {
        HealthReport::healthy("unreachable")
    }
}
