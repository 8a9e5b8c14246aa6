use agentry_shared::{agentry_agent, Agent, AgentConfig, AgentError, HealthReport, Params};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_BASE_URL: &str = "https://dogapi.dog/api/v2";
const DEFAULT_SERVICE: &str = "facts";

#[agentry_agent(
    module = "dog_facts",
    class = "DogFactsAgent",
    description = "Fetches a resource from a dog facts API.",
    version = "0.1.0",
    config_keys = ["base_url", "health_service", "timeout_secs"]
)]
pub struct DogFactsAgent {
    base_url: String,
    health_service: String,
    client: reqwest::Client,
}

impl DogFactsAgent {
    pub fn new_agent(config: AgentConfig) -> anyhow::Result<Self> {
        let timeout_secs = match config.get("timeout_secs") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| AgentError::ConfigError(format!("Invalid timeout_secs '{v}'")))?,
            None => 10,
        };

        Ok(Self {
            base_url: config.get_or("base_url", DEFAULT_BASE_URL),
            health_service: config.get_or("health_service", DEFAULT_SERVICE),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()?,
        })
    }

    async fn get(&self, endpoint: &str, service: &str) -> anyhow::Result<Value> {
        let url = format!(
            "{}/{}",
            endpoint.trim_end_matches('/'),
            service.trim_start_matches('/')
        );
        info!(%url, "Requesting dog facts");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                message: format!("GET {url} failed"),
            }
            .into());
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Agent for DogFactsAgent {
    async fn execute(&self, params: &Params) -> anyhow::Result<Value> {
        let endpoint = match params.get("endpoint") {
            Some(_) => params.require_str("endpoint")?,
            None => self.base_url.as_str(),
        };
        let service = params.require_str("service")?;

        self.get(endpoint, service).await.map_err(|e| {
            error!(error = %e, "Something went wrong fetching dog facts");
            e
        })
    }

    async fn health_check(&self) -> HealthReport {
        match self.get(&self.base_url, &self.health_service).await {
            Ok(_) => HealthReport::healthy("Dog facts API is available"),
            Err(e) => HealthReport::unhealthy(e.to_string()),
        }
    }
}
