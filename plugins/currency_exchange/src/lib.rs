use agentry_shared::{agentry_agent, Agent, AgentConfig, AgentError, HealthReport, Params};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
const EXCHANGE_FUNCTION: &str = "CURRENCY_EXCHANGE_RATE";
const RATE_KEY: &str = "Realtime Currency Exchange Rate";

#[agentry_agent(
    module = "currency_exchange",
    class = "CurrencyExchangeAgent",
    description = "Real-time currency exchange rates from Alpha Vantage.",
    version = "0.1.0",
    config_keys = ["api_key", "base_url", "timeout_secs"]
)]
pub struct CurrencyExchangeAgent {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ExchangeArgs {
    from_currency: String,
    to_currency: String,
    #[serde(default)]
    apikey: Option<String>,
}

/// A currency code is exactly three ASCII uppercase letters.
pub fn validate_currency(field: &str, code: &str) -> Result<(), AgentError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(AgentError::InvalidParameter {
            name: field.to_string(),
            reason: "Currency code must be exactly 3 uppercase letters.".to_string(),
        })
    }
}

impl CurrencyExchangeAgent {
    pub fn new_agent(config: AgentConfig) -> anyhow::Result<Self> {
        let timeout_secs = match config.get("timeout_secs") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| AgentError::ConfigError(format!("Invalid timeout_secs '{v}'")))?,
            None => 10,
        };

        Ok(Self {
            api_key: config.get("api_key").map(str::to_string),
            base_url: config.get_or("base_url", DEFAULT_BASE_URL),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()?,
        })
    }

    async fn exchange_rate(&self, api_key: &str, from: &str, to: &str) -> anyhow::Result<Value> {
        validate_currency("from_currency", from)?;
        validate_currency("to_currency", to)?;

        info!(from, to, "Fetching exchange rate");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", EXCHANGE_FUNCTION),
                ("from_currency", from),
                ("to_currency", to),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Alpha Vantage responded");
        if !status.is_success() {
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                message: "Network or API error".to_string(),
            }
            .into());
        }

        let body: Value = response.json().await?;
        if body.get(RATE_KEY).is_none() {
            error!("Unexpected API response: Missing '{RATE_KEY}'");
            return Err(AgentError::UnexpectedResponse(format!("Missing '{RATE_KEY}'")).into());
        }

        info!("Successfully fetched currency exchange rate.");
        Ok(body)
    }
}

#[async_trait]
impl Agent for CurrencyExchangeAgent {
    async fn execute(&self, params: &Params) -> anyhow::Result<Value> {
        let args: ExchangeArgs = params.bind()?;
        let api_key = args
            .apikey
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone())
            .ok_or(AgentError::MissingParameter("apikey".to_string()))?;

        self.exchange_rate(&api_key, &args.from_currency, &args.to_currency)
            .await
    }

    async fn health_check(&self) -> HealthReport {
        let Some(api_key) = self.api_key.as_deref() else {
            return HealthReport::unhealthy("No API key provided");
        };

        info!("Performing health check for Alpha Vantage API.");
        match self.exchange_rate(api_key, "USD", "EUR").await {
            Ok(_) => HealthReport::healthy("API is operational."),
            Err(e) => {
                error!(error = %e, "Health check failed");
                HealthReport::unhealthy(e.to_string())
            }
        }
    }
}
