use agentry_shared::{agentry_agent, Agent, AgentConfig, AgentError, HealthReport, Params};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_BASE_URL: &str = "https://open-weather13.p.rapidapi.com";
const DEFAULT_HOST: &str = "open-weather13.p.rapidapi.com";

#[agentry_agent(
    module = "weather",
    class = "WeatherAgent",
    description = "Current weather for a city from the Open Weather API on RapidAPI.",
    version = "0.1.0",
    config_keys = ["api_key", "base_url", "host", "timeout_secs"]
)]
pub struct WeatherAgent {
    api_key: Option<String>,
    base_url: String,
    host: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    #[serde(default)]
    city: String,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
}

impl WeatherAgent {
    pub fn new_agent(config: AgentConfig) -> anyhow::Result<Self> {
        let timeout_secs = match config.get("timeout_secs") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| AgentError::ConfigError(format!("Invalid timeout_secs '{v}'")))?,
            None => 10,
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            api_key: config.get("api_key").map(str::to_string),
            base_url: config.get_or("base_url", DEFAULT_BASE_URL),
            host: config.get_or("host", DEFAULT_HOST),
            client,
        })
    }

    fn city_url(&self, city: &str, country_code: Option<&str>) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| AgentError::ConfigError(format!("base_url '{}' cannot be a base", self.base_url)))?;
            segments.pop_if_empty().push("city").push(city);
            if let Some(code) = country_code {
                segments.push(code);
            }
        }
        Ok(url)
    }

    async fn fetch(&self, api_key: &str, city: &str, country_code: Option<&str>) -> anyhow::Result<Value> {
        let url = self.city_url(city, country_code)?;
        info!(%url, "Making request to Open Weather API");

        let response = self
            .client
            .get(url)
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = match body.get("message").and_then(Value::as_str) {
                Some(m) => format!("API error: {m}"),
                None => format!("API request failed with status code {}", status.as_u16()),
            };
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                message,
            }
            .into());
        }
        Ok(response.json().await?)
    }
}

/// Reshape the raw API payload into the agent's stable output format.
pub fn normalize(city: &str, country_code: Option<&str>, data: &Value) -> Value {
    let main = &data["main"];
    let weather = &data["weather"][0];
    let country = country_code
        .map(Value::from)
        .or_else(|| data["sys"]["country"].as_str().map(Value::from))
        .unwrap_or_else(|| Value::from("Unknown"));

    json!({
        "location": {
            "name": city,
            "country": country,
        },
        "temperature": {
            "current": main["temp"],
            "feels_like": main["feels_like"],
            "min": main["temp_min"],
            "max": main["temp_max"],
        },
        "weather": {
            "description": weather["description"].as_str().unwrap_or("Unknown"),
            "main": weather["main"].as_str().unwrap_or("Unknown"),
            "icon": weather["icon"],
        },
        "wind": {
            "speed": data["wind"]["speed"],
            "direction": data["wind"]["deg"],
        },
        "humidity": main["humidity"],
        "pressure": main["pressure"],
        "clouds": data["clouds"]["all"],
        "visibility": data["visibility"],
    })
}

#[async_trait]
impl Agent for WeatherAgent {
    async fn execute(&self, params: &Params) -> anyhow::Result<Value> {
        let args: WeatherArgs = params.bind()?;

        let api_key = args
            .api_key
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| AgentError::ConfigError("API key must be provided".to_string()))?;

        let city = args.city.trim();
        if city.is_empty() {
            return Err(AgentError::InvalidParameter {
                name: "city".to_string(),
                reason: "City name cannot be empty".to_string(),
            }
            .into());
        }
        let country_code = args
            .country_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        info!(city, "Fetching weather");
        let data = self.fetch(&api_key, city, country_code).await?;
        info!("Successfully fetched weather information");
        Ok(normalize(city, country_code, &data))
    }

    async fn health_check(&self) -> HealthReport {
        let Some(api_key) = self.api_key.as_deref() else {
            return HealthReport::unhealthy("No API key provided");
        };

        info!("Performing Open Weather API health check...");
        match self.fetch(api_key, "london", Some("GB")).await {
            Ok(_) => HealthReport::healthy("Open Weather API service is available"),
            Err(e) => {
                error!(error = %e, "Open Weather API health check failed");
                HealthReport::unhealthy(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        json!({
            "main": {"temp": 20.5, "feels_like": 19.8, "temp_min": 18.9, "temp_max": 22.1, "humidity": 65, "pressure": 1012},
            "weather": [{"main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
            "wind": {"speed": 3.1, "deg": 240},
            "clouds": {"all": 40},
            "visibility": 10000,
            "sys": {"country": "GB"}
        })
    }

    #[test]
    fn test_normalize_maps_fields() {
        let out = normalize("London", Some("GB"), &sample());
        assert_eq!(out["location"]["name"], "London");
        assert_eq!(out["location"]["country"], "GB");
        assert_eq!(out["temperature"]["current"], 20.5);
        assert_eq!(out["weather"]["description"], "scattered clouds");
        assert_eq!(out["wind"]["direction"], 240);
        assert_eq!(out["humidity"], 65);
        assert_eq!(out["clouds"], 40);
    }

    #[test]
    fn test_normalize_falls_back_for_missing_data() {
        let out = normalize("Paris", None, &json!({"sys": {"country": "FR"}}));
        assert_eq!(out["location"]["country"], "FR");
        assert_eq!(out["weather"]["main"], "Unknown");
        assert!(out["temperature"]["current"].is_null());

        let out = normalize("Nowhere", None, &json!({}));
        assert_eq!(out["location"]["country"], "Unknown");
    }

    #[test]
    fn test_city_url_encodes_segments() {
        let agent = WeatherAgent::new_agent(
            AgentConfig::new("weather").with_value("base_url", "http://localhost:8080/"),
        )
        .unwrap();
        let url = agent.city_url("New York", Some("US")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/city/New%20York/US");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let config = AgentConfig::new("weather").with_value("timeout_secs", "soon");
        assert!(WeatherAgent::new_agent(config).is_err());
    }
}
