use agentry_shared::{Agent, AgentConfig, HealthStatus, Params};
use plugin_weather::WeatherAgent;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weather_payload() -> serde_json::Value {
    json!({
        "main": {
            "temp": 20.5,
            "feels_like": 19.8,
            "temp_min": 18.9,
            "temp_max": 22.1,
            "humidity": 65,
            "pressure": 1012
        },
        "weather": [{"main": "Clouds", "description": "scattered clouds", "icon": "03d"}],
        "wind": {"speed": 3.1, "deg": 240},
        "clouds": {"all": 40},
        "visibility": 10000,
        "sys": {"country": "GB"}
    })
}

fn agent(server: &MockServer, api_key: Option<&str>) -> WeatherAgent {
    let mut config = AgentConfig::new("weather").with_value("base_url", server.uri());
    if let Some(key) = api_key {
        config = config.with_value("api_key", key);
    }
    WeatherAgent::new_agent(config).unwrap()
}

#[tokio::test]
async fn test_execute_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/city/London/GB"))
        .and(header("x-rapidapi-key", "test_api_key"))
        .and(header("x-rapidapi-host", "open-weather13.p.rapidapi.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let params = Params::new().with("city", "London").with("country_code", "GB");
    let result = agent(&server, Some("test_api_key")).execute(&params).await.unwrap();

    assert_eq!(result["location"]["name"], "London");
    assert_eq!(result["location"]["country"], "GB");
    assert_eq!(result["temperature"]["current"], 20.5);
    assert_eq!(result["weather"]["description"], "scattered clouds");
    assert_eq!(result["humidity"], 65);
}

#[tokio::test]
async fn test_execute_without_country_uses_api_country() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/city/London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_payload()))
        .mount(&server)
        .await;

    let params = Params::new().with("city", "  London  ");
    let result = agent(&server, Some("k")).execute(&params).await.unwrap();

    assert_eq!(result["location"]["name"], "London");
    assert_eq!(result["location"]["country"], "GB");
}

#[tokio::test]
async fn test_param_api_key_overrides_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-rapidapi-key", "from-params"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let params = Params::new().with("city", "London").with("api_key", "from-params");
    assert!(agent(&server, Some("from-config")).execute(&params).await.is_ok());
}

#[tokio::test]
async fn test_execute_empty_city() {
    let server = MockServer::start().await;
    let params = Params::new().with("city", "").with("country_code", "GB");

    let err = agent(&server, Some("k")).execute(&params).await.unwrap_err();
    assert!(err.to_string().contains("City name cannot be empty"));
}

#[tokio::test]
async fn test_execute_without_api_key() {
    let server = MockServer::start().await;
    let params = Params::new().with("city", "London");

    let err = agent(&server, None).execute(&params).await.unwrap_err();
    assert!(err.to_string().contains("API key must be provided"));
}

#[tokio::test]
async fn test_execute_api_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid API key"})))
        .mount(&server)
        .await;

    let params = Params::new().with("city", "London");
    let err = agent(&server, Some("bad")).execute(&params).await.unwrap_err();
    assert!(err.to_string().contains("API error: Invalid API key"));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/city/london/GB"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_payload()))
        .mount(&server)
        .await;

    let healthy = agent(&server, Some("k")).health_check().await;
    assert_eq!(healthy.status, HealthStatus::Healthy);

    let no_key = agent(&server, None).health_check().await;
    assert_eq!(no_key.status, HealthStatus::Unhealthy);
    assert_eq!(no_key.message, "No API key provided");
}

#[tokio::test]
async fn test_health_check_reports_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let report = agent(&server, Some("k")).health_check().await;
    assert_eq!(report.status, HealthStatus::Unhealthy);
    assert!(report.message.contains("503"));
}
