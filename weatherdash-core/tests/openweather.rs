//! Integration tests for the fetch pipeline against a mock OpenWeather server.

use std::{sync::Arc, time::Duration};

use weatherdash_core::{
    Config, ErrorKind, OpenWeatherProvider, Query, RetryPolicy, Units, WeatherService,
    fetch_with_retry,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/data/2.5/weather";

fn london_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -0.1257, "lat": 51.5085 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "main": { "temp": 12.4, "feels_like": 11.6, "pressure": 1011, "humidity": 77 },
        "visibility": 10000,
        "wind": { "speed": 4.63, "deg": 250 },
        "clouds": { "all": 75 },
        "dt": 1_700_000_000,
        "sys": { "country": "GB", "sunrise": 1_699_945_000, "sunset": 1_699_978_000 },
        "name": "London",
        "cod": 200
    })
}

fn service_for(server: &MockServer, config: &Config) -> WeatherService {
    let provider = OpenWeatherProvider::new("TEST_KEY".to_string())
        .with_base_url(&format!("{}{ENDPOINT}", server.uri()))
        .with_units(config.api.units)
        .with_language(&config.api.language);

    WeatherService::new(Arc::new(provider), config)
}

#[tokio::test]
async fn test_fetch_by_city_sends_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .and(query_param("lang", "en"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let svc = service_for(&server, &Config::default());
    let record = svc.fetch_weather(&Query::place("  London ")).await.unwrap();

    assert_eq!(record.display_name(), "London, GB");
    assert_eq!(record.condition.description, "broken clouds");
    assert_eq!(record.humidity_pct, 77);
    assert_eq!(record.units, Units::Metric);
}

#[tokio::test]
async fn test_second_lookup_is_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let svc = service_for(&server, &Config::default());
    let first = svc.fetch_weather(&Query::place("london")).await.unwrap();
    let second = svc.fetch_weather(&Query::place("  London  ")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(svc.cache().len(), 1);
}

#[tokio::test]
async fn test_fetch_by_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("lat", "51.5085"))
        .and(query_param("lon", "-0.1257"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(2)
        .mount(&server)
        .await;

    let svc = service_for(&server, &Config::default());
    let query = Query::coordinates(51.5085, -0.1257);

    svc.fetch_weather(&query).await.unwrap();
    svc.fetch_weather(&query).await.unwrap();

    assert!(svc.cache().is_empty());
}

#[tokio::test]
async fn test_imperial_units_are_requested() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.api.units = Units::Imperial;
    let svc = service_for(&server, &config);

    let record = svc.fetch_weather(&Query::place("London")).await.unwrap();
    assert_eq!(record.units, Units::Imperial);
}

#[tokio::test]
async fn test_error_statuses_are_classified() {
    let cases: [(u16, ErrorKind); 8] = [
        (404, ErrorKind::NotFound),
        (401, ErrorKind::Unauthorized),
        (429, ErrorKind::RateLimited),
        (500, ErrorKind::ServerUnavailable),
        (502, ErrorKind::ServerUnavailable),
        (503, ErrorKind::ServerUnavailable),
        (400, ErrorKind::UpstreamError(400)),
        (504, ErrorKind::UpstreamError(504)),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "cod": status.to_string(),
                "message": "error"
            })))
            .mount(&server)
            .await;

        let svc = service_for(&server, &Config::default());
        let err = svc.fetch_weather(&Query::place("Nowhere")).await.unwrap_err();

        assert_eq!(err.kind, expected, "status {status}");
        assert!(svc.cache().is_empty());
    }
}

#[tokio::test]
async fn test_missing_description_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "X",
            "main": { "temp": 1.0, "feels_like": 0.5, "humidity": 40, "pressure": 1000 },
            "weather": [{}],
            "wind": { "speed": 2.0 },
            "sys": {}
        })))
        .mount(&server)
        .await;

    let svc = service_for(&server, &Config::default());
    let err = svc.fetch_weather(&Query::place("X")).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::MalformedResponse);
    assert!(svc.cache().is_empty());
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let svc = service_for(&server, &Config::default());
    let err = svc.fetch_weather(&Query::place("London")).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_slow_response_times_out_and_is_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(london_body())
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.app.request_timeout_ms = 100;
    let svc = service_for(&server, &config);

    let err = svc.fetch_weather(&Query::place("London")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Timeout);
    assert_eq!(err.message, config.messages.request_timeout);

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(svc.cache().is_empty());
}

#[tokio::test]
async fn test_unreachable_server_is_network_unavailable() {
    // Nothing listens on port 1.
    let provider = OpenWeatherProvider::new("TEST_KEY".to_string())
        .with_base_url(&format!("http://127.0.0.1:1{ENDPOINT}"));
    let svc = WeatherService::new(Arc::new(provider), &Config::default());

    let err = svc.fetch_weather(&Query::place("London")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NetworkUnavailable);
}

#[tokio::test]
async fn test_retry_recovers_from_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
        .expect(1)
        .mount(&server)
        .await;

    let svc = service_for(&server, &Config::default());
    let policy = RetryPolicy::new(3, Duration::from_millis(10));

    let record = fetch_with_retry(&svc, &Query::place("London"), policy).await.unwrap();
    assert_eq!(record.location_name, "London");
}

#[test]
fn test_provider_requires_api_key() {
    if std::env::var(weatherdash_core::config::API_KEY_ENV).is_ok() {
        return;
    }

    let err = OpenWeatherProvider::from_config(&Config::default()).unwrap_err();
    assert!(err.to_string().contains("API key is missing"));
}
