//! Integration tests for the lookup pipeline against a mock HTTP server.

use std::net::TcpListener;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wxlookup_core::{
    Condition, Config, Endpoints, HourFallback, LocationQuery, LookupError, OpenMeteoLookup,
    WeatherLookup, WeatherSnapshot,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, 2)
        .and_then(|d| d.and_hms_opt(13, 20, 0))
        .expect("valid datetime")
}

fn lookup(server: &MockServer, fallback: HourFallback) -> OpenMeteoLookup {
    let config = Config {
        endpoints: Endpoints::with_base(&server.uri()),
        hour_fallback: fallback,
        ..Config::default()
    };
    OpenMeteoLookup::new(config).expect("valid config")
}

fn tokyo_geocoding() -> Value {
    json!({
        "results": [
            {"id": 1850147, "name": "Tokyo", "latitude": 35.6895, "longitude": 139.6917, "country": "Japan"},
            {"id": 1, "name": "Tokyo", "latitude": 1.0, "longitude": 2.0, "country": "Elsewhere"}
        ],
        "generationtime_ms": 0.7
    })
}

/// Three hours of data; hour 13:00 sits at index 1.
fn forecast(times: [&str; 3]) -> Value {
    json!({
        "latitude": 35.7,
        "longitude": 139.6875,
        "timezone": "Asia/Singapore",
        "hourly": {
            "time": times,
            "temperature_2m": [18.0, 22.5, 25.1],
            "relative_humidity_2m": [80, 60, 41],
            "weather_code": [0, 2, 63],
            "wind_speed_10m": [3.4, 12.3, 20.0]
        }
    })
}

async fn mount_geocoding(server: &MockServer, name: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", name))
        .and(query_param("count", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "35.6895"))
        .and(query_param("longitude", "139.6917"))
        .and(query_param("timezone", "Asia/Singapore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn tokyo_resolves_to_expected_snapshot() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Tokyo", tokyo_geocoding()).await;
    mount_forecast(&server, forecast(["2024-09-02T12:00", "2024-09-02T13:00", "2024-09-02T14:00"]))
        .await;

    let snapshot = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::from_input("Tokyo"), now())
        .await
        .expect("lookup succeeds");

    assert_eq!(
        snapshot,
        WeatherSnapshot {
            temperature_c: 22.5,
            condition: Condition::Cloudy,
            humidity_pct: 60,
            wind_speed_kmh: 12.3,
            display_location: "Tokyo, Japan".to_string(),
        }
    );
}

#[tokio::test]
async fn selects_matching_hour_across_all_series() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Tokyo", tokyo_geocoding()).await;
    mount_forecast(&server, forecast(["2024-09-02T11:00", "2024-09-02T12:00", "2024-09-02T13:00"]))
        .await;

    let snapshot = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .expect("lookup succeeds");

    assert_eq!(snapshot.temperature_c, 25.1);
    assert_eq!(snapshot.humidity_pct, 41);
    assert_eq!(snapshot.condition, Condition::Rainy);
    assert_eq!(snapshot.wind_speed_kmh, 20.0);
}

#[tokio::test]
async fn missing_hour_falls_back_to_first_entry() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Tokyo", tokyo_geocoding()).await;
    mount_forecast(&server, forecast(["2024-09-03T00:00", "2024-09-03T01:00", "2024-09-03T02:00"]))
        .await;

    let snapshot = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .expect("fallback instead of error");

    assert_eq!(snapshot.temperature_c, 18.0);
    assert_eq!(snapshot.condition, Condition::Clear);
    assert_eq!(snapshot.humidity_pct, 80);
}

#[tokio::test]
async fn missing_hour_fails_under_fail_policy() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Tokyo", tokyo_geocoding()).await;
    mount_forecast(&server, forecast(["2024-09-03T00:00", "2024-09-03T01:00", "2024-09-03T02:00"]))
        .await;

    let err = lookup(&server, HourFallback::Fail)
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::HourNotFound(_)));
}

#[tokio::test]
async fn display_location_without_country() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        "Tokyo",
        json!({"results": [{"name": "Tokyo", "latitude": 35.6895, "longitude": 139.6917}]}),
    )
    .await;
    mount_forecast(&server, forecast(["2024-09-02T12:00", "2024-09-02T13:00", "2024-09-02T14:00"]))
        .await;

    let snapshot = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .expect("lookup succeeds");

    assert_eq!(snapshot.display_location, "Tokyo");
}

#[tokio::test]
async fn empty_geocoding_results_is_location_not_found() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Nowhereville", json!({"results": []})).await;

    let err = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Nowhereville".into()), now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::LocationNotFound(_)));
}

#[tokio::test]
async fn absent_geocoding_results_is_location_not_found() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Atlantis", json!({"generationtime_ms": 0.2})).await;

    let err = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Atlantis".into()), now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::LocationNotFound(_)));
}

#[tokio::test]
async fn geocoding_error_status_is_location_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let err = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::LocationNotFound(_)));
}

#[tokio::test]
async fn multi_word_place_is_sent_as_single_name() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "New York", tokyo_geocoding()).await;
    mount_forecast(&server, forecast(["2024-09-02T12:00", "2024-09-02T13:00", "2024-09-02T14:00"]))
        .await;

    let snapshot = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::from_input("  New   York "), now())
        .await
        .expect("lookup succeeds");

    assert_eq!(snapshot.display_location, "Tokyo, Japan");
}

#[tokio::test]
async fn ip_query_geocodes_the_reported_city() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .and(query_param("fields", "status,message,country,regionName,city,query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "country": "Japan",
            "regionName": "Tokyo",
            "city": "Tokyo",
            "query": "203.0.113.7"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_geocoding(&server, "Tokyo", tokyo_geocoding()).await;
    mount_forecast(&server, forecast(["2024-09-02T12:00", "2024-09-02T13:00", "2024-09-02T14:00"]))
        .await;

    let snapshot = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::FromIp, now())
        .await
        .expect("lookup succeeds");

    assert_eq!(snapshot.display_location, "Tokyo, Japan");
    assert_eq!(snapshot.temperature_c, 22.5);
}

#[tokio::test]
async fn ip_lookup_error_status_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::FromIp, now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Network { stage: "ip location", .. }));
}

#[tokio::test]
async fn ip_lookup_fail_status_is_location_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "fail", "message": "private range"})),
        )
        .mount(&server)
        .await;

    let err = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::FromIp, now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::LocationNotFound(ref msg) if msg.contains("private range")));
}

#[tokio::test]
async fn forecast_error_status_is_network_error() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Tokyo", tokyo_geocoding()).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Network { stage: "forecast", .. }));
    assert!(err.to_string().contains("upstream down"));
}

#[tokio::test]
async fn malformed_forecast_is_parse_error() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Tokyo", tokyo_geocoding()).await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Parse { stage: "forecast", .. }));
}

#[tokio::test]
async fn misaligned_series_is_parse_error() {
    let server = MockServer::start().await;
    mount_geocoding(&server, "Tokyo", tokyo_geocoding()).await;
    mount_forecast(
        &server,
        json!({"hourly": {
            "time": ["2024-09-02T13:00", "2024-09-02T14:00"],
            "temperature_2m": [22.5, 23.0],
            "relative_humidity_2m": [60],
            "weather_code": [2, 2],
            "wind_speed_10m": [12.3, 11.0]
        }}),
    )
    .await;

    let err = lookup(&server, HourFallback::First)
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Parse { .. }));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);

    let config = Config {
        endpoints: Endpoints::with_base(&format!("http://{addr}")),
        ..Config::default()
    };

    let err = OpenMeteoLookup::new(config)
        .expect("valid config")
        .resolve_at(&LocationQuery::Place("Tokyo".into()), now())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Network { stage: "geocoding", .. }));
}
