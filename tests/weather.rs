mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{app_with_config, app_with_dead_backend, config_with, get};

fn weather_app(server: &MockServer, weatherbit_key: Option<&str>) -> axum::Router {
    let tomorrow = format!("{}/tomorrow", server.uri());
    let weatherbit = format!("{}/weatherbit", server.uri());
    let mut vars = vec![
        ("TOMORROW_IO_API_KEY", "tomorrow-key"),
        ("TOMORROW_IO_URL", tomorrow.as_str()),
        ("WEATHERBIT_URL", weatherbit.as_str()),
        ("WEATHER_RETRY_DELAY_MS", "1"),
    ];
    if let Some(key) = weatherbit_key {
        vars.push(("WEATHERBIT_API_KEY", key));
    }
    app_with_config(config_with(&vars))
}

#[tokio::test]
async fn coordinates_are_required() {
    for uri in [
        "/api/weather/realtime?lat=36.01",
        "/api/weather/forecast?lon=-5.6",
        "/api/weather/realtime?lat=&lon=-5.6",
    ] {
        let response = get(app_with_dead_backend(), uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            response.json(),
            json!({"error": "Both 'lat' and 'lon' parameters are required"})
        );
    }
}

#[tokio::test]
async fn realtime_is_relayed_from_tomorrow() {
    let server = MockServer::start().await;
    let body = json!({"data": {"time": "2025-02-03T10:00:00Z", "values": {"windSpeed": 8.4}}});
    Mock::given(method("GET"))
        .and(path("/tomorrow/weather/realtime"))
        .and(query_param("location", "36.01,-5.6"))
        .and(query_param("apikey", "tomorrow-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let response = get(
        weather_app(&server, None),
        "/api/weather/realtime?lat=36.01&lon=-5.6",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), body);
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tomorrow/weather/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tomorrow/weather/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"timelines": {"hourly": []}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = get(
        weather_app(&server, None),
        "/api/weather/forecast?lat=36.01&lon=-5.6",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"timelines": {"hourly": []}}));
}

#[tokio::test]
async fn retries_give_up_after_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tomorrow/weather/realtime"))
        .respond_with(ResponseTemplate::new(502))
        .expect(4)
        .mount(&server)
        .await;

    let response = get(
        weather_app(&server, None),
        "/api/weather/realtime?lat=36.01&lon=-5.6",
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"error": "Failed to fetch realtime weather data"})
    );
}

#[tokio::test]
async fn rate_limit_falls_back_to_weatherbit_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tomorrow/weather/realtime"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weatherbit/current"))
        .and(query_param("lat", "36.01"))
        .and(query_param("lon", "-5.6"))
        .and(query_param("key", "weatherbit-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"temp": 22.0, "wind_spd": 11.3, "wind_dir": 80, "rh": 55}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = get(
        weather_app(&server, Some("weatherbit-key")),
        "/api/weather/realtime?lat=36.01&lon=-5.6",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["_meta"]["source"], "weatherbit");
    assert_eq!(body["data"]["values"]["windSpeed"], 11.3);
    assert_eq!(body["data"]["values"]["humidity"], 55);
    assert!(body["data"]["time"].is_string());
}

#[tokio::test]
async fn forecast_fallback_requests_120_hours() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tomorrow/weather/forecast"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weatherbit/forecast/hourly"))
        .and(query_param("hours", "120"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"timestamp_local": "2025-02-03T10:00:00", "temp": 18, "wind_spd": 7.5}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = get(
        weather_app(&server, Some("weatherbit-key")),
        "/api/weather/forecast?lat=36.01&lon=-5.6",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({
            "timelines": {"hourly": [
                {"time": "2025-02-03T10:00:00", "values": {"temperature": 18, "windSpeed": 7.5}}
            ]},
            "_meta": {"source": "weatherbit"}
        })
    );
}

#[tokio::test]
async fn rate_limit_without_weatherbit_key_is_500() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tomorrow/weather/forecast"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let response = get(
        weather_app(&server, None),
        "/api/weather/forecast?lat=36.01&lon=-5.6",
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"error": "Failed to fetch forecast weather data"})
    );
}

#[tokio::test]
async fn missing_tomorrow_key_fails_without_requests() {
    let response = get(
        app_with_dead_backend(),
        "/api/weather/realtime?lat=36.01&lon=-5.6",
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
