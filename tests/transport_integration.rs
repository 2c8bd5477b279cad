//! Transport behavior against a mock server: filter encoding on the wire,
//! status-to-error mapping, retries and transport failures

mod common;

use common::{builder_for, config_for};
use openf1_client::api::{FetchResult, FilterBuilder, Filters, ResponseFormat, Transport};
use openf1_client::error::{OpenF1Error, ResponseBody};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn transport(server: &MockServer) -> Transport {
    Transport::new(config_for(server)).unwrap()
}

#[tokio::test]
async fn test_filters_are_encoded_as_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/car_data"))
        .and(query_param("session_key", "9161"))
        .and(query_param("speed>=", "315"))
        .and(query_param("date>", "2023-09-16T13:03:35"))
        .and(query_param("date<", "2023-09-16T13:08:00"))
        .and(query_param_is_missing("driver_number"))
        .and(query_param_is_missing("csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"speed": 320}])))
        .expect(1)
        .mount(&server)
        .await;

    let filters = FilterBuilder::new()
        .eq("session_key", 9161)
        .gte("speed", 315)
        .between("date", "2023-09-16T13:03:35", "2023-09-16T13:08:00", false)
        .set("driver_number", None::<i32>)
        .build();

    let records = transport(&server).await.fetch_json("car_data", &filters).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("speed"), Some(&json!(320)));
}

#[tokio::test]
async fn test_reserved_characters_survive_query_encoding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/meetings"))
        .and(query_param("meeting_name", "Bahrain & Saudi? 50%"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let filters = Filters::new().with("meeting_name", "Bahrain & Saudi? 50%");
    let records = transport(&server).await.fetch_json("meetings", &filters).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_user_agent_and_static_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/drivers"))
        .and(header("user-agent", "test-agent"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = builder_for(&server)
        .user_agent("test-agent")
        .header("X-Trace", "abc")
        .build()
        .unwrap();
    let records = Transport::new(config)
        .unwrap()
        .fetch_json("drivers", &Filters::new())
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_malformed_json_body_is_validation_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/laps"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .fetch_json("laps", &Filters::new())
        .await
        .unwrap_err();

    assert!(!err.is_transport());
    match err {
        OpenF1Error::Validation { message, value, .. } => {
            assert!(message.starts_with("Invalid JSON in response from"));
            assert_eq!(value, Some(json!("<html>maintenance</html>")));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_csv_format_adds_parameter_and_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/laps"))
        .and(query_param("csv", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("lap_number,lap_duration\n1,95.2\n"))
        .mount(&server)
        .await;

    let transport = transport(&server).await;
    let result = transport
        .fetch("laps", &Filters::new(), Some(ResponseFormat::Csv))
        .await
        .unwrap();
    assert_eq!(result, FetchResult::Csv("lap_number,lap_duration\n1,95.2\n".to_string()));

    let text = transport.fetch_csv("laps", &Filters::new()).await.unwrap();
    assert!(text.starts_with("lap_number"));
}

#[tokio::test]
async fn test_default_format_comes_from_config() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/weather"))
        .and(query_param("csv", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string("air_temperature\n24.1\n"))
        .mount(&server)
        .await;

    let config = builder_for(&server).default_format(ResponseFormat::Csv).build().unwrap();
    let transport = Transport::new(config).unwrap();

    let result = transport.fetch("weather", &Filters::new(), None).await.unwrap();
    assert!(matches!(result, FetchResult::Csv(_)));
}

#[tokio::test]
async fn test_status_mapping_end_to_end() {
    let server = MockServer::start().await;

    for (status, endpoint) in [(401, "a"), (403, "b"), (404, "c"), (400, "d"), (422, "e"), (500, "f")] {
        Mock::given(method("GET"))
            .and(path(format!("/v1/{}", endpoint)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }

    let config = builder_for(&server).max_retries(0).build().unwrap();
    let transport = Transport::new(config).unwrap();
    let fetch = |endpoint: &'static str| {
        let transport = transport.clone();
        async move { transport.fetch_json(endpoint, &Filters::new()).await.unwrap_err() }
    };

    assert!(matches!(fetch("a").await, OpenF1Error::Auth(_)));
    assert!(matches!(fetch("b").await, OpenF1Error::Auth(_)));
    assert!(matches!(fetch("c").await, OpenF1Error::NotFound(_)));
    assert!(matches!(fetch("d").await, OpenF1Error::Api(_)));
    assert!(matches!(fetch("e").await, OpenF1Error::Api(_)));
    assert!(matches!(fetch("f").await, OpenF1Error::Server(_)));
}

#[tokio::test]
async fn test_not_found_carries_url_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/laps"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "No results found."})))
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .fetch_json("laps", &Filters::new().with("session_key", 1))
        .await
        .unwrap_err();

    let api = err.api_error().expect("api payload");
    assert_eq!(api.status_code, 404);
    assert_eq!(api.message, "Resource not found");
    assert!(api.request_url.as_deref().is_some_and(|u| u.ends_with("/v1/laps")));
    assert_eq!(
        api.response_body,
        Some(ResponseBody::Json(json!({"detail": "No results found."})))
    );
}

#[tokio::test]
async fn test_rate_limit_surfaces_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/position"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "60"))
        .expect(1)
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .fetch_json("position", &Filters::new())
        .await
        .unwrap_err();

    match err {
        OpenF1Error::RateLimit { retry_after, error } => {
            assert_eq!(retry_after, Some(60));
            assert_eq!(error.status_code, 429);
        }
        other => panic!("expected rate limit error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retryable_status_is_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/stints"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/stints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"compound": "SOFT"}])))
        .expect(1)
        .mount(&server)
        .await;

    let records = transport(&server).await.fetch_json("stints", &Filters::new()).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_retries_exhausted_surface_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/pit"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let config = builder_for(&server).max_retries(2).build().unwrap();
    let err = Transport::new(config)
        .unwrap()
        .fetch_json("pit", &Filters::new())
        .await
        .unwrap_err();

    assert!(matches!(err, OpenF1Error::Server(_)));
    assert_eq!(err.status_code(), Some(502));
}

#[tokio::test]
async fn test_non_retryable_status_is_sent_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/drivers"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = transport(&server)
        .await
        .fetch_json("drivers", &Filters::new())
        .await
        .unwrap_err();
    assert!(matches!(err, OpenF1Error::NotFound(_)));
}

#[tokio::test]
async fn test_slow_response_is_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = builder_for(&server)
        .timeout_duration(Duration::from_millis(200))
        .max_retries(0)
        .build()
        .unwrap();
    let err = Transport::new(config)
        .unwrap()
        .fetch_json("location", &Filters::new())
        .await
        .unwrap_err();

    match &err {
        OpenF1Error::Timeout { timeout, .. } => assert_eq!(*timeout, Duration::from_millis(200)),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(err.is_transport());
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let config = openf1_client::api::ClientConfig::builder()
        .base_url("http://127.0.0.1:1/v1")
        .max_retries(0)
        .build()
        .unwrap();

    let err = Transport::new(config)
        .unwrap()
        .fetch_json("laps", &Filters::new())
        .await
        .unwrap_err();

    assert!(matches!(err, OpenF1Error::Transport { .. }));
    assert!(err.to_string().contains("Failed to connect to http://127.0.0.1:1/v1/laps"));
}
