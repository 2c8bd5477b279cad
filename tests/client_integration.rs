//! Typed endpoint operations through the client facade

mod common;

use common::config_for;
use openf1_client::api::models::ClassifiedPosition;
use openf1_client::api::{FetchResult, Filters, OpenF1Client, ResponseFormat};
use openf1_client::error::OpenF1Error;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> OpenF1Client {
    OpenF1Client::new(config_for(server)).await.unwrap()
}

#[tokio::test]
async fn test_list_first_and_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/drivers"))
        .and(query_param("session_key", "latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"driver_number": 1, "name_acronym": "VER", "team_name": "Red Bull Racing"},
            {"driver_number": 11, "name_acronym": "PER", "team_name": "Red Bull Racing"}
        ])))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let filters = Filters::new().with("session_key", "latest");

    let drivers = client.drivers().list(&filters).await.unwrap();
    assert_eq!(drivers.len(), 2);
    assert_eq!(drivers[1].name_acronym.as_deref(), Some("PER"));

    let first = client.drivers().first(&filters).await.unwrap().unwrap();
    assert_eq!(first.driver_number, 1);

    assert_eq!(client.drivers().count(&filters).await.unwrap(), 2);
}

#[tokio::test]
async fn test_schema_mismatch_is_validation_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"session_name": "Race"}])))
        .mount(&server)
        .await;

    let err = client(&server).await.sessions().list(&Filters::new()).await.unwrap_err();
    match err {
        OpenF1Error::Validation { message, field, value } => {
            assert_eq!(message, "Failed to validate Session");
            assert_eq!(field.as_deref(), Some("session_key"));
            assert_eq!(value, Some(json!({"session_name": "Race"})));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_csv_operations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/weather"))
        .and(query_param("csv", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "air_temperature,rainfall,session_key\n24.1,0,9161\n23.8,1,9161\n",
        ))
        .mount(&server)
        .await;

    let client = client(&server).await;
    let filters = Filters::new().with("session_key", 9161);

    let rows = client.weather().list_csv_parsed(&filters).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get("rainfall").map(String::as_str), Some("1"));

    let raw = client
        .weather()
        .list_raw(&filters, Some(ResponseFormat::Csv))
        .await
        .unwrap();
    assert!(matches!(raw, FetchResult::Csv(text) if text.starts_with("air_temperature")));
}

#[tokio::test]
async fn test_fastest_lap_and_lap_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/laps"))
        .and(query_param("lap_number>=", "2"))
        .and(query_param("lap_number<=", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"driver_number": 16, "lap_number": 2, "lap_duration": 93.1},
            {"driver_number": 16, "lap_number": 3, "lap_duration": 92.4}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/laps"))
        .and(query_param("driver_number", "16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"driver_number": 16, "lap_number": 1, "lap_duration": null, "is_pit_out_lap": true},
            {"driver_number": 16, "lap_number": 2, "lap_duration": 93.1},
            {"driver_number": 16, "lap_number": 3, "lap_duration": 92.4}
        ])))
        .mount(&server)
        .await;

    let client = client(&server).await;

    let range = client.laps().lap_range(9161, 16, 2, 3).await.unwrap();
    assert_eq!(range.len(), 2);

    let fastest = client.laps().fastest_lap(9161, Some(16)).await.unwrap().unwrap();
    assert_eq!(fastest.lap_number, Some(3));
}

#[tokio::test]
async fn test_podium_is_sorted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/session_result"))
        .and(query_param("position<=", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"driver_number": 4, "position": 2, "classified_position": 2},
            {"driver_number": 81, "position": 3, "classified_position": "3"},
            {"driver_number": 1, "position": 1, "classified_position": 1, "points": 25}
        ])))
        .mount(&server)
        .await;

    let podium = client(&server).await.session_result().podium("latest").await.unwrap();
    let order: Vec<_> = podium.iter().map(|r| r.driver_number).collect();
    assert_eq!(order, vec![Some(1), Some(4), Some(81)]);
    assert_eq!(podium[0].classified_position, Some(ClassifiedPosition::Number(1)));
}

#[tokio::test]
async fn test_tyre_strategy_in_stint_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/stints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"stint_number": 2, "compound": "HARD"},
            {"stint_number": 1, "compound": "MEDIUM"},
            {"stint_number": 3, "compound": null}
        ])))
        .mount(&server)
        .await;

    let strategy = client(&server).await.stints().tyre_strategy(9161, 44).await.unwrap();
    assert_eq!(strategy, vec!["MEDIUM".to_string(), "HARD".to_string()]);
}

#[tokio::test]
async fn test_latest_meeting_uses_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/meetings"))
        .and(query_param("meeting_key", "latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"meeting_key": 1219, "meeting_name": "Singapore Grand Prix", "year": 2023}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let meeting = client(&server).await.meetings().latest().await.unwrap().unwrap();
    assert_eq!(meeting.meeting_key, 1219);
    assert_eq!(meeting.year, Some(2023));
}
