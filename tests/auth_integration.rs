//! Password-grant lifecycle against a mock token endpoint

mod common;

use common::{builder_for, config_for, token_url};
use openf1_client::api::{Filters, OpenF1Client, Transport};
use openf1_client::auth::{AuthManager, AuthProvider, PasswordAuthProvider};
use openf1_client::error::{NO_STATUS, OpenF1Error};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_token(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=racer"))
        .respond_with(response)
        .mount(server)
        .await;
}

fn provider(server: &MockServer) -> PasswordAuthProvider {
    let transport = Transport::new(config_for(server)).unwrap();
    PasswordAuthProvider::new("racer", "s3cret", token_url(server), transport).unwrap()
}

#[tokio::test]
async fn test_data_requests_carry_obtained_token() {
    let server = MockServer::start().await;
    mount_token(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok1", "expires_in": 3600})),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/v1/laps"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"lap_number": 1}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = builder_for(&server).credentials("racer", "s3cret").connect().await.unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.config().access_token(), Some("tok1"));

    let laps = client.laps().list(&Filters::new()).await.unwrap();
    assert_eq!(laps.len(), 1);
}

#[tokio::test]
async fn test_failed_eager_authentication_is_swallowed() {
    let server = MockServer::start().await;
    mount_token(&server, ResponseTemplate::new(401).set_body_json(json!({"detail": "bad credentials"}))).await;

    Mock::given(method("GET"))
        .and(path("/v1/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut client = builder_for(&server).credentials("racer", "s3cret").connect().await.unwrap();
    assert!(!client.is_authenticated());
    assert_eq!(client.config().access_token(), None);

    // Anonymous requests still work
    assert!(client.meetings().list(&Filters::new()).await.unwrap().is_empty());

    // An explicit call surfaces the failure verbatim
    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, OpenF1Error::Auth(_)));
    assert_eq!(err.status_code(), Some(401));
}

#[tokio::test]
async fn test_anonymous_requests_have_no_authorization_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/sessions"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = OpenF1Client::new(config_for(&server)).await.unwrap();
    assert!(client.sessions().list(&Filters::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_token_never_fails() {
    let server = MockServer::start().await;
    mount_token(&server, ResponseTemplate::new(401)).await;

    let mut provider = provider(&server);
    assert_eq!(provider.get_token().await, None);
    assert!(!provider.is_authenticated());
}

#[tokio::test]
async fn test_get_token_caches_until_cleared() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok1", "expires_in": 3600})))
        .expect(2)
        .mount(&server)
        .await;

    let mut provider = provider(&server);
    assert_eq!(provider.get_token().await.as_deref(), Some("tok1"));
    assert_eq!(provider.get_token().await.as_deref(), Some("tok1"));
    assert!(provider.is_authenticated());
    assert_eq!(provider.token_info().and_then(|t| t.expires_in), Some(3600));

    provider.clear();
    assert!(!provider.is_authenticated());
    assert_eq!(provider.get_token().await.as_deref(), Some("tok1"));
}

#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let server = MockServer::start().await;

    // Lifetime inside the safety margin: expired as soon as it is issued
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "short", "expires_in": 30})))
        .expect(2)
        .mount(&server)
        .await;

    let mut provider = provider(&server);
    assert_eq!(provider.get_token().await.as_deref(), Some("short"));
    assert!(!provider.is_authenticated());
    assert_eq!(provider.get_token().await.as_deref(), Some("short"));
}

#[tokio::test]
async fn test_missing_access_token_is_auth_error() {
    let server = MockServer::start().await;
    mount_token(&server, ResponseTemplate::new(200).set_body_json(json!({"token_type": "bearer"}))).await;

    let err = provider(&server).authenticate().await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.status_code(), Some(NO_STATUS));
}

#[tokio::test]
async fn test_non_auth_failures_are_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = builder_for(&server).max_retries(0).build().unwrap();
    let transport = Transport::new(config).unwrap();
    let mut provider = PasswordAuthProvider::new("racer", "s3cret", token_url(&server), transport).unwrap();

    let err = provider.authenticate().await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.status_code(), Some(NO_STATUS));
    assert!(err.to_string().starts_with("Authentication failed: Service unavailable"));
}

#[tokio::test]
async fn test_manager_ensure_authenticated() {
    let server = MockServer::start().await;
    mount_token(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok2"})),
    )
    .await;

    let mut manager = AuthManager::new(provider(&server));
    assert_eq!(manager.ensure_authenticated().await.unwrap(), "tok2");
    assert!(manager.is_authenticated());
}
