mod common;

use common::adapter;
use ezchef_core::ports::{keys, ApiRequest, ClientError, HttpService, SessionStorage};
use ezchef_lib::adapters::{HttpAdapter, MemoryStorage};
use ezchef_lib::config::Config;
use reqwest::Url;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn json_error_message_is_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recipes/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })))
        .mount(&server)
        .await;

    let http = adapter(&server, Arc::new(MemoryStorage::new()));
    let err = http.send(ApiRequest::get("/api/recipes/99")).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Not found");
}

#[tokio::test]
async fn non_json_error_still_yields_a_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let http = adapter(&server, Arc::new(MemoryStorage::new()));
    let err = http.send(ApiRequest::get("/api/categories/")).await.unwrap_err();

    match err {
        ClientError::Request { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected a request error, got {:?}", other),
    }
}

#[tokio::test]
async fn stored_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/profile/"))
        .and(header("authorization", "Bearer abc123"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    storage.set(keys::AUTH_TOKEN, "abc123").unwrap();
    let http = adapter(&server, storage);

    let body = http.send(ApiRequest::get("/api/user/profile/")).await.unwrap();
    assert_eq!(body, Some(json!({ "ok": true })));
}

#[tokio::test]
async fn unauthenticated_requests_skip_the_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({ "username": "ana" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    storage.set(keys::AUTH_TOKEN, "stale").unwrap();
    let http = adapter(&server, storage);

    let request = ApiRequest::post("/api/auth/login/")
        .without_auth()
        .json(json!({ "username": "ana" }));
    assert_eq!(http.send(request).await.unwrap(), None);
}

#[tokio::test]
async fn empty_query_values_are_left_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recipes"))
        .and(query_param("category", "Dinner"))
        .and(query_param_is_missing("search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let http = adapter(&server, Arc::new(MemoryStorage::new()));
    let request = ApiRequest::get("/api/recipes")
        .query("category", "Dinner")
        .query("search", "   ");
    assert_eq!(http.send(request).await.unwrap(), Some(json!([])));
}

#[tokio::test]
async fn cancelled_request_reports_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recipes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let http = adapter(&server, Arc::new(MemoryStorage::new()));
    let token = CancellationToken::new();
    let request = ApiRequest::get("/api/recipes").with_cancel(Some(token.clone()));

    let pending = tokio::spawn(async move { http.send(request).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();

    let outcome = pending.await.unwrap();
    assert_eq!(outcome, Err(ClientError::Cancelled));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let config = Config::for_api_url(Url::parse("http://127.0.0.1:1").unwrap());
    let http = HttpAdapter::new(&config, Arc::new(MemoryStorage::new())).unwrap();

    let err = http.send(ApiRequest::get("/api/recipes")).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn configured_csrf_token_is_sent_when_no_cookie_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .and(header("x-csrftoken", "from-config"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "created": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = common::config_for(&server);
    config.csrf_token = Some("from-config".to_string());
    let http = HttpAdapter::new(&config, Arc::new(MemoryStorage::new())).unwrap();

    let request = ApiRequest::post("/api/auth/register/").without_auth().with_csrf();
    assert_eq!(http.send(request).await.unwrap(), Some(json!({ "created": true })));
}
