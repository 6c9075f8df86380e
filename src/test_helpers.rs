//! Shared helpers for unit tests that talk to a mock API server.

#![allow(clippy::expect_used)]

use crate::api::ApiClient;
use crate::config::Config;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Token handed out by the mock token endpoint
pub(crate) const TEST_TOKEN: &str = "test-token";

/// Path of an API endpoint on the mock server
pub(crate) fn api_path(endpoint: &str) -> String {
    format!("/api/v1/oauth2/{}", endpoint)
}

/// Configuration pointing at the mock server, with a 1ms backoff step
/// and an in-memory token cache
pub(crate) fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.token_cache.path = None;
    config.api.api_root = format!("{}/api/v1/oauth2", server.uri());
    config.api.token_url = format!("{}/oauth2/token", server.uri());
    config.retry.backoff_step = Duration::from_millis(1);
    config
}

/// Mount a token endpoint that always succeeds
pub(crate) async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": TEST_TOKEN, "expires_in": 3600})),
        )
        .mount(server)
        .await;
}

/// Start a mock server with a working token endpoint and a client for it
pub(crate) async fn mock_api() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    let client = ApiClient::from_config(&test_config(&server))
        .await
        .expect("failed to build test client");
    (server, client)
}

/// Requests the mock server received for one path
pub(crate) async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .collect()
}

/// Value of a query parameter of a received request
pub(crate) fn query_value(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Minimal image deviation by `username`
pub(crate) fn image_deviation(id: &str, username: &str) -> Value {
    json!({
        "deviationid": id,
        "url": format!("https://{username}.deviantart.com/art/Piece-{id}"),
        "title": format!("Piece {id}"),
        "author": {
            "username": username,
            "userid": format!("uid-{username}"),
            "usericon": "https://a.deviantart.net/avatars/default.gif",
            "type": "regular"
        },
        "content": {
            "src": format!("https://img.example/{username}/piece_{id}.png"),
            "width": 800,
            "height": 600,
            "filesize": 1234
        },
        "stats": {"comments": 1, "favourites": 2},
        "preview": {"src": "https://img.example/preview.jpg"},
        "thumbs": [{"src": "https://img.example/thumb.jpg"}]
    })
}

/// One listing page in the API's pagination format
pub(crate) fn page(results: Vec<Value>, has_more: bool, next_offset: Option<u64>) -> Value {
    json!({
        "results": results,
        "has_more": has_more,
        "next_offset": next_offset
    })
}
