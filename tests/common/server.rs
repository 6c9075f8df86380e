//! Mock API server setup

use deviation_dl::{ApiClient, Config};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API root path on the mock server
pub const API_ROOT: &str = "/api/v1/oauth2";

/// Configuration pointing at `server` with a fast backoff and no token store
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.token_cache.path = None;
    config.api.api_root = format!("{}{}", server.uri(), API_ROOT);
    config.api.token_url = format!("{}/oauth2/token", server.uri());
    config.retry.backoff_step = Duration::from_millis(1);
    config
}

/// Start a server whose token endpoint hands out `token`
pub async fn start_server(token: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": token})),
        )
        .mount(&server)
        .await;
    server
}

/// Build a shared client for `config`
pub async fn client(config: &Config) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::from_config(config)
            .await
            .expect("failed to build client"),
    )
}

/// Serve `body` for GET requests to an API endpoint
pub async fn serve(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}/{}", API_ROOT, endpoint)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve `body` for GET requests to an API endpoint at one listing offset
pub async fn serve_page(server: &MockServer, endpoint: &str, offset: u64, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{}/{}", API_ROOT, endpoint)))
        .and(query_param("offset", offset.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Number of requests the server received for a path
pub async fn request_count(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}
