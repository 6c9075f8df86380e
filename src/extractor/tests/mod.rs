use super::*;
use crate::error::Error;
use crate::test_helpers::*;
use crate::types::{Author, Target};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};


async fn mount_json(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(api_path(endpoint)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn extractor(source: Source) -> (MockServer, Extractor) {
    let (server, client) = mock_api().await;
    (server, Extractor::new(Arc::new(client), source))
}

async fn collect(extractor: &Extractor) -> Result<Vec<Message>> {
    extractor.items().try_collect().await
}

fn gallery(username: &str) -> Source {
    Source::Gallery {
        username: username.to_string(),
    }
}

fn directory_authors(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Directory { metadata } => {
                Some(metadata.author.clone().unwrap_or_default().username)
            }
            _ => None,
        })
        .collect()
}

fn url_targets(messages: &[Message]) -> Vec<&Target> {
    messages
        .iter()
        .filter_map(|m| match m {
            Message::Url { target, .. } => Some(target),
            _ => None,
        })
        .collect()
}
