//! End-to-end extraction runs against a mock API server

mod common;

use common::*;
use deviation_dl::{Extractor, Message, Target};
use futures::TryStreamExt;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_gallery_run_from_url() {
    let server = start_server("gallery-token").await;
    let config = config_for(&server);
    let api = client(&config).await;

    serve_page(
        &server,
        "gallery/all",
        0,
        listing((1..=10).map(|i| image(i, "painter")).collect(), Some(10)),
    )
    .await;
    serve_page(
        &server,
        "gallery/all",
        10,
        listing(
            vec![
                image(11, "painter"),
                journal(12, "painter", "Studio & Notes"),
            ],
            None,
        ),
    )
    .await;
    serve(
        &server,
        "deviation/content",
        json!({"html": "<p>Notes</p>", "css": null}),
    )
    .await;

    let extractor = Extractor::from_url(api, "https://painter.deviantart.com/gallery/").unwrap();
    let messages: Vec<Message> = extractor.items().try_collect().await.unwrap();

    // Version + one Directory + 12 Url messages
    assert_eq!(messages.len(), 14);
    assert!(matches!(messages[0], Message::Version { version: 1 }));
    assert!(matches!(messages[1], Message::Directory { .. }));

    let Message::Url { target, metadata } = &messages[12] else {
        panic!("expected Url message");
    };
    assert_eq!(
        target,
        &Target::Remote("https://orig.example/f/11/artwork_by_painter-d11.jpg".to_string())
    );
    assert_eq!(metadata.index, 11);

    let Message::Url { target, metadata } = &messages[13] else {
        panic!("expected Url message");
    };
    assert!(target.as_url().starts_with("text://"));
    assert!(target.as_url().contains("<title>Studio &amp; Notes</title>"));
    assert_eq!(metadata.extension.as_deref(), Some("htm"));

    assert_eq!(
        request_count(&server, &format!("{}/gallery/all", API_ROOT)).await,
        2
    );
}

#[tokio::test]
async fn test_messages_serialize_as_tagged_json() {
    let server = start_server("json-token").await;
    let config = config_for(&server);
    let api = client(&config).await;
    serve(&server, "gallery/all", listing(vec![image(3, "painter")], None)).await;

    let extractor = Extractor::from_url(api, "painter.deviantart.com").unwrap();
    let messages: Vec<Message> = extractor.items().try_collect().await.unwrap();
    let value = serde_json::to_value(&messages).unwrap();

    assert_eq!(value[0], json!({"type": "version", "version": 1}));
    assert_eq!(value[1]["type"], json!("directory"));
    assert_eq!(value[1]["metadata"]["author"]["username"], json!("painter"));
    assert_eq!(value[2]["type"], json!("url"));
    assert_eq!(value[2]["target"]["kind"], json!("remote"));
    assert_eq!(value[2]["metadata"]["target"]["filename"], json!("artwork_by_painter-d3.jpg"));
    assert!(value[2]["metadata"].get("stats").is_none());
}

#[tokio::test]
async fn test_token_store_survives_client_restart() {
    let temp_dir = TempDir::new().unwrap();
    let server = start_server("durable-token").await;
    let mut config = config_for(&server);
    config.token_cache.path = Some(temp_dir.path().join("tokens.db"));
    serve(&server, "deviation/DEV-1", image(1, "painter")).await;

    for _ in 0..2 {
        let api = client(&config).await;
        let deviation = api.deviation("DEV-1").await.unwrap();
        assert_eq!(deviation.deviationid, "DEV-1");
    }

    assert_eq!(request_count(&server, "/oauth2/token").await, 1);
}

#[tokio::test]
async fn test_clients_share_token_cache() {
    let server = start_server("shared-token").await;
    let config = config_for(&server);
    let first = client(&config).await;
    let second = deviation_dl::ApiClient::new(&config, first.tokens().clone()).unwrap();
    serve(&server, "deviation/DEV-2", image(2, "painter")).await;

    first.deviation("DEV-2").await.unwrap();
    second.deviation("DEV-2").await.unwrap();

    assert_eq!(request_count(&server, "/oauth2/token").await, 1);
}

#[tokio::test]
async fn test_invalid_reference_is_rejected() {
    let server = start_server("unused").await;
    let api = client(&config_for(&server)).await;

    let result = Extractor::from_url(api, "https://example.org/some/page");
    assert!(matches!(
        result,
        Err(deviation_dl::Error::InvalidReference(_))
    ));
}
