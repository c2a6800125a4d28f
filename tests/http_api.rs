//! Status endpoints served alongside the relay.

#![allow(clippy::panic)]

mod common;

use common::TestServer;
use serde_json::Value;

async fn get_json(url: String) -> (u16, Value) {
    let response = match reqwest::get(&url).await {
        Ok(response) => response,
        Err(err) => panic!("GET {url}: {err}"),
    };
    let status = response.status().as_u16();
    let Ok(body) = response.json::<Value>().await else {
        panic!("GET {url}: body is not json");
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_channel_count() {
    let server = TestServer::spawn("/chat/\n/news/\n").await;
    let (status, body) = get_json(server.http_url("/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["channels"], 2);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn channel_list_shows_members() {
    let server = TestServer::spawn("/news/\n/chat/\n").await;
    let _client = server.connect("/chat/").await;
    server.wait_for_members("/chat/", 1).await;

    let (status, body) = get_json(server.http_url("/api/v1/channels")).await;
    assert_eq!(status, 200);
    assert_eq!(body[0]["name"], "/chat/");
    assert_eq!(body[0]["members"], 1);
    assert_eq!(body[1]["name"], "/news/");
    assert_eq!(body[1]["members"], 0);
}

#[tokio::test]
async fn channel_lookup_and_not_found() {
    let server = TestServer::spawn("/chat/\n").await;

    let (status, body) = get_json(server.http_url("/api/v1/channels/chat")).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "/chat/");

    let (status, body) = get_json(server.http_url("/api/v1/channels/nope")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn plain_http_on_unknown_path_is_404() {
    let server = TestServer::spawn("/chat/\n").await;
    let (status, body) = get_json(server.http_url("/missing/")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn plain_http_on_channel_path_is_not_upgraded() {
    let server = TestServer::spawn("/chat/\n").await;
    let response = match reqwest::get(server.http_url("/chat/")).await {
        Ok(response) => response,
        Err(err) => panic!("GET /chat/: {err}"),
    };
    assert!(response.status().is_client_error());
    assert_ne!(response.status().as_u16(), 404);
    assert_eq!(server.state.registry.len().await, 1);
}

#[cfg(feature = "swagger-ui")]
#[tokio::test]
async fn openapi_document_is_served() {
    let server = TestServer::spawn("/chat/\n").await;
    let (status, body) = get_json(server.http_url("/api-docs/openapi.json")).await;
    assert_eq!(status, 200);
    assert!(body["paths"]["/api/v1/channels"].is_object());
}
