//! Shared harness: boots a relay on an ephemeral port.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use channel_relay::app_state::AppState;
use channel_relay::config::{RelayConfig, parse_channels};
use channel_relay::domain::ChannelName;
use channel_relay::server;
use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
}

impl TestServer {
    /// Starts a relay serving the channels listed in `channels`.
    pub async fn spawn(channels: &str) -> Self {
        let specs = match parse_channels(channels) {
            Ok(specs) => specs,
            Err(err) => panic!("channel list: {err}"),
        };
        let config = RelayConfig {
            write_timeout: Duration::from_millis(500),
            ..RelayConfig::default()
        };
        let Ok(state) = AppState::bootstrap(&config, &specs).await else {
            panic!("bootstrap failed");
        };
        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("bind failed");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("local addr");
        };
        tokio::spawn(server::serve(
            listener,
            state.clone(),
            std::future::pending(),
        ));
        Self { addr, state }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{path}", self.addr)
    }

    /// Connects a WebSocket client to `path`.
    pub async fn connect(&self, path: &str) -> Client {
        match connect_async(self.ws_url(path)).await {
            Ok((ws, _)) => ws,
            Err(err) => panic!("connect {path}: {err}"),
        }
    }

    /// Waits until `channel` has exactly `expected` members.
    pub async fn wait_for_members(&self, channel: &str, expected: usize) {
        let Ok(name) = ChannelName::new(channel) else {
            panic!("valid name");
        };
        let poll = async {
            while self.state.registry.member_count(&name).await != Some(expected) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };
        if tokio::time::timeout(RECV_TIMEOUT, poll).await.is_err() {
            panic!("{channel} never reached {expected} members");
        }
    }
}

/// Receives the next data frame, skipping pings and pongs.
pub async fn next_message(ws: &mut Client) -> Message {
    loop {
        match tokio::time::timeout(RECV_TIMEOUT, ws.next()).await {
            Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => continue,
            Ok(Some(Ok(message))) => return message,
            Ok(Some(Err(err))) => panic!("receive failed: {err}"),
            Ok(None) => panic!("stream ended"),
            Err(_) => panic!("timed out waiting for a message"),
        }
    }
}

/// Receives the next frame and asserts it is text.
pub async fn next_text(ws: &mut Client) -> String {
    match next_message(ws).await {
        Message::Text(text) => text.as_str().to_owned(),
        other => panic!("expected text, got {other:?}"),
    }
}

/// Asserts nothing arrives on `ws` within `wait`.
pub async fn assert_silent(ws: &mut Client, wait: Duration) {
    if let Ok(Some(Ok(message))) = tokio::time::timeout(wait, ws.next()).await {
        panic!("unexpected message: {message:?}");
    }
}
