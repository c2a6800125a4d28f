//! WebSocket connection binding.
//!
//! Splits an upgraded socket into its two halves: the sink becomes a
//! [`WsMember`] that the fan-out pump writes to, and the stream feeds the
//! connection's [`Session`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::future;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, watch};

use crate::app_state::AppState;
use crate::domain::{ChannelName, Member, Payload};
use crate::error::RelayError;
use crate::relay::Session;

/// Upper bound on the close handshake, so closing a stalled peer never
/// hangs the caller.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Write half of a WebSocket, registered as a channel member.
pub struct WsMember {
    sink: Mutex<SplitSink<WebSocket, Message>>,
    closed: watch::Sender<bool>,
}

impl WsMember {
    /// Wraps the sink half of a split socket.
    #[must_use]
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sink: Mutex::new(sink),
            closed: watch::Sender::new(false),
        }
    }

    fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

impl fmt::Debug for WsMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsMember")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Member for WsMember {
    async fn send(&self, payload: Payload) -> Result<(), RelayError> {
        if self.is_closed() {
            return Err(RelayError::PeerClosed);
        }
        let message = match payload {
            Payload::Text(text) => Message::Text(text),
            Payload::Binary(data) => Message::Binary(data),
        };
        self.sink
            .lock()
            .await
            .send(message)
            .await
            .map_err(|err| RelayError::Transport(err.to_string()))
    }

    async fn close(&self) {
        if self.closed.send_replace(true) {
            return;
        }
        let handshake = async {
            let mut sink = self.sink.lock().await;
            let _ = sink.send(Message::Close(None)).await;
            let _ = sink.close().await;
        };
        if tokio::time::timeout(CLOSE_TIMEOUT, handshake).await.is_err() {
            tracing::debug!("close handshake timed out");
        }
    }

    async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

/// Maps one inbound WebSocket frame to a relay payload.
///
/// Control frames are skipped; a close frame ends the session.
fn inbound_payload(message: Result<Message, axum::Error>) -> Option<Result<Payload, RelayError>> {
    match message {
        Ok(Message::Text(text)) => Some(Ok(Payload::Text(text))),
        Ok(Message::Binary(data)) => Some(Ok(Payload::Binary(data))),
        Ok(Message::Ping(_) | Message::Pong(_)) => None,
        Ok(Message::Close(_)) => Some(Err(RelayError::PeerClosed)),
        Err(err) => Some(Err(RelayError::Transport(err.to_string()))),
    }
}

/// Runs one upgraded connection on `channel` until it closes.
pub async fn run_connection(socket: WebSocket, channel: ChannelName, state: AppState) {
    let (sink, stream) = socket.split();
    let member: Arc<dyn Member> = Arc::new(WsMember::new(sink));
    let mut session = Session::new(Arc::clone(&state.registry), state.audit, channel, member);

    let inbound = stream.filter_map(|message| future::ready(inbound_payload(message)));
    let reason = session.run(inbound).await;

    tracing::debug!(
        channel = %session.channel(),
        conn_id = %session.id(),
        reason = ?reason,
        "ws connection closed"
    );
}
