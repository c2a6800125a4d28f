//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::error::RelayError;

/// `GET /<channel>`: Upgrade to a WebSocket subscribed to `<channel>`.
///
/// Mounted as the router fallback so any path can address a channel. The
/// path is resolved before the upgrade; a path that matches no channel is
/// rejected with `404` and never admitted.
///
/// # Errors
///
/// Returns [`RelayError::Unroutable`] if no registered channel matches the
/// request path.
pub async fn ws_handler(
    State(state): State<AppState>,
    uri: Uri,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, RelayError> {
    let path = uri.path();
    let Some(channel) = state.registry.resolve(path).await else {
        tracing::info!(path, "unrouted request");
        return Err(RelayError::Unroutable(path.to_string()));
    };

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            tracing::debug!(path, channel = %channel, "not a websocket request");
            return Ok(rejection.into_response());
        }
    };

    tracing::debug!(path, channel = %channel, "upgrading connection");
    let failed_channel = channel.clone();
    Ok(upgrade
        .on_failed_upgrade(move |err| {
            tracing::warn!(channel = %failed_channel, error = %err, "websocket upgrade failed");
        })
        .on_upgrade(move |socket| run_connection(socket, channel, state)))
}
