//! Channel status handlers: list and lookup.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ChannelDto;
use crate::app_state::AppState;
use crate::domain::channel_name::SEPARATOR;
use crate::error::{ErrorResponse, RelayError};

/// `GET /channels`: List every registered channel, sorted by name.
#[utoipa::path(
    get,
    path = "/api/v1/channels",
    tag = "Channels",
    summary = "List channels",
    description = "Returns every registered channel with its member count and queue depth, sorted by name.",
    responses(
        (status = 200, description = "Channel list", body = Vec<ChannelDto>),
    )
)]
pub async fn list_channels(State(state): State<AppState>) -> impl IntoResponse {
    let channels: Vec<ChannelDto> = state
        .registry
        .summaries()
        .await
        .into_iter()
        .map(ChannelDto::from)
        .collect();
    (StatusCode::OK, Json(channels))
}

/// `GET /channels/{name}`: Status of the channel a path resolves to.
///
/// The name is resolved the same way WebSocket request paths are, so
/// `/api/v1/channels/chat/room` reports the channel `/chat/` serves.
///
/// # Errors
///
/// Returns [`RelayError::ChannelNotFound`] if no channel matches.
#[utoipa::path(
    get,
    path = "/api/v1/channels/{name}",
    tag = "Channels",
    summary = "Get channel",
    description = "Resolves the path to a channel and returns its status.",
    params(("name" = String, Path, description = "Channel path without the leading slash")),
    responses(
        (status = 200, description = "Channel status", body = ChannelDto),
        (status = 404, description = "No channel matches", body = ErrorResponse),
    )
)]
pub async fn get_channel(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, RelayError> {
    let path = format!("{SEPARATOR}{}", name.trim_start_matches(SEPARATOR));
    let summary = match state.registry.resolve(&path).await {
        Some(channel) => state.registry.summary(&channel).await,
        None => None,
    }
    .ok_or(RelayError::ChannelNotFound(path))?;
    Ok((StatusCode::OK, Json(ChannelDto::from(summary))))
}

/// Channel routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/channels", get(list_channels))
        .route("/channels/{*name}", get(get_channel))
}
