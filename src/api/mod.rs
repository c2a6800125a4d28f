//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Channel endpoints are mounted under `/api/v1`; `/health` sits at the
//! root. Both prefixes shadow channels of the same name.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "channel-relay",
        description = "Status endpoints for the multi-channel WebSocket relay."
    ),
    paths(
        handlers::system::health_handler,
        handlers::channel::list_channels,
        handlers::channel::get_channel,
    ),
    components(schemas(
        handlers::system::HealthResponse,
        dto::ChannelDto,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "System", description = "Service health"),
        (name = "Channels", description = "Channel membership and queue status"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}
