//! HTTP server composition.
//!
//! REST and health routes are matched first. Every other path falls
//! through to the WebSocket handler, which resolves it to a channel.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::error::RelayError;
use crate::ws::handler::ws_handler;

/// Builds the full application router over `state`.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new().merge(api::build_router());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    router
        .fallback(ws_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `state` on `listener` until `shutdown` completes.
///
/// # Errors
///
/// Returns [`RelayError::Io`] if the accept loop fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), RelayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("server stopped");
    Ok(())
}
