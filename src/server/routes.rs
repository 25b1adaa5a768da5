//! HTTP routes
//!
//! The HTTP surface is a single GET endpoint serving the current frame as
//! JPEG, or the placeholder PNG when no live frame is available. Clients
//! poll it with a cache-busting query parameter, which the server accepts
//! and ignores.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::pipeline::{grab_frame, PipelineContext};

/// Path of the frame endpoint
pub const FRAME_PATH: &str = "/video/frame";

/// Build the router for a pipeline context
pub fn create_router(ctx: Arc<PipelineContext>) -> Router {
    Router::new()
        .route(FRAME_PATH, get(serve_frame))
        .with_state(ctx)
}

/// Serve one frame, or the placeholder when none is available
async fn serve_frame(
    State(ctx): State<Arc<PipelineContext>>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    // Cache-busting query from pollers, unused server-side
    let _ = query;
    let image = grab_frame(&ctx).await;
    ([(header::CONTENT_TYPE, image.media_type)], image.data)
}
