//! Route definitions for stateless overlay projection.

use axum::routing::post;
use axum::Router;

use crate::handlers::overlay;
use crate::state::AppState;

/// Routes mounted at `/overlay`.
///
/// ```text
/// POST   /rect      overlay_rect
/// POST   /center    overlay_center
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rect", post(overlay::overlay_rect))
        .route("/center", post(overlay::overlay_center))
}
