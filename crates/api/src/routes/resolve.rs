//! Route definitions for stateless identifier resolution.

use axum::routing::post;
use axum::Router;

use crate::handlers::resolve;
use crate::state::AppState;

/// Routes mounted at `/resolve`.
///
/// ```text
/// POST   /vendor-product    resolve_product
/// POST   /vendor-design     resolve_design
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vendor-product", post(resolve::resolve_product))
        .route("/vendor-design", post(resolve::resolve_design))
}
