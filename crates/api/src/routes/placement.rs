//! Route definitions for design positions on vendor products.

use axum::routing::get;
use axum::Router;

use crate::handlers::placement;
use crate::state::AppState;

/// Routes mounted at `/vendor-products`.
///
/// ```text
/// GET    /{vendor_product_id}/positions                      list_positions
/// GET    /{vendor_product_id}/designs/{design_id}/position   get_position
/// PUT    /{vendor_product_id}/designs/{design_id}/position   save_position (upsert)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{vendor_product_id}/positions",
            get(placement::list_positions),
        )
        .route(
            "/{vendor_product_id}/designs/{design_id}/position",
            get(placement::get_position).put(placement::save_position),
        )
}
