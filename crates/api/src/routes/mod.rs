//! Route tree assembly.

pub mod delimitation;
pub mod health;
pub mod overlay;
pub mod placement;
pub mod resolve;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /product-images/{image_id}/delimitations          list, create
///
/// /delimitations/{id}                               get, update (PATCH), delete
/// /delimitations/{id}/migrate                       one-way percentage migration (POST)
/// /delimitations/stats                              migration rollout stats (GET)
/// /delimitations/convert/to-percentage              stateless conversion (POST)
/// /delimitations/convert/to-pixel                   stateless conversion (POST)
///
/// /products/{vendor_product_id}/delimitations/migrate   batch migration (POST)
///
/// /vendor-products/{vp_id}/positions                formatted placements (GET)
/// /vendor-products/{vp_id}/designs/{id}/position    get, save (PUT, upsert)
///
/// /overlay/rect                                     project onto rendered box (POST)
/// /overlay/center                                   center-anchored projection (POST)
///
/// /resolve/vendor-product                           id resolution utility (POST)
/// /resolve/vendor-design                            id resolution utility (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/product-images", delimitation::image_router())
        .nest("/delimitations", delimitation::router())
        .nest("/products", delimitation::product_router())
        .nest("/vendor-products", placement::router())
        .nest("/overlay", overlay::router())
        .nest("/resolve", resolve::router())
}
