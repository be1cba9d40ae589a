//! Route definitions for delimitations and their migration endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::delimitation;
use crate::state::AppState;

/// Routes mounted at `/product-images`.
///
/// ```text
/// GET    /{image_id}/delimitations    list_delimitations
/// POST   /{image_id}/delimitations    create_delimitation
/// ```
pub fn image_router() -> Router<AppState> {
    Router::new().route(
        "/{image_id}/delimitations",
        get(delimitation::list_delimitations).post(delimitation::create_delimitation),
    )
}

/// Routes mounted at `/delimitations`.
///
/// ```text
/// GET    /stats                    delimitation_stats
/// POST   /convert/to-percentage    convert_to_percentage
/// POST   /convert/to-pixel         convert_to_pixel
/// GET    /{id}                     get_delimitation
/// PATCH  /{id}                     update_delimitation
/// DELETE /{id}                     delete_delimitation
/// POST   /{id}/migrate             migrate_delimitation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(delimitation::delimitation_stats))
        .route(
            "/convert/to-percentage",
            post(delimitation::convert_to_percentage),
        )
        .route("/convert/to-pixel", post(delimitation::convert_to_pixel))
        .route(
            "/{id}",
            get(delimitation::get_delimitation)
                .patch(delimitation::update_delimitation)
                .delete(delimitation::delete_delimitation),
        )
        .route("/{id}/migrate", post(delimitation::migrate_delimitation))
}

/// Routes mounted at `/products`.
///
/// ```text
/// POST   /{vendor_product_id}/delimitations/migrate    migrate_product_delimitations
/// ```
pub fn product_router() -> Router<AppState> {
    Router::new().route(
        "/{vendor_product_id}/delimitations/migrate",
        post(delimitation::migrate_product_delimitations),
    )
}
