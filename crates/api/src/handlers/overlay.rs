//! Stateless projection of delimitations onto rendered image elements.

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use stampd_core::geometry::{Rect, Size};
use stampd_core::overlay::{compute_overlay_center, compute_overlay_rect, BoundingBox};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

/// A delimitation in its image's natural frame plus the rendered element's
/// viewport bounding box.
#[derive(Debug, Deserialize)]
pub struct OverlayRequest {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub reference_width: f64,
    pub reference_height: f64,
    pub bounding_box: BoundingBox,
}

impl OverlayRequest {
    fn region(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    fn reference(&self) -> Size {
        Size {
            width: self.reference_width,
            height: self.reference_height,
        }
    }
}

/// POST /overlay/rect
pub async fn overlay_rect(Json(input): Json<OverlayRequest>) -> AppResult<impl IntoResponse> {
    let rect = compute_overlay_rect(&input.region(), input.reference(), &input.bounding_box)
        .map_err(AppError::Core)?;
    Ok(Json(DataResponse { data: rect }))
}

/// POST /overlay/center
pub async fn overlay_center(Json(input): Json<OverlayRequest>) -> AppResult<impl IntoResponse> {
    let center = compute_overlay_center(&input.region(), input.reference(), &input.bounding_box)
        .map_err(AppError::Core)?;
    Ok(Json(DataResponse { data: center }))
}
