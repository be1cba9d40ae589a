//! Product image entity model.
//!
//! Images are written by the external upload/CDN collaborator; this core only
//! reads them for their natural dimensions, which gate every pixel-based
//! operation on the delimitations they own.

use serde::Serialize;
use sqlx::FromRow;
use stampd_core::geometry::Size;
use stampd_core::types::{DbId, Timestamp};

/// A row from the `product_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductImage {
    pub id: DbId,
    pub color_variation_id: DbId,
    pub url: String,
    pub natural_width: Option<f64>,
    pub natural_height: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProductImage {
    /// The image's natural size, when both dimensions are recorded.
    pub fn natural_size(&self) -> Option<Size> {
        match (self.natural_width, self.natural_height) {
            (Some(width), Some(height)) => Some(Size { width, height }),
            _ => None,
        }
    }
}
