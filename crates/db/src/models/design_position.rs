//! Design position entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stampd_core::placement::StoredPosition;
use stampd_core::types::{DbId, Timestamp};

/// A row from the `design_positions` table.
///
/// At most one row exists per `(vendor_product_id, design_id)`; saves are
/// upserts with last-write-wins semantics.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DesignPosition {
    pub id: DbId,
    pub vendor_product_id: DbId,
    pub design_id: DbId,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub constraints: Option<serde_json::Value>,
    pub design_width: Option<f64>,
    pub design_height: Option<f64>,
    pub updated_at: Timestamp,
}

impl DesignPosition {
    /// Convert to the calculator's stored-position input. Constraint blobs
    /// written by older clients may be arbitrary JSON; anything unreadable
    /// degrades rather than erroring.
    pub fn to_stored(&self) -> StoredPosition {
        StoredPosition::from_columns(
            Some(self.x),
            Some(self.y),
            Some(self.scale),
            Some(self.rotation),
            self.design_width,
            self.design_height,
            self.constraints.as_ref(),
        )
    }
}

/// DTO for saving (upserting) a design position.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveDesignPosition {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
    pub constraints: Option<serde_json::Value>,
    pub design_width: Option<f64>,
    pub design_height: Option<f64>,
}
