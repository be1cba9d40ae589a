//! Delimitation entity model, DTOs, and the stored/wire tag boundary.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stampd_core::delimitation::{CoordinateType, DelimitationGeometry};
use stampd_core::error::CoreError;
use stampd_core::types::{DbId, Timestamp};

/// A row from the `delimitations` table.
///
/// `coordinate_type` holds the stored tag (`PERCENTAGE` / legacy `ABSOLUTE`);
/// everything leaving this crate goes through [`Delimitation::into_wire`],
/// which is the single place the stored tag becomes the public `PIXEL` tag.
#[derive(Debug, Clone, FromRow)]
pub struct Delimitation {
    pub id: DbId,
    pub product_image_id: DbId,
    pub name: Option<String>,
    pub coordinate_type: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub reference_width: Option<f64>,
    pub reference_height: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Delimitation {
    /// Decode the stored coordinate-type tag.
    pub fn coordinate_type(&self) -> Result<CoordinateType, CoreError> {
        CoordinateType::from_db_str(&self.coordinate_type)
    }

    /// The row's validatable geometry.
    pub fn geometry(&self) -> Result<DelimitationGeometry, CoreError> {
        Ok(DelimitationGeometry {
            coordinate_type: self.coordinate_type()?,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            reference_width: self.reference_width,
            reference_height: self.reference_height,
        })
    }

    /// Merge a partial update over this row, producing the geometry that must
    /// re-validate before anything is persisted.
    ///
    /// The coordinate type is not updatable here; it only changes through the
    /// one-way percentage migration.
    pub fn merged_geometry(
        &self,
        update: &UpdateDelimitation,
    ) -> Result<DelimitationGeometry, CoreError> {
        Ok(DelimitationGeometry {
            coordinate_type: self.coordinate_type()?,
            x: update.x.unwrap_or(self.x),
            y: update.y.unwrap_or(self.y),
            width: update.width.unwrap_or(self.width),
            height: update.height.unwrap_or(self.height),
            reference_width: update.reference_width.or(self.reference_width),
            reference_height: update.reference_height.or(self.reference_height),
        })
    }

    /// Merge a partial update's name over this row's.
    ///
    /// Distinguishes an omitted `name` (keep the stored label) from an
    /// explicit `null` (clear it).
    pub fn merged_name(&self, update: &UpdateDelimitation) -> Option<String> {
        match &update.name {
            Some(name) => name.clone(),
            None => self.name.clone(),
        }
    }

    /// Convert to the wire representation (stored `ABSOLUTE` -> wire `PIXEL`).
    pub fn into_wire(self) -> Result<DelimitationWire, CoreError> {
        let coordinate_type = CoordinateType::from_db_str(&self.coordinate_type)?;
        Ok(DelimitationWire {
            id: self.id,
            product_image_id: self.product_image_id,
            name: self.name,
            coordinate_type,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
            reference_width: self.reference_width,
            reference_height: self.reference_height,
            created_at: self.created_at,
        })
    }
}

/// The delimitation record as API clients see it.
#[derive(Debug, Clone, Serialize)]
pub struct DelimitationWire {
    pub id: DbId,
    pub product_image_id: DbId,
    pub name: Option<String>,
    pub coordinate_type: CoordinateType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub reference_width: Option<f64>,
    pub reference_height: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for creating a new delimitation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDelimitation {
    pub name: Option<String>,
    pub coordinate_type: CoordinateType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: Option<f64>,
    pub reference_width: Option<f64>,
    pub reference_height: Option<f64>,
}

impl CreateDelimitation {
    /// The payload's validatable geometry.
    pub fn geometry(&self) -> DelimitationGeometry {
        DelimitationGeometry {
            coordinate_type: self.coordinate_type,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            reference_width: self.reference_width,
            reference_height: self.reference_height,
        }
    }
}

/// DTO for partially updating a delimitation.
///
/// Omitted fields keep their stored values; the merged result re-validates
/// before persisting. Coordinate-type changes are deliberately not accepted
/// here (migration is one-way and has its own endpoint).
///
/// `name` is double-wrapped so an explicit `"name": null` (clear the label)
/// stays distinguishable from an omitted field (keep it).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDelimitation {
    #[serde(default, deserialize_with = "nullable_name")]
    pub name: Option<Option<String>>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub reference_width: Option<f64>,
    pub reference_height: Option<f64>,
}

/// Present-but-possibly-null deserializer: only runs when the key exists, so
/// `null` becomes `Some(None)` while an absent key stays `None` via the
/// field's default.
fn nullable_name<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pixel_row() -> Delimitation {
        Delimitation {
            id: 11,
            product_image_id: 3,
            name: Some("chest".to_string()),
            coordinate_type: "ABSOLUTE".to_string(),
            x: 120.0,
            y: 340.0,
            width: 500.0,
            height: 400.0,
            rotation: 0.0,
            reference_width: Some(2000.0),
            reference_height: Some(2500.0),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn stored_absolute_tag_surfaces_as_pixel() {
        let wire = pixel_row().into_wire().unwrap();
        assert_eq!(wire.coordinate_type, CoordinateType::Pixel);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["coordinate_type"], "PIXEL");
    }

    #[test]
    fn corrupt_stored_tag_is_internal_error() {
        let mut row = pixel_row();
        row.coordinate_type = "RELATIVE".to_string();
        assert_matches!(row.into_wire(), Err(CoreError::Internal(_)));
    }

    #[test]
    fn merged_geometry_overlays_only_supplied_fields() {
        let row = pixel_row();
        let update = UpdateDelimitation {
            x: Some(200.0),
            height: Some(450.0),
            ..UpdateDelimitation::default()
        };
        let merged = row.merged_geometry(&update).unwrap();
        assert_eq!(merged.x, 200.0);
        assert_eq!(merged.y, 340.0);
        assert_eq!(merged.width, 500.0);
        assert_eq!(merged.height, 450.0);
        assert_eq!(merged.coordinate_type, CoordinateType::Pixel);
        assert_eq!(merged.reference_width, Some(2000.0));
    }

    #[test]
    fn explicit_null_name_clears_but_omission_keeps() {
        let row = pixel_row();

        let omitted: UpdateDelimitation = serde_json::from_value(serde_json::json!({
            "x": 5.0
        }))
        .unwrap();
        assert_eq!(row.merged_name(&omitted), Some("chest".to_string()));

        let cleared: UpdateDelimitation = serde_json::from_value(serde_json::json!({
            "name": null
        }))
        .unwrap();
        assert_eq!(cleared.name, Some(None));
        assert_eq!(row.merged_name(&cleared), None);

        let replaced: UpdateDelimitation = serde_json::from_value(serde_json::json!({
            "name": "sleeve"
        }))
        .unwrap();
        assert_eq!(row.merged_name(&replaced), Some("sleeve".to_string()));
    }

    #[test]
    fn create_payload_parses_wire_tag() {
        let payload: CreateDelimitation = serde_json::from_value(serde_json::json!({
            "coordinate_type": "PIXEL",
            "x": 10.0, "y": 20.0, "width": 100.0, "height": 50.0,
            "reference_width": 1000.0, "reference_height": 800.0
        }))
        .unwrap();
        assert_eq!(payload.coordinate_type, CoordinateType::Pixel);
        assert_eq!(payload.geometry().reference_width, Some(1000.0));
    }
}
