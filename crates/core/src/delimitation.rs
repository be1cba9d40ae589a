//! Delimitation coordinate types, validation, and conversion.
//!
//! A delimitation is a printable rectangular region on one product image,
//! stored either as percentages of the image's natural size or as raw pixels
//! captured at a reference resolution. This module owns the coordinate-type
//! tag boundary, the bounds invariants, and the pure pixel<->percentage
//! conversion functions used by the store and the stateless conversion API.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::{Rect, Size};
use crate::types::DbId;

/* --------------------------------------------------------------------------
Coordinate type tag
-------------------------------------------------------------------------- */

/// Coordinate system of a delimitation's geometry.
///
/// The serde impl owns the wire tags (`"PERCENTAGE"` / `"PIXEL"`). The
/// database stores the historical tag `"ABSOLUTE"` for pixel coordinates;
/// that translation happens only through [`CoordinateType::as_db_str`] and
/// [`CoordinateType::from_db_str`], never through ad-hoc string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoordinateType {
    Percentage,
    Pixel,
}

impl CoordinateType {
    /// Stored tag. Pixel coordinates keep the legacy `ABSOLUTE` tag.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Percentage => "PERCENTAGE",
            Self::Pixel => "ABSOLUTE",
        }
    }

    /// Parse the stored tag.
    pub fn from_db_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "PERCENTAGE" => Ok(Self::Percentage),
            "ABSOLUTE" => Ok(Self::Pixel),
            _ => Err(CoreError::Internal(format!(
                "Unknown stored coordinate type tag '{s}'"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// The validatable geometry of a delimitation, independent of persistence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelimitationGeometry {
    pub coordinate_type: CoordinateType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Natural pixel width of the image when pixel coordinates were captured.
    pub reference_width: Option<f64>,
    /// Natural pixel height of the image when pixel coordinates were captured.
    pub reference_height: Option<f64>,
}

impl DelimitationGeometry {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Validate a delimitation's geometry, collecting every violated rule.
///
/// All violations are reported in a single [`CoreError::Validation`] message
/// so a caller can correct a bad payload in one round trip instead of
/// replaying it rule by rule.
///
/// - PERCENTAGE: `x >= 0`, `y >= 0`, `width > 0`, `height > 0`,
///   `x + width <= 100`, `y + height <= 100`.
/// - PIXEL: positive `reference_width` and `reference_height` must be
///   present; no percentage-range constraint applies.
pub fn validate_bounds(geometry: &DelimitationGeometry) -> Result<(), CoreError> {
    let mut violations: Vec<String> = Vec::new();

    for (label, value) in [
        ("x", geometry.x),
        ("y", geometry.y),
        ("width", geometry.width),
        ("height", geometry.height),
    ] {
        if !value.is_finite() {
            violations.push(format!("{label} must be a finite number"));
        }
    }

    if geometry.width <= 0.0 {
        violations.push("width must be greater than 0".to_string());
    }
    if geometry.height <= 0.0 {
        violations.push("height must be greater than 0".to_string());
    }

    match geometry.coordinate_type {
        CoordinateType::Percentage => {
            if geometry.x < 0.0 {
                violations.push("x must not be negative".to_string());
            }
            if geometry.y < 0.0 {
                violations.push("y must not be negative".to_string());
            }
            if geometry.x + geometry.width > 100.0 {
                violations.push(format!(
                    "x + width must not exceed 100% (got {})",
                    geometry.x + geometry.width
                ));
            }
            if geometry.y + geometry.height > 100.0 {
                violations.push(format!(
                    "y + height must not exceed 100% (got {})",
                    geometry.y + geometry.height
                ));
            }
        }
        CoordinateType::Pixel => {
            let width_ok = geometry.reference_width.is_some_and(|w| w > 0.0);
            let height_ok = geometry.reference_height.is_some_and(|h| h > 0.0);
            if !width_ok {
                violations.push(
                    "reference_width must be present and positive for PIXEL coordinates"
                        .to_string(),
                );
            }
            if !height_ok {
                violations.push(
                    "reference_height must be present and positive for PIXEL coordinates"
                        .to_string(),
                );
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(violations.join("; ")))
    }
}

/// Require that a product image has known, positive natural dimensions.
///
/// Every pixel-based operation needs the image's natural size; a missing or
/// non-positive size is a hard validation failure, never a soft default.
pub fn validate_image_reference(image_id: DbId, natural: Option<Size>) -> Result<Size, CoreError> {
    match natural {
        Some(size) if size.is_positive() => Ok(size),
        _ => Err(CoreError::Validation(format!(
            "Product image {image_id} has no positive natural dimensions; \
             upload metadata must be recorded before delimitations can be placed"
        ))),
    }
}

/* --------------------------------------------------------------------------
Conversion
-------------------------------------------------------------------------- */

/// Round a pixel value to a percentage of `dimension` with 2 decimal places.
fn to_percentage(value: f64, dimension: f64) -> f64 {
    (value / dimension * 10000.0).round() / 100.0
}

/// Round a percentage of `dimension` to the nearest whole pixel.
fn to_pixels(value: f64, dimension: f64) -> f64 {
    (value * dimension / 100.0).round()
}

/// Convert a rectangle in absolute pixels to percentages of the image size.
///
/// Percentages are rounded to 2 decimal places.
pub fn convert_absolute_to_percentage(rect: &Rect, image: Size) -> Result<Rect, CoreError> {
    if !image.is_positive() {
        return Err(CoreError::Validation(format!(
            "Image dimensions must be positive to convert coordinates (got {}x{})",
            image.width, image.height
        )));
    }
    Ok(Rect {
        x: to_percentage(rect.x, image.width),
        y: to_percentage(rect.y, image.height),
        width: to_percentage(rect.width, image.width),
        height: to_percentage(rect.height, image.height),
    })
}

/// Convert a rectangle in percentages of the image size to absolute pixels.
///
/// Pixel values are rounded to the nearest integer.
pub fn convert_percentage_to_absolute(rect: &Rect, image: Size) -> Result<Rect, CoreError> {
    if !image.is_positive() {
        return Err(CoreError::Validation(format!(
            "Image dimensions must be positive to convert coordinates (got {}x{})",
            image.width, image.height
        )));
    }
    Ok(Rect {
        x: to_pixels(rect.x, image.width),
        y: to_pixels(rect.y, image.height),
        width: to_pixels(rect.width, image.width),
        height: to_pixels(rect.height, image.height),
    })
}

/* --------------------------------------------------------------------------
Migration
-------------------------------------------------------------------------- */

/// Decide the percentage form of one delimitation's geometry.
///
/// Percentage geometry comes back unchanged, so applying the migration twice
/// is a no-op. Pixel geometry converts against the reference dimensions it
/// was captured at, falling back to the image's current natural size when the
/// reference is missing or non-positive. With neither available the row
/// cannot be migrated.
pub fn migrate_geometry(
    geometry: &DelimitationGeometry,
    natural: Option<Size>,
) -> Result<DelimitationGeometry, CoreError> {
    if geometry.coordinate_type == CoordinateType::Percentage {
        return Ok(*geometry);
    }

    let reference = match (geometry.reference_width, geometry.reference_height) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Size {
            width: w,
            height: h,
        },
        _ => natural
            .filter(Size::is_positive)
            .ok_or_else(|| {
                CoreError::Validation(
                    "Cannot migrate PIXEL delimitation: neither reference nor natural \
                     image dimensions are positive"
                        .to_string(),
                )
            })?,
    };

    let rect = convert_absolute_to_percentage(&geometry.rect(), reference)?;
    Ok(DelimitationGeometry {
        coordinate_type: CoordinateType::Percentage,
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        reference_width: geometry.reference_width,
        reference_height: geometry.reference_height,
    })
}

/* --------------------------------------------------------------------------
Migration bookkeeping
-------------------------------------------------------------------------- */

/// Result of a batch PIXEL -> PERCENTAGE migration over one product.
///
/// A single row's conversion failure is counted, never fatal to the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    pub success: u32,
    pub errors: u32,
    pub total: u32,
}

impl MigrationOutcome {
    pub fn record_success(&mut self) {
        self.success += 1;
        self.total += 1;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
        self.total += 1;
    }
}

/// Rollout statistics for the one-way percentage migration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DelimitationStats {
    pub total: i64,
    pub percentage: i64,
    pub pixel: i64,
    /// Share of delimitations already migrated, 0-100 with 2 decimals.
    pub migration_complete_pct: f64,
}

impl DelimitationStats {
    /// Build stats from raw counts. An empty table counts as fully migrated.
    pub fn from_counts(total: i64, percentage: i64) -> Self {
        let pixel = total - percentage;
        let migration_complete_pct = if total == 0 {
            100.0
        } else {
            (percentage as f64 / total as f64 * 10000.0).round() / 100.0
        };
        Self {
            total,
            percentage,
            pixel,
            migration_complete_pct,
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pct_geometry(x: f64, y: f64, width: f64, height: f64) -> DelimitationGeometry {
        DelimitationGeometry {
            coordinate_type: CoordinateType::Percentage,
            x,
            y,
            width,
            height,
            reference_width: None,
            reference_height: None,
        }
    }

    // -- coordinate type tags ----------------------------------------------

    #[test]
    fn pixel_stores_as_legacy_absolute_tag() {
        assert_eq!(CoordinateType::Pixel.as_db_str(), "ABSOLUTE");
        assert_eq!(
            CoordinateType::from_db_str("ABSOLUTE").unwrap(),
            CoordinateType::Pixel
        );
        assert_eq!(CoordinateType::Percentage.as_db_str(), "PERCENTAGE");
    }

    #[test]
    fn unknown_db_tag_is_internal_error() {
        assert_matches!(
            CoordinateType::from_db_str("RELATIVE"),
            Err(CoreError::Internal(_))
        );
    }

    #[test]
    fn serde_uses_wire_tags() {
        assert_eq!(
            serde_json::to_string(&CoordinateType::Pixel).unwrap(),
            "\"PIXEL\""
        );
        let parsed: CoordinateType = serde_json::from_str("\"PERCENTAGE\"").unwrap();
        assert_eq!(parsed, CoordinateType::Percentage);
        // The stored tag never appears on the wire.
        assert!(serde_json::from_str::<CoordinateType>("\"ABSOLUTE\"").is_err());
    }

    // -- validate_bounds ---------------------------------------------------

    #[test]
    fn valid_percentage_geometry_accepted() {
        assert!(validate_bounds(&pct_geometry(10.0, 20.0, 30.0, 40.0)).is_ok());
        assert!(validate_bounds(&pct_geometry(0.0, 0.0, 100.0, 100.0)).is_ok());
    }

    #[test]
    fn overflowing_x_width_names_the_rule() {
        let err = validate_bounds(&pct_geometry(80.0, 10.0, 30.0, 20.0)).unwrap_err();
        assert!(err.to_string().contains("x + width must not exceed 100%"));
    }

    #[test]
    fn all_violations_reported_together() {
        let err = validate_bounds(&pct_geometry(-5.0, 90.0, 0.0, 20.0)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("x must not be negative"));
        assert!(msg.contains("width must be greater than 0"));
        assert!(msg.contains("y + height must not exceed 100%"));
    }

    #[test]
    fn non_finite_values_rejected() {
        let err = validate_bounds(&pct_geometry(f64::NAN, 0.0, 10.0, 10.0)).unwrap_err();
        assert!(err.to_string().contains("x must be a finite number"));
    }

    #[test]
    fn pixel_geometry_requires_reference_dimensions() {
        let geometry = DelimitationGeometry {
            coordinate_type: CoordinateType::Pixel,
            x: 120.0,
            y: 340.0,
            width: 500.0,
            height: 400.0,
            reference_width: None,
            reference_height: Some(0.0),
        };
        let msg = validate_bounds(&geometry).unwrap_err().to_string();
        assert!(msg.contains("reference_width must be present and positive"));
        assert!(msg.contains("reference_height must be present and positive"));
    }

    #[test]
    fn pixel_geometry_has_no_percentage_bound() {
        // Values far beyond 100 are fine in pixel space.
        let geometry = DelimitationGeometry {
            coordinate_type: CoordinateType::Pixel,
            x: 850.0,
            y: 1200.0,
            width: 900.0,
            height: 700.0,
            reference_width: Some(3000.0),
            reference_height: Some(4000.0),
        };
        assert!(validate_bounds(&geometry).is_ok());
    }

    // -- validate_image_reference ------------------------------------------

    #[test]
    fn image_with_positive_dimensions_accepted() {
        let size = validate_image_reference(
            7,
            Some(Size {
                width: 1200.0,
                height: 1600.0,
            }),
        )
        .unwrap();
        assert_eq!(size.width, 1200.0);
    }

    #[test]
    fn image_without_dimensions_rejected() {
        assert_matches!(
            validate_image_reference(7, None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            validate_image_reference(
                7,
                Some(Size {
                    width: 0.0,
                    height: 1600.0
                })
            ),
            Err(CoreError::Validation(_))
        );
    }

    // -- conversions -------------------------------------------------------

    #[test]
    fn absolute_to_percentage_rounds_to_two_decimals() {
        let rect = Rect {
            x: 333.0,
            y: 100.0,
            width: 500.0,
            height: 250.0,
        };
        let image = Size {
            width: 1000.0,
            height: 3000.0,
        };
        let pct = convert_absolute_to_percentage(&rect, image).unwrap();
        assert_eq!(pct.x, 33.3);
        assert_eq!(pct.y, 3.33);
        assert_eq!(pct.width, 50.0);
        assert_eq!(pct.height, 8.33);
    }

    #[test]
    fn percentage_to_absolute_rounds_to_whole_pixels() {
        let rect = Rect {
            x: 33.33,
            y: 3.33,
            width: 50.0,
            height: 8.33,
        };
        let image = Size {
            width: 1000.0,
            height: 3000.0,
        };
        let px = convert_percentage_to_absolute(&rect, image).unwrap();
        assert_eq!(px.x, 333.0);
        assert_eq!(px.y, 100.0);
        assert_eq!(px.width, 500.0);
        assert_eq!(px.height, 250.0);
    }

    #[test]
    fn conversion_rejects_non_positive_image() {
        let rect = Rect {
            x: 1.0,
            y: 1.0,
            width: 1.0,
            height: 1.0,
        };
        let image = Size {
            width: 0.0,
            height: 100.0,
        };
        assert!(convert_absolute_to_percentage(&rect, image).is_err());
        assert!(convert_percentage_to_absolute(&rect, image).is_err());
    }

    #[test]
    fn round_trip_stays_within_one_pixel() {
        let image = Size {
            width: 1237.0,
            height: 941.0,
        };
        let rects = [
            Rect {
                x: 17.0,
                y: 23.0,
                width: 411.0,
                height: 333.0,
            },
            Rect {
                x: 0.0,
                y: 0.0,
                width: 1237.0,
                height: 941.0,
            },
            Rect {
                x: 618.0,
                y: 470.0,
                width: 1.0,
                height: 1.0,
            },
        ];
        for rect in rects {
            let pct = convert_absolute_to_percentage(&rect, image).unwrap();
            let back = convert_percentage_to_absolute(&pct, image).unwrap();
            assert!((back.x - rect.x).abs() <= 1.0, "x drifted: {back:?}");
            assert!((back.y - rect.y).abs() <= 1.0, "y drifted: {back:?}");
            assert!((back.width - rect.width).abs() <= 1.0, "width drifted: {back:?}");
            assert!((back.height - rect.height).abs() <= 1.0, "height drifted: {back:?}");
        }
    }

    // -- migrate_geometry --------------------------------------------------

    fn pixel_geometry(reference: Option<(f64, f64)>) -> DelimitationGeometry {
        DelimitationGeometry {
            coordinate_type: CoordinateType::Pixel,
            x: 200.0,
            y: 500.0,
            width: 1000.0,
            height: 750.0,
            reference_width: reference.map(|(w, _)| w),
            reference_height: reference.map(|(_, h)| h),
        }
    }

    #[test]
    fn migrate_converts_against_reference_dimensions() {
        let migrated = migrate_geometry(&pixel_geometry(Some((2000.0, 2500.0))), None).unwrap();
        assert_eq!(migrated.coordinate_type, CoordinateType::Percentage);
        assert_eq!(migrated.x, 10.0);
        assert_eq!(migrated.y, 20.0);
        assert_eq!(migrated.width, 50.0);
        assert_eq!(migrated.height, 30.0);
        // The capture-time reference stays as a historical record.
        assert_eq!(migrated.reference_width, Some(2000.0));
    }

    #[test]
    fn migrate_is_idempotent() {
        let once = migrate_geometry(&pixel_geometry(Some((2000.0, 2500.0))), None).unwrap();
        let twice = migrate_geometry(&once, None).unwrap();
        assert_eq!(twice, once);

        let already = pct_geometry(10.0, 20.0, 30.0, 40.0);
        assert_eq!(migrate_geometry(&already, None).unwrap(), already);
    }

    #[test]
    fn migrate_falls_back_to_natural_size() {
        let natural = Some(Size {
            width: 4000.0,
            height: 5000.0,
        });
        let migrated = migrate_geometry(&pixel_geometry(None), natural).unwrap();
        assert_eq!(migrated.x, 5.0);
        assert_eq!(migrated.width, 25.0);

        // A zero reference is as unusable as a missing one.
        let zeroed = migrate_geometry(&pixel_geometry(Some((0.0, 2500.0))), natural).unwrap();
        assert_eq!(zeroed.x, 5.0);
    }

    #[test]
    fn migrate_without_any_dimensions_is_validation_error() {
        assert_matches!(
            migrate_geometry(&pixel_geometry(None), None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            migrate_geometry(
                &pixel_geometry(None),
                Some(Size {
                    width: 0.0,
                    height: 5000.0
                })
            ),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn batch_counts_unmigratable_row_and_continues() {
        // Ten pixel rows; the fifth has no usable dimensions anywhere.
        let mut outcome = MigrationOutcome::default();
        for i in 0..10 {
            let geometry = if i == 4 {
                pixel_geometry(None)
            } else {
                pixel_geometry(Some((2000.0, 2500.0)))
            };
            match migrate_geometry(&geometry, None) {
                Ok(_) => outcome.record_success(),
                Err(_) => outcome.record_error(),
            }
        }
        assert_eq!(
            outcome,
            MigrationOutcome {
                success: 9,
                errors: 1,
                total: 10
            }
        );
    }

    // -- migration bookkeeping ---------------------------------------------

    #[test]
    fn outcome_counts_successes_and_errors() {
        let mut outcome = MigrationOutcome::default();
        for _ in 0..9 {
            outcome.record_success();
        }
        outcome.record_error();
        assert_eq!(
            outcome,
            MigrationOutcome {
                success: 9,
                errors: 1,
                total: 10
            }
        );
    }

    #[test]
    fn stats_report_migration_share() {
        let stats = DelimitationStats::from_counts(8, 6);
        assert_eq!(stats.pixel, 2);
        assert_eq!(stats.migration_complete_pct, 75.0);

        let third = DelimitationStats::from_counts(3, 1);
        assert_eq!(third.migration_complete_pct, 33.33);
    }

    #[test]
    fn empty_stats_count_as_fully_migrated() {
        let stats = DelimitationStats::from_counts(0, 0);
        assert_eq!(stats.migration_complete_pct, 100.0);
        assert_eq!(stats.pixel, 0);
    }
}
