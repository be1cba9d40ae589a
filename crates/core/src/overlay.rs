//! Projection of natural-frame delimitations into viewport rectangles.
//!
//! A delimitation's pixel geometry is expressed against the image's natural
//! (reference) resolution. At render time the browser reports the on-screen
//! bounding box of the image element; projection scales each axis
//! independently, so a container that does not preserve the image's aspect
//! ratio still yields axis-correct (if visually distorted) geometry instead
//! of failing.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::{Rect, Size};

/// On-screen bounding box of the rendered image element, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A projected rectangle in the same viewport space as the supplied box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Center-anchored form of an [`OverlayRect`], for anchor-based UI affordances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayCenter {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Project a region in the image's natural frame onto the rendered element.
///
/// `region` is in natural pixels, `reference` is the natural size those
/// pixels were captured against, and `bbox` is the rendered element's
/// viewport box. Each axis scales by its own factor.
pub fn compute_overlay_rect(
    region: &Rect,
    reference: Size,
    bbox: &BoundingBox,
) -> Result<OverlayRect, CoreError> {
    if !reference.is_positive() {
        return Err(CoreError::Validation(format!(
            "Reference dimensions must be positive to project a delimitation (got {}x{})",
            reference.width, reference.height
        )));
    }

    let scale_x = bbox.width / reference.width;
    let scale_y = bbox.height / reference.height;

    Ok(OverlayRect {
        left: bbox.left + region.x * scale_x,
        top: bbox.top + region.y * scale_y,
        width: region.width * scale_x,
        height: region.height * scale_y,
    })
}

/// Project a region and return it center-anchored.
pub fn compute_overlay_center(
    region: &Rect,
    reference: Size,
    bbox: &BoundingBox,
) -> Result<OverlayCenter, CoreError> {
    let rect = compute_overlay_rect(region, reference, bbox)?;
    Ok(OverlayCenter {
        center_x: rect.left + rect.width / 2.0,
        center_y: rect.top + rect.height / 2.0,
        width: rect.width,
        height: rect.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: Size = Size {
        width: 100.0,
        height: 200.0,
    };

    const REGION: Rect = Rect {
        x: 10.0,
        y: 20.0,
        width: 30.0,
        height: 40.0,
    };

    #[test]
    fn scales_each_axis_by_rendered_over_reference() {
        let bbox = BoundingBox {
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 400.0,
        };
        let rect = compute_overlay_rect(&REGION, REFERENCE, &bbox).unwrap();
        assert_eq!(rect.left, 20.0);
        assert_eq!(rect.top, 40.0);
        assert_eq!(rect.width, 60.0);
        assert_eq!(rect.height, 80.0);
    }

    #[test]
    fn box_offset_translates_the_result() {
        let bbox = BoundingBox {
            left: 50.0,
            top: 8.0,
            width: 100.0,
            height: 200.0,
        };
        let rect = compute_overlay_rect(&REGION, REFERENCE, &bbox).unwrap();
        assert_eq!(rect.left, 60.0);
        assert_eq!(rect.top, 28.0);
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.height, 40.0);
    }

    #[test]
    fn distorted_container_still_projects() {
        // Container stretched horizontally: axes scale independently.
        let bbox = BoundingBox {
            left: 0.0,
            top: 0.0,
            width: 400.0,
            height: 200.0,
        };
        let rect = compute_overlay_rect(&REGION, REFERENCE, &bbox).unwrap();
        assert_eq!(rect.left, 40.0);
        assert_eq!(rect.top, 20.0);
        assert_eq!(rect.width, 120.0);
        assert_eq!(rect.height, 40.0);
    }

    #[test]
    fn non_positive_reference_rejected() {
        let bbox = BoundingBox {
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 400.0,
        };
        let zero = Size {
            width: 0.0,
            height: 200.0,
        };
        assert!(compute_overlay_rect(&REGION, zero, &bbox).is_err());
    }

    #[test]
    fn center_derived_from_projected_rect() {
        let bbox = BoundingBox {
            left: 0.0,
            top: 0.0,
            width: 200.0,
            height: 400.0,
        };
        let center = compute_overlay_center(&REGION, REFERENCE, &bbox).unwrap();
        assert_eq!(center.center_x, 50.0);
        assert_eq!(center.center_y, 80.0);
        assert_eq!(center.width, 60.0);
        assert_eq!(center.height, 80.0);
    }
}
