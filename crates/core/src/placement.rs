//! Design placement derivation.
//!
//! A stored placement row may be partial (older rows predate the dimension
//! columns) or carry malformed constraint JSON. This module always produces a
//! complete, renderable placement record, filling the design's pixel
//! dimensions through an ordered provider chain: explicit stored dimensions,
//! then dimensions parsed from a CDN-style URL, then a category heuristic.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/* --------------------------------------------------------------------------
Defaults
-------------------------------------------------------------------------- */

/// Default scale for a design placed without any stored position.
pub const DEFAULT_SCALE: f64 = 0.85;

/// Lower bound clients may scale a design to.
pub const DEFAULT_MIN_SCALE: f64 = 0.1;

/// Upper bound clients may scale a design to.
pub const DEFAULT_MAX_SCALE: f64 = 2.0;

/// Generic fallback design dimensions when nothing better is known.
pub const GENERIC_DESIGN_SIZE: (f64, f64) = (1200.0, 1200.0);

/// Heuristic dimensions for logo-category designs.
const LOGO_DESIGN_SIZE: (f64, f64) = (800.0, 800.0);

/// Heuristic dimensions for illustration-category designs.
const ILLUSTRATION_DESIGN_SIZE: (f64, f64) = (1600.0, 1600.0);

/// Heuristic dimensions for text/quote-category designs (wide banner shape).
const TEXT_DESIGN_SIZE: (f64, f64) = (1400.0, 700.0);

/* --------------------------------------------------------------------------
Records
-------------------------------------------------------------------------- */

/// Scale constraints attached to every placement record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleConstraints {
    pub min_scale: f64,
    pub max_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptive: Option<bool>,
}

impl Default for ScaleConstraints {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            adaptive: None,
        }
    }
}

/// A possibly-partial persisted placement row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredPosition {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub scale: Option<f64>,
    pub rotation: Option<f64>,
    pub design_width: Option<f64>,
    pub design_height: Option<f64>,
    /// Adaptive flag recovered from the stored constraints blob, if any.
    pub adaptive: Option<bool>,
}

impl StoredPosition {
    /// Build from typed columns plus the raw constraints blob.
    ///
    /// The constraints column is free-form JSON written by several client
    /// generations; anything unreadable degrades to "no flag" rather than
    /// failing the row.
    pub fn from_columns(
        x: Option<f64>,
        y: Option<f64>,
        scale: Option<f64>,
        rotation: Option<f64>,
        design_width: Option<f64>,
        design_height: Option<f64>,
        constraints: Option<&serde_json::Value>,
    ) -> Self {
        let adaptive = constraints
            .and_then(|c| c.get("adaptive"))
            .and_then(|v| v.as_bool());
        Self {
            x,
            y,
            scale,
            rotation,
            design_width,
            design_height,
            adaptive,
        }
    }

    /// Leniently parse a whole placement row out of raw JSON.
    ///
    /// Missing keys, wrong types, or a non-object value all degrade to an
    /// empty position (which the calculator fills with defaults).
    pub fn from_json(value: &serde_json::Value) -> Self {
        let num = |key: &str| value.get(key).and_then(|v| v.as_f64());
        Self::from_columns(
            num("x"),
            num("y"),
            num("scale"),
            num("rotation"),
            num("design_width"),
            num("design_height"),
            value.get("constraints"),
        )
    }
}

/// A complete, renderable placement record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignPlacement {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub design_width: f64,
    pub design_height: f64,
    pub constraints: ScaleConstraints,
}

/* --------------------------------------------------------------------------
Dimension providers
-------------------------------------------------------------------------- */

// CDN transformation segment, e.g. `/upload/w_1200,h_800,c_fit/design.png`.
// Width and height markers may appear in either order with other params
// between them.
static URL_SEG_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[/,])w_(\d+)(?:[/,]|$)").expect("valid regex"));
static URL_SEG_HEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[/,])h_(\d+)(?:[/,]|$)").expect("valid regex"));

// Dimensions baked into the file name, e.g. `design_1200x800.png`.
static URL_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2,5})x(\d{2,5})\.[A-Za-z]+(?:[?#]|$)").expect("valid regex"));

// Dimensions passed as query parameters, e.g. `?width=1200&height=800`.
static URL_QUERY_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]width=(\d+)").expect("valid regex"));
static URL_QUERY_HEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]height=(\d+)").expect("valid regex"));

fn capture_f64(re: &Regex, haystack: &str, group: usize) -> Option<f64> {
    re.captures(haystack)?
        .get(group)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Provider 1: explicit dimensions on the stored row.
fn stored_dimensions(stored: Option<&StoredPosition>) -> Option<(f64, f64)> {
    let stored = stored?;
    match (stored.design_width, stored.design_height) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some((w, h)),
        _ => None,
    }
}

/// Provider 2: dimensions parsed from a CDN-style URL. First matching
/// pattern shape wins.
fn url_dimensions(url: Option<&str>) -> Option<(f64, f64)> {
    let url = url?;

    if let (Some(w), Some(h)) = (
        capture_f64(&URL_SEG_WIDTH_RE, url, 1),
        capture_f64(&URL_SEG_HEIGHT_RE, url, 1),
    ) {
        return Some((w, h));
    }

    if let Some(caps) = URL_FILE_RE.captures(url) {
        let w = caps.get(1)?.as_str().parse::<f64>().ok()?;
        let h = caps.get(2)?.as_str().parse::<f64>().ok()?;
        return Some((w, h));
    }

    if let (Some(w), Some(h)) = (
        capture_f64(&URL_QUERY_WIDTH_RE, url, 1),
        capture_f64(&URL_QUERY_HEIGHT_RE, url, 1),
    ) {
        return Some((w, h));
    }

    None
}

/// Provider 3: category heuristic.
fn category_dimensions(category: Option<&str>) -> Option<(f64, f64)> {
    let category = category?.trim().to_ascii_lowercase();
    match category.as_str() {
        "logo" => Some(LOGO_DESIGN_SIZE),
        "illustration" => Some(ILLUSTRATION_DESIGN_SIZE),
        "text" | "quote" => Some(TEXT_DESIGN_SIZE),
        _ => None,
    }
}

/// Run the provider chain in order; fall back to the generic size.
fn resolve_design_dimensions(
    stored: Option<&StoredPosition>,
    url_hint: Option<&str>,
    category_hint: Option<&str>,
) -> (f64, f64) {
    let providers: &[&dyn Fn() -> Option<(f64, f64)>] = &[
        &|| stored_dimensions(stored),
        &|| url_dimensions(url_hint),
        &|| category_dimensions(category_hint),
    ];
    providers
        .iter()
        .find_map(|provider| provider())
        .unwrap_or(GENERIC_DESIGN_SIZE)
}

/* --------------------------------------------------------------------------
Calculation
-------------------------------------------------------------------------- */

/// Derive a complete placement record from whatever is known.
///
/// Position, scale, and rotation fall back to a centered placement
/// (`x=0, y=0, rotation=0, scale=0.85`); design dimensions run through the
/// provider chain; constraints are always the defaults, carrying through the
/// stored adaptive flag when present.
pub fn calculate_design_position(
    stored: Option<&StoredPosition>,
    url_hint: Option<&str>,
    category_hint: Option<&str>,
) -> DesignPlacement {
    let (design_width, design_height) = resolve_design_dimensions(stored, url_hint, category_hint);

    let field = |get: fn(&StoredPosition) -> Option<f64>, default: f64| {
        stored.and_then(get).unwrap_or(default)
    };

    DesignPlacement {
        x: field(|s| s.x, 0.0),
        y: field(|s| s.y, 0.0),
        scale: field(|s| s.scale, DEFAULT_SCALE),
        rotation: field(|s| s.rotation, 0.0),
        design_width,
        design_height,
        constraints: ScaleConstraints {
            adaptive: stored.and_then(|s| s.adaptive),
            ..ScaleConstraints::default()
        },
    }
}

/// Map persisted placement rows to complete renderable records.
///
/// Partially-populated rows degrade to defaults per field; nothing here can
/// fail.
pub fn format_design_positions(rows: &[StoredPosition]) -> Vec<DesignPlacement> {
    rows.iter()
        .map(|row| calculate_design_position(Some(row), None, None))
        .collect()
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- defaults ----------------------------------------------------------

    #[test]
    fn no_data_yields_centered_generic_placement() {
        let placement = calculate_design_position(None, None, None);
        assert_eq!(placement.x, 0.0);
        assert_eq!(placement.y, 0.0);
        assert_eq!(placement.scale, 0.85);
        assert_eq!(placement.rotation, 0.0);
        assert_eq!(placement.design_width, 1200.0);
        assert_eq!(placement.design_height, 1200.0);
        assert_eq!(placement.constraints.min_scale, 0.1);
        assert_eq!(placement.constraints.max_scale, 2.0);
        assert_eq!(placement.constraints.adaptive, None);
    }

    #[test]
    fn partial_stored_row_fills_missing_fields() {
        let stored = StoredPosition {
            x: Some(12.0),
            scale: Some(1.2),
            ..StoredPosition::default()
        };
        let placement = calculate_design_position(Some(&stored), None, None);
        assert_eq!(placement.x, 12.0);
        assert_eq!(placement.y, 0.0);
        assert_eq!(placement.scale, 1.2);
        assert_eq!(placement.rotation, 0.0);
    }

    #[test]
    fn constraints_are_always_defaults_regardless_of_source() {
        let stored = StoredPosition {
            design_width: Some(500.0),
            design_height: Some(500.0),
            adaptive: Some(true),
            ..StoredPosition::default()
        };
        let placement = calculate_design_position(Some(&stored), None, None);
        assert_eq!(placement.constraints.min_scale, 0.1);
        assert_eq!(placement.constraints.max_scale, 2.0);
        assert_eq!(placement.constraints.adaptive, Some(true));
    }

    // -- dimension provider chain ------------------------------------------

    #[test]
    fn stored_dimensions_win_over_url_and_category() {
        let stored = StoredPosition {
            design_width: Some(640.0),
            design_height: Some(480.0),
            ..StoredPosition::default()
        };
        let placement = calculate_design_position(
            Some(&stored),
            Some("https://cdn.example.com/upload/w_1200,h_800/d.png"),
            Some("logo"),
        );
        assert_eq!((placement.design_width, placement.design_height), (640.0, 480.0));
    }

    #[test]
    fn non_positive_stored_dimensions_fall_through() {
        let stored = StoredPosition {
            design_width: Some(0.0),
            design_height: Some(480.0),
            ..StoredPosition::default()
        };
        let placement = calculate_design_position(Some(&stored), None, Some("logo"));
        assert_eq!((placement.design_width, placement.design_height), (800.0, 800.0));
    }

    #[test]
    fn url_transformation_segment_parsed() {
        let placement = calculate_design_position(
            None,
            Some("https://cdn.example.com/upload/w_1200,h_800,c_fit/v1/design.png"),
            None,
        );
        assert_eq!((placement.design_width, placement.design_height), (1200.0, 800.0));
    }

    #[test]
    fn url_transformation_segment_order_independent() {
        let placement = calculate_design_position(
            None,
            Some("https://cdn.example.com/upload/c_fill,h_600,q_80,w_900/design.jpg"),
            None,
        );
        assert_eq!((placement.design_width, placement.design_height), (900.0, 600.0));
    }

    #[test]
    fn url_file_name_dimensions_parsed() {
        let placement =
            calculate_design_position(None, Some("https://cdn.example.com/designs/skull_1500x900.png"), None);
        assert_eq!((placement.design_width, placement.design_height), (1500.0, 900.0));
    }

    #[test]
    fn url_query_dimensions_parsed() {
        let placement = calculate_design_position(
            None,
            Some("https://cdn.example.com/render?width=1000&height=500&fmt=webp"),
            None,
        );
        assert_eq!((placement.design_width, placement.design_height), (1000.0, 500.0));
    }

    #[test]
    fn unrecognized_url_falls_through_to_category() {
        let placement = calculate_design_position(
            None,
            Some("https://cdn.example.com/designs/skull.png"),
            Some("illustration"),
        );
        assert_eq!((placement.design_width, placement.design_height), (1600.0, 1600.0));
    }

    #[test]
    fn category_heuristics() {
        for (hint, expected) in [
            ("logo", (800.0, 800.0)),
            ("Logo", (800.0, 800.0)),
            ("text", (1400.0, 700.0)),
            ("quote", (1400.0, 700.0)),
            ("illustration", (1600.0, 1600.0)),
        ] {
            let placement = calculate_design_position(None, None, Some(hint));
            assert_eq!(
                (placement.design_width, placement.design_height),
                expected,
                "category {hint}"
            );
        }
    }

    #[test]
    fn unknown_category_uses_generic_default() {
        let placement = calculate_design_position(None, None, Some("pattern"));
        assert_eq!((placement.design_width, placement.design_height), (1200.0, 1200.0));
    }

    // -- lenient stored JSON parsing ---------------------------------------

    #[test]
    fn stored_position_parsed_from_json() {
        let row = json!({
            "x": 5.0,
            "y": -3.5,
            "scale": 1.1,
            "rotation": 45.0,
            "design_width": 600,
            "design_height": 400,
            "constraints": {"min_scale": 0.5, "max_scale": 3.0, "adaptive": true}
        });
        let stored = StoredPosition::from_json(&row);
        assert_eq!(stored.x, Some(5.0));
        assert_eq!(stored.rotation, Some(45.0));
        assert_eq!(stored.design_width, Some(600.0));
        assert_eq!(stored.adaptive, Some(true));
    }

    #[test]
    fn malformed_json_degrades_to_default_placement() {
        for bad in [json!("not an object"), json!(null), json!({"x": "five"})] {
            let stored = StoredPosition::from_json(&bad);
            let placement = calculate_design_position(Some(&stored), None, None);
            assert_eq!(placement.x, 0.0);
            assert_eq!(placement.scale, 0.85);
            assert_eq!(placement.design_width, 1200.0);
        }
    }

    #[test]
    fn malformed_constraints_blob_tolerated() {
        let stored = StoredPosition::from_columns(
            Some(1.0),
            Some(2.0),
            None,
            None,
            None,
            None,
            Some(&json!("oops")),
        );
        assert_eq!(stored.adaptive, None);
        assert_eq!(stored.x, Some(1.0));
    }

    // -- format_design_positions -------------------------------------------

    #[test]
    fn format_maps_every_row() {
        let rows = vec![
            StoredPosition {
                x: Some(10.0),
                design_width: Some(300.0),
                design_height: Some(200.0),
                ..StoredPosition::default()
            },
            StoredPosition::default(),
        ];
        let formatted = format_design_positions(&rows);
        assert_eq!(formatted.len(), 2);
        assert_eq!(formatted[0].x, 10.0);
        assert_eq!(formatted[0].design_width, 300.0);
        assert_eq!(formatted[1].scale, 0.85);
        assert_eq!(formatted[1].design_width, 1200.0);
    }
}
