//! Handlers for design position saves and renderable placement queries.
//!
//! Saves normalize possibly-stale vendor-product and design ids through the
//! resolver before persisting; reads run stored rows through the placement
//! calculator so the client always receives a complete record.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use stampd_core::error::CoreError;
use stampd_core::placement::{calculate_design_position, format_design_positions};
use stampd_core::resolver::{
    resolve_vendor_design_id, resolve_vendor_product_id, DesignRef, ProductRef, VendorDesignRef,
    VendorProductRef,
};
use stampd_core::types::DbId;
use stampd_db::models::design_position::SaveDesignPosition;
use stampd_db::repositories::DesignPositionRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Requests
-------------------------------------------------------------------------- */

/// Body for saving a design position.
///
/// The optional reference records and candidate lists let the caller hand
/// over whatever identifiers it holds; the resolver maps them to canonical
/// ids before the upsert. Without candidate lists the path ids are trusted
/// as-is.
#[derive(Debug, Deserialize)]
pub struct SavePositionRequest {
    #[serde(flatten)]
    pub position: SaveDesignPosition,
    pub product: Option<ProductRef>,
    pub vendor_products: Option<Vec<VendorProductRef>>,
    pub design: Option<DesignRef>,
    pub vendor_designs: Option<Vec<VendorDesignRef>>,
}

/// Optional hints for deriving design dimensions on read.
#[derive(Debug, Deserialize)]
pub struct PlacementHints {
    pub design_url: Option<String>,
    pub category: Option<String>,
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// PUT /vendor-products/{vendor_product_id}/designs/{design_id}/position
///
/// Upsert the placement for one (vendor product, design) pair. Last write
/// wins; there is no concurrency token.
pub async fn save_position(
    State(state): State<AppState>,
    Path((vendor_product_id, design_id)): Path<(DbId, DbId)>,
    Json(input): Json<SavePositionRequest>,
) -> AppResult<impl IntoResponse> {
    let vendor_product_id = match &input.vendor_products {
        Some(candidates) => {
            let submitted = input.product.clone().unwrap_or(ProductRef {
                id: Some(vendor_product_id),
                base_product_id: None,
            });
            resolve_vendor_product_id(&submitted, candidates).ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Could not resolve vendor product {vendor_product_id} against {} candidates",
                    candidates.len()
                )))
            })?
        }
        None => vendor_product_id,
    };

    let design_id = match &input.vendor_designs {
        Some(candidates) => {
            let submitted = input.design.clone().unwrap_or(DesignRef {
                id: Some(design_id),
                image_url: None,
            });
            resolve_vendor_design_id(&submitted, candidates).ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Could not resolve design {design_id} against {} candidates",
                    candidates.len()
                )))
            })?
        }
        None => design_id,
    };

    let row = DesignPositionRepo::upsert(&state.pool, vendor_product_id, design_id, &input.position)
        .await?;

    tracing::info!(
        vendor_product_id,
        design_id,
        position_id = row.id,
        "Design position saved"
    );

    Ok(Json(DataResponse {
        data: calculate_design_position(Some(&row.to_stored()), None, None),
    }))
}

/// GET /vendor-products/{vendor_product_id}/designs/{design_id}/position
///
/// Always returns a complete, renderable placement record; a missing row
/// yields the centered default, with dimensions derived from the optional
/// `design_url` / `category` hints.
pub async fn get_position(
    State(state): State<AppState>,
    Path((vendor_product_id, design_id)): Path<(DbId, DbId)>,
    Query(hints): Query<PlacementHints>,
) -> AppResult<impl IntoResponse> {
    let row = DesignPositionRepo::find_by_key(&state.pool, vendor_product_id, design_id).await?;
    let stored = row.as_ref().map(|r| r.to_stored());

    let placement = calculate_design_position(
        stored.as_ref(),
        hints.design_url.as_deref(),
        hints.category.as_deref(),
    );

    Ok(Json(DataResponse { data: placement }))
}

/// GET /vendor-products/{vendor_product_id}/positions
///
/// All stored placements on a vendor product, each completed through the
/// calculator.
pub async fn list_positions(
    State(state): State<AppState>,
    Path(vendor_product_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rows = DesignPositionRepo::list_by_vendor_product(&state.pool, vendor_product_id).await?;
    let stored: Vec<_> = rows.iter().map(|r| r.to_stored()).collect();
    Ok(Json(DataResponse {
        data: format_design_positions(&stored),
    }))
}
