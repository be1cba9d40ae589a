//! Handlers for delimitation CRUD, conversion utilities, and the one-way
//! percentage migration.
//!
//! Create and update validate geometry in `stampd_core` before touching the
//! database; migration endpoints convert pixel rows to percentages and are
//! idempotent per row.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use stampd_core::delimitation::{
    convert_absolute_to_percentage, convert_percentage_to_absolute, migrate_geometry,
    validate_bounds, validate_image_reference, CoordinateType, DelimitationStats,
    MigrationOutcome,
};
use stampd_core::error::CoreError;
use stampd_core::geometry::{Rect, Size};
use stampd_core::types::DbId;
use stampd_db::models::delimitation::{
    CreateDelimitation, Delimitation, DelimitationWire, UpdateDelimitation,
};
use stampd_db::repositories::{DelimitationRepo, ProductImageRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Load a product image and require positive natural dimensions.
async fn load_image_size(pool: &stampd_db::DbPool, image_id: DbId) -> Result<Size, AppError> {
    let image = ProductImageRepo::find_by_id(pool, image_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ProductImage",
            id: image_id,
        }))?;
    validate_image_reference(image_id, image.natural_size()).map_err(AppError::Core)
}

fn into_wire(row: Delimitation) -> Result<DelimitationWire, AppError> {
    row.into_wire().map_err(AppError::Core)
}

/* --------------------------------------------------------------------------
CRUD
-------------------------------------------------------------------------- */

/// POST /product-images/{image_id}/delimitations
///
/// Create a delimitation on a product image. The image must already have
/// positive natural dimensions recorded.
pub async fn create_delimitation(
    State(state): State<AppState>,
    Path(image_id): Path<DbId>,
    Json(input): Json<CreateDelimitation>,
) -> AppResult<impl IntoResponse> {
    load_image_size(&state.pool, image_id).await?;
    validate_bounds(&input.geometry()).map_err(AppError::Core)?;

    let rotation = input.rotation.unwrap_or(0.0);
    let row = DelimitationRepo::create(
        &state.pool,
        image_id,
        input.name.as_deref(),
        &input.geometry(),
        rotation,
    )
    .await?;

    tracing::info!(
        product_image_id = image_id,
        delimitation_id = row.id,
        coordinate_type = row.coordinate_type,
        "Delimitation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: into_wire(row)?,
        }),
    ))
}

/// GET /product-images/{image_id}/delimitations
pub async fn list_delimitations(
    State(state): State<AppState>,
    Path(image_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rows = DelimitationRepo::list_by_image(&state.pool, image_id).await?;
    let wires = rows
        .into_iter()
        .map(into_wire)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: wires }))
}

/// GET /delimitations/{id}
pub async fn get_delimitation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = DelimitationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Delimitation",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: into_wire(row)?,
    }))
}

/// PATCH /delimitations/{id}
///
/// Merge the supplied fields over the stored row and re-validate the merged
/// geometry before persisting.
pub async fn update_delimitation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDelimitation>,
) -> AppResult<impl IntoResponse> {
    let existing = DelimitationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Delimitation",
            id,
        }))?;

    let merged = existing.merged_geometry(&input).map_err(AppError::Core)?;
    validate_bounds(&merged).map_err(AppError::Core)?;

    let name = existing.merged_name(&input);
    let rotation = input.rotation.unwrap_or(existing.rotation);

    let row = DelimitationRepo::update(&state.pool, id, name.as_deref(), &merged, rotation)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Delimitation",
            id,
        }))?;

    tracing::info!(delimitation_id = id, "Delimitation updated");

    Ok(Json(DataResponse {
        data: into_wire(row)?,
    }))
}

/// DELETE /delimitations/{id}
pub async fn delete_delimitation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = DelimitationRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Delimitation",
            id,
        }));
    }
    tracing::info!(delimitation_id = id, "Delimitation deleted");
    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Conversion utilities
-------------------------------------------------------------------------- */

/// Stateless conversion request: a rectangle plus the image size it is
/// relative to.
#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub image_width: f64,
    pub image_height: f64,
}

impl ConvertRequest {
    fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    fn image(&self) -> Size {
        Size {
            width: self.image_width,
            height: self.image_height,
        }
    }
}

/// POST /delimitations/convert/to-percentage
pub async fn convert_to_percentage(
    Json(input): Json<ConvertRequest>,
) -> AppResult<impl IntoResponse> {
    let rect =
        convert_absolute_to_percentage(&input.rect(), input.image()).map_err(AppError::Core)?;
    Ok(Json(DataResponse { data: rect }))
}

/// POST /delimitations/convert/to-pixel
pub async fn convert_to_pixel(Json(input): Json<ConvertRequest>) -> AppResult<impl IntoResponse> {
    let rect =
        convert_percentage_to_absolute(&input.rect(), input.image()).map_err(AppError::Core)?;
    Ok(Json(DataResponse { data: rect }))
}

/* --------------------------------------------------------------------------
Migration
-------------------------------------------------------------------------- */

/// Convert one pixel row to percentages. Already-migrated rows are returned
/// unchanged without touching the database, making the operation idempotent.
async fn migrate_row(
    pool: &stampd_db::DbPool,
    row: Delimitation,
) -> Result<Delimitation, AppError> {
    let geometry = row.geometry().map_err(AppError::Core)?;
    if geometry.coordinate_type == CoordinateType::Percentage {
        return Ok(row);
    }

    let natural = ProductImageRepo::find_by_id(pool, row.product_image_id)
        .await?
        .and_then(|image| image.natural_size());

    let migrated = migrate_geometry(&geometry, natural).map_err(AppError::Core)?;

    let id = row.id;
    DelimitationRepo::set_percentage_geometry(pool, id, &migrated.rect())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Delimitation",
            id,
        }))
}

/// POST /delimitations/{id}/migrate
pub async fn migrate_delimitation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = DelimitationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Delimitation",
            id,
        }))?;

    let migrated = migrate_row(&state.pool, row).await?;

    tracing::info!(delimitation_id = id, "Delimitation migrated to percentage");

    Ok(Json(DataResponse {
        data: into_wire(migrated)?,
    }))
}

/// POST /products/{vendor_product_id}/delimitations/migrate
///
/// Walk every delimitation under every image of every color variation of the
/// product and convert each independently. A failing row is counted and
/// skipped; the batch never aborts.
pub async fn migrate_product_delimitations(
    State(state): State<AppState>,
    Path(vendor_product_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let rows = DelimitationRepo::list_by_vendor_product(&state.pool, vendor_product_id).await?;

    let mut outcome = MigrationOutcome::default();
    for row in rows {
        let id = row.id;
        match migrate_row(&state.pool, row).await {
            Ok(_) => outcome.record_success(),
            Err(err) => {
                tracing::warn!(
                    vendor_product_id,
                    delimitation_id = id,
                    error = %err,
                    "Delimitation migration failed; continuing batch"
                );
                outcome.record_error();
            }
        }
    }

    tracing::info!(
        vendor_product_id,
        success = outcome.success,
        errors = outcome.errors,
        total = outcome.total,
        "Batch delimitation migration finished"
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /delimitations/stats
///
/// Migration rollout statistics across all delimitations.
pub async fn delimitation_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let (total, percentage) = DelimitationRepo::count_by_type(&state.pool).await?;
    Ok(Json(DataResponse {
        data: DelimitationStats::from_counts(total, percentage),
    }))
}
