//! Repository for the `design_positions` table.

use sqlx::PgPool;
use stampd_core::types::DbId;

use crate::models::design_position::{DesignPosition, SaveDesignPosition};

/// Column list for design_positions queries.
const COLUMNS: &str = "id, vendor_product_id, design_id, x, y, scale, rotation, \
    constraints, design_width, design_height, updated_at";

/// Provides upsert and read operations for design positions.
pub struct DesignPositionRepo;

impl DesignPositionRepo {
    /// Upsert the position for one `(vendor_product_id, design_id)` pair.
    ///
    /// Last write wins: there is no version or timestamp precondition, so two
    /// concurrent saves race and the later one silently replaces the earlier.
    /// Accepted limitation of the placement data model.
    pub async fn upsert(
        pool: &PgPool,
        vendor_product_id: DbId,
        design_id: DbId,
        input: &SaveDesignPosition,
    ) -> Result<DesignPosition, sqlx::Error> {
        let query = format!(
            "INSERT INTO design_positions
                (vendor_product_id, design_id, x, y, scale, rotation, constraints,
                 design_width, design_height)
             VALUES ($1, $2, COALESCE($3, 0), COALESCE($4, 0), COALESCE($5, 0.85),
                     COALESCE($6, 0), $7, $8, $9)
             ON CONFLICT ON CONSTRAINT uq_design_positions_vendor_product_design
             DO UPDATE SET
                x = COALESCE($3, design_positions.x),
                y = COALESCE($4, design_positions.y),
                scale = COALESCE($5, design_positions.scale),
                rotation = COALESCE($6, design_positions.rotation),
                constraints = COALESCE($7, design_positions.constraints),
                design_width = COALESCE($8, design_positions.design_width),
                design_height = COALESCE($9, design_positions.design_height),
                updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DesignPosition>(&query)
            .bind(vendor_product_id)
            .bind(design_id)
            .bind(input.x)
            .bind(input.y)
            .bind(input.scale)
            .bind(input.rotation)
            .bind(&input.constraints)
            .bind(input.design_width)
            .bind(input.design_height)
            .fetch_one(pool)
            .await
    }

    /// Find the position for one `(vendor_product_id, design_id)` pair.
    pub async fn find_by_key(
        pool: &PgPool,
        vendor_product_id: DbId,
        design_id: DbId,
    ) -> Result<Option<DesignPosition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM design_positions
             WHERE vendor_product_id = $1 AND design_id = $2"
        );
        sqlx::query_as::<_, DesignPosition>(&query)
            .bind(vendor_product_id)
            .bind(design_id)
            .fetch_optional(pool)
            .await
    }

    /// List all stored positions on a vendor product.
    pub async fn list_by_vendor_product(
        pool: &PgPool,
        vendor_product_id: DbId,
    ) -> Result<Vec<DesignPosition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM design_positions
             WHERE vendor_product_id = $1
             ORDER BY design_id ASC"
        );
        sqlx::query_as::<_, DesignPosition>(&query)
            .bind(vendor_product_id)
            .fetch_all(pool)
            .await
    }
}
