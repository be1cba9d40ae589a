//! Repository for the `delimitations` table.

use sqlx::PgPool;
use stampd_core::delimitation::{CoordinateType, DelimitationGeometry};
use stampd_core::geometry::Rect;
use stampd_core::types::DbId;

use crate::models::delimitation::Delimitation;

/// Column list for delimitations queries.
const COLUMNS: &str = "id, product_image_id, name, coordinate_type, x, y, width, height, \
    rotation, reference_width, reference_height, created_at, updated_at";

/// Provides CRUD and migration operations for delimitations.
pub struct DelimitationRepo;

impl DelimitationRepo {
    /// Insert a validated delimitation, returning the created row.
    ///
    /// `geometry.coordinate_type` is stored via its db tag (pixel rows keep
    /// the legacy `ABSOLUTE` tag).
    pub async fn create(
        pool: &PgPool,
        product_image_id: DbId,
        name: Option<&str>,
        geometry: &DelimitationGeometry,
        rotation: f64,
    ) -> Result<Delimitation, sqlx::Error> {
        let query = format!(
            "INSERT INTO delimitations
                (product_image_id, name, coordinate_type, x, y, width, height, rotation,
                 reference_width, reference_height)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Delimitation>(&query)
            .bind(product_image_id)
            .bind(name)
            .bind(geometry.coordinate_type.as_db_str())
            .bind(geometry.x)
            .bind(geometry.y)
            .bind(geometry.width)
            .bind(geometry.height)
            .bind(rotation)
            .bind(geometry.reference_width)
            .bind(geometry.reference_height)
            .fetch_one(pool)
            .await
    }

    /// Find a delimitation by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Delimitation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM delimitations WHERE id = $1");
        sqlx::query_as::<_, Delimitation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all delimitations on a product image, oldest first.
    pub async fn list_by_image(
        pool: &PgPool,
        product_image_id: DbId,
    ) -> Result<Vec<Delimitation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM delimitations
             WHERE product_image_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Delimitation>(&query)
            .bind(product_image_id)
            .fetch_all(pool)
            .await
    }

    /// List every delimitation under every image of every color variation of
    /// a vendor product. Used by batch migration.
    pub async fn list_by_vendor_product(
        pool: &PgPool,
        vendor_product_id: DbId,
    ) -> Result<Vec<Delimitation>, sqlx::Error> {
        let query = format!(
            "SELECT d.{} FROM delimitations d
             JOIN product_images pi ON pi.id = d.product_image_id
             JOIN color_variations cv ON cv.id = pi.color_variation_id
             WHERE cv.vendor_product_id = $1
             ORDER BY d.id ASC",
            COLUMNS.replace(", ", ", d.")
        );
        sqlx::query_as::<_, Delimitation>(&query)
            .bind(vendor_product_id)
            .fetch_all(pool)
            .await
    }

    /// Persist a merged, re-validated update. Returns the updated row, or
    /// `None` for an unknown id.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        name: Option<&str>,
        geometry: &DelimitationGeometry,
        rotation: f64,
    ) -> Result<Option<Delimitation>, sqlx::Error> {
        let query = format!(
            "UPDATE delimitations SET
                name = $1, x = $2, y = $3, width = $4, height = $5, rotation = $6,
                reference_width = $7, reference_height = $8, updated_at = now()
             WHERE id = $9
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Delimitation>(&query)
            .bind(name)
            .bind(geometry.x)
            .bind(geometry.y)
            .bind(geometry.width)
            .bind(geometry.height)
            .bind(rotation)
            .bind(geometry.reference_width)
            .bind(geometry.reference_height)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Rewrite a row's geometry as percentages, completing its one-way
    /// migration. Reference dimensions are kept as a historical record.
    pub async fn set_percentage_geometry(
        pool: &PgPool,
        id: DbId,
        rect: &Rect,
    ) -> Result<Option<Delimitation>, sqlx::Error> {
        let query = format!(
            "UPDATE delimitations SET
                coordinate_type = $1, x = $2, y = $3, width = $4, height = $5,
                updated_at = now()
             WHERE id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Delimitation>(&query)
            .bind(CoordinateType::Percentage.as_db_str())
            .bind(rect.x)
            .bind(rect.y)
            .bind(rect.width)
            .bind(rect.height)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a delimitation by its ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM delimitations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total row count and already-migrated (percentage) count.
    pub async fn count_by_type(pool: &PgPool) -> Result<(i64, i64), sqlx::Error> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE coordinate_type = 'PERCENTAGE')
             FROM delimitations",
        )
        .fetch_one(pool)
        .await?;
        Ok(row)
    }
}
