//! Read access to the `product_images` table.
//!
//! Rows are written by the external upload collaborator; this engine only
//! needs their natural dimensions.

use sqlx::PgPool;
use stampd_core::types::DbId;

use crate::models::product_image::ProductImage;

/// Column list for product_images queries.
const COLUMNS: &str = "id, color_variation_id, url, natural_width, natural_height, \
    created_at, updated_at";

/// Provides read operations for product images.
pub struct ProductImageRepo;

impl ProductImageRepo {
    /// Find a product image by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProductImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM product_images WHERE id = $1");
        sqlx::query_as::<_, ProductImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
