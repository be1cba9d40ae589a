//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Wire DTOs where the stored shape differs from the API shape

pub mod delimitation;
pub mod design_position;
pub mod product_image;
