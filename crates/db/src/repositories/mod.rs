//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod delimitation_repo;
pub mod design_position_repo;
pub mod product_image_repo;

pub use delimitation_repo::DelimitationRepo;
pub use design_position_repo::DesignPositionRepo;
pub use product_image_repo::ProductImageRepo;
