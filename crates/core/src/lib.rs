//! Domain logic for the delimitation and design placement engine.
//!
//! Everything in this crate is pure computation over caller-supplied data:
//! coordinate validation and conversion, stale identifier resolution,
//! placement derivation, and viewport projection. Persistence and HTTP live
//! in `stampd-db` and `stampd-api`.

pub mod delimitation;
pub mod error;
pub mod geometry;
pub mod overlay;
pub mod placement;
pub mod resolver;
pub mod types;
