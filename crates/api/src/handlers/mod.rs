//! HTTP handlers, grouped by resource.

pub mod delimitation;
pub mod overlay;
pub mod placement;
pub mod resolve;
