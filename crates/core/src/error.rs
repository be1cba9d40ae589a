use crate::types::DbId;

/// Domain-level error type shared by all core modules.
///
/// Validation errors carry one aggregated, user-facing message enumerating
/// every violated rule, so a client can fix a bad payload in one round trip.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed validation. The message lists all violated rules.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}
