use crate::types::DbId;

/// Domain error taxonomy shared by every layer.
///
/// `Conflict` and `Validation` are caller-visible business facts and are
/// never retried; `DataAccess` is the only kind where a retry can make
/// sense.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Data access failed: {0}")]
    DataAccess(String),
}
