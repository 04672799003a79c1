// ============================================================================
// Activity Errors
// ============================================================================

use thiserror::Error;

use crate::store::StoreError;

/// Failure modes of the aggregation operations.
///
/// The variants are deliberately coarse: the endpoint layer maps each one to
/// exactly one HTTP outcome, so anything more granular would be unused.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// The caller-supplied identifier was rejected before any store access.
    #[error("invalid identifier: {0}")]
    InvalidArgument(String),

    /// The subject of the request does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The entity store failed. The cause is logged server-side and never
    /// echoed back to the caller.
    #[error("entity store failure")]
    Dependency(#[from] StoreError),
}

impl ActivityError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
