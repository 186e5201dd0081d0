use thiserror::Error;

/// Failure of the backing store collaborator. Missing data is never an
/// error: unknown symbols come back as empty collections. `Clone` so a
/// memoized failure can be re-surfaced from the per-request cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),
}
