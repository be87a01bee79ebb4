use campusdocs_core::error::CoreError;

/// Failure of a repository operation that mixes domain rules with storage.
///
/// Plain CRUD methods return `sqlx::Error` directly; the load / mutate /
/// write cycle on branch documents can also fail on a domain rule.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
