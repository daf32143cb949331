use itam_core::error::CoreError;

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Error returned by repository calls that can fail for domain reasons as
/// well as database ones.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A domain-level error from `itam_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepoError {
    /// The wrapped domain error, if any.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            Self::Core(core) => Some(core),
            Self::Database(_) => None,
        }
    }
}

impl From<validator::ValidationErrors> for RepoError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Core(CoreError::Validation(errors.to_string()))
    }
}

/// Returns `true` if `err` is a foreign key violation on `constraint`.
pub fn is_foreign_key_violation(err: &sqlx::Error, constraint: &str) -> bool {
    violates(err, FOREIGN_KEY_VIOLATION, constraint)
}

/// Returns `true` if `err` is a unique violation on `constraint` (or unique index).
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    violates(err, UNIQUE_VIOLATION, constraint)
}

fn violates(err: &sqlx::Error, sqlstate: &str, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(sqlstate) && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
