use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A write was attempted against a row that is already soft-deleted.
    #[error("Unauthorized: {entity} with id {id} is deleted, you can not do that")]
    AlreadyDeleted { entity: &'static str, id: DbId },

    /// A child row points at a parent that does not exist.
    #[error("Referential mismatch: {0}")]
    ReferentialMismatch(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status a caller should surface for this error.
    ///
    /// `AlreadyDeleted` is reported as an authorization failure (401).
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::AlreadyDeleted { .. } => 401,
            Self::ReferentialMismatch(_) => 422,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Whether repeating the same call could succeed. Only internal errors qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_deleted_maps_to_unauthorized() {
        let err = CoreError::AlreadyDeleted {
            entity: "part_record",
            id: 7,
        };
        assert_eq!(err.status_code(), 401);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("part_record with id 7"));
    }

    #[test]
    fn referential_mismatch_is_not_retryable() {
        let err = CoreError::ReferentialMismatch("log 3 does not exist".into());
        assert!(!err.is_retryable());
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn internal_is_retryable() {
        assert!(CoreError::Internal("pool timeout".into()).is_retryable());
    }
}
