use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised by the access core.
///
/// Lack of visibility is never an error: searches return empty pages instead.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Malformed page, query or sort key supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced record does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Data-store failure, propagated unchanged
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl AccessError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type AccessResult<T> = Result<T, AccessError>;
