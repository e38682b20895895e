use service_core::error::AppError;
use thiserror::Error;

/// Outcome of a failed snippet operation, before it is mapped to HTTP.
#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("{0}")]
    Validation(String),

    #[error("Snippet not found")]
    NotFound,

    #[error("Cast to ObjectId failed for value \"{0}\" at path \"_id\" for model \"Snippet\"")]
    InvalidId(String),

    #[error("{0}")]
    Storage(#[from] anyhow::Error),
}

impl From<mongodb::error::Error> for SnippetError {
    fn from(err: mongodb::error::Error) -> Self {
        SnippetError::Storage(anyhow::Error::new(err))
    }
}

impl SnippetError {
    pub fn label(&self) -> &'static str {
        match self {
            SnippetError::Validation(_) => "validation_error",
            SnippetError::NotFound => "not_found",
            SnippetError::InvalidId(_) => "invalid_id",
            SnippetError::Storage(_) => "storage_error",
        }
    }

    /// Maps to an HTTP error. `NotFound` carries the endpoint's own message,
    /// validation is always a client error, and anything else goes through
    /// `fallback`.
    pub fn into_app_error(
        self,
        not_found_message: &str,
        fallback: fn(anyhow::Error) -> AppError,
    ) -> AppError {
        match self {
            SnippetError::NotFound => {
                AppError::NotFound(anyhow::Error::msg(not_found_message.to_string()))
            }
            SnippetError::Validation(_) => AppError::BadRequest(anyhow::Error::new(self)),
            other => fallback(anyhow::Error::new(other)),
        }
    }
}
