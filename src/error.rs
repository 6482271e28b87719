use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

/// What can go wrong inside the matching and plagiarism engines.
///
/// Failed URL fetches are deliberately absent: the checker degrades those
/// to comparing the raw link instead of surfacing them, so a
/// `fetch::FetchError` never crosses this boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// The request is missing a required field or carries an unusable one.
    #[error("{0}")]
    Validation(String),

    /// The referenced record does not exist or has no content to work on.
    #[error("{0}")]
    NotFound(String),

    /// The store failed; any batched write was rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    /// HTTP status the API layer answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            Error::Store(_) => 500,
        }
    }
}
