use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("credential rejected by upstream service")]
    Unauthorized,
    /// A filter value the store cannot interpret for the column's type.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unexpected upstream error: {0}")]
    Unexpected(String),
}

impl RepositoryError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
