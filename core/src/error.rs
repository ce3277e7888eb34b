use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Catalog has {available} symbols but the hardest difficulty needs {required}")]
    CatalogTooSmall { available: usize, required: usize },
    #[error("Catalog symbol at position {index} is listed twice")]
    DuplicateToken { index: usize },
}

pub type Result<T> = core::result::Result<T, GameError>;
