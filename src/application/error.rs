use thiserror::Error;

use crate::domain::{CategoryError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error("Keyword cannot be empty")]
    EmptyKeyword,

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
