//! Error types for the importer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid directory: {0}")]
    InvalidPath(String),

    #[error("Directory not found: {0}")]
    FileNotFound(String),
}
