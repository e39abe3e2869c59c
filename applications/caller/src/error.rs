/// Caller error types
use loteria_importer::ImportError;
use loteria_presentation::PresentationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CallerError>;

#[derive(Debug, Error)]
pub enum CallerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio output error: {0}")]
    Audio(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Presentation error: {0}")]
    Presentation(#[from] PresentationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CallerError {
    fn from(err: config::ConfigError) -> Self {
        CallerError::Config(err.to_string())
    }
}
