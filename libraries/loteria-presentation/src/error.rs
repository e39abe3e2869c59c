//! Error types for the presentation core

use thiserror::Error;

/// Presentation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    /// Start was requested but no cards are loaded
    #[error("No cards available")]
    NoCardsAvailable,

    /// The audio engine refused to load, start or resume a track
    #[error("Playback failure: {0}")]
    PlaybackFailure(String),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for presentation operations
pub type Result<T> = std::result::Result<T, PresentationError>;
