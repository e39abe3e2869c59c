//! Loteria Caller Media Importer
//!
//! Finds card images and soundtrack files on disk.
//!
//! # Features
//!
//! - Directory scanning (flat or recursive, optional symlink following)
//! - Case-insensitive classification by file extension
//! - Deterministic ordering (sorted by path)
//! - Card and track construction with display names
//!
//! # Architecture
//!
//! - `scanner`: Filesystem scanning and classification
//! - `types`: Media kinds and scan results

mod error;
mod types;

pub mod scanner;

pub use error::ImportError;
pub use scanner::MediaScanner;
pub use types::*;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
