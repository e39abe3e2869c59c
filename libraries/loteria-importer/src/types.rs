//! Common types for the importer

use loteria_presentation::{AudioTrack, Card, LoadStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Card image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

/// Soundtrack extensions
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "aac", "m4a", "webm"];

/// What a file on disk is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Card artwork
    Image,

    /// Background music
    Audio,
}

impl MediaKind {
    /// Classify a path by its extension (case-insensitive)
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Audio)
        } else {
            None
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_EXTENSIONS,
            Self::Audio => AUDIO_EXTENSIONS,
        }
    }
}

/// Cards and tracks found for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLibrary {
    /// Card images, sorted by path
    pub cards: Vec<Card>,

    /// Soundtrack files, sorted by path
    pub tracks: Vec<AudioTrack>,
}

impl MediaLibrary {
    pub fn load_status(&self) -> LoadStatus {
        LoadStatus::new(self.cards.len(), self.tracks.len())
    }
}
