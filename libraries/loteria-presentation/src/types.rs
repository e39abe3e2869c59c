//! Core types for card presentation

use crate::error::{PresentationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single card image
///
/// Holds the image location and the name shown next to it.
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Image file location
    pub path: PathBuf,

    /// Display name (file name without extension)
    pub name: String,
}

impl Card {
    /// Create a card with an explicit display name
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Create a card named after its file
    ///
    /// `cards/El Gallo.png` becomes "El Gallo".
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name }
    }
}

/// Background music track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioTrack {
    /// Audio file location
    pub path: PathBuf,

    /// Display name (file name without extension)
    pub name: String,
}

impl AudioTrack {
    /// Create a track named after its file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name }
    }
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The full set of cards for a session, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FromIterator<Card> for Deck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Timer phase, without timestamps
///
/// Reported to collaborators so they can enable or disable commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerPhase {
    /// Nothing scheduled
    Idle,

    /// A card is on display and its countdown is running
    Running,

    /// Countdown frozen with time left on the current card
    Paused,
}

/// Soundtrack state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioState {
    /// No track loaded
    Stopped,

    /// Volume ramping up
    FadingIn,

    /// Playing at the reached volume
    Playing,

    /// Volume ramping down before a pause
    FadingOut,

    /// Halted, position retained
    Paused,
}

/// What the session has loaded so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadStatus {
    /// Neither cards nor music
    Empty,

    /// Cards without music (music is optional)
    CardsOnly { cards: usize },

    /// Music without cards
    MusicOnly { tracks: usize },

    /// Cards and music
    Ready { cards: usize, tracks: usize },
}

impl LoadStatus {
    pub fn new(cards: usize, tracks: usize) -> Self {
        match (cards, tracks) {
            (0, 0) => Self::Empty,
            (0, tracks) => Self::MusicOnly { tracks },
            (cards, 0) => Self::CardsOnly { cards },
            (cards, tracks) => Self::Ready { cards, tracks },
        }
    }

    /// Whether presentation controls should be enabled
    pub fn controls_enabled(&self) -> bool {
        matches!(self, Self::CardsOnly { .. } | Self::Ready { .. })
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Select the card images and music folders"),
            Self::CardsOnly { cards } => {
                write!(f, "{cards} cards loaded. Select a music folder (optional)")
            }
            Self::MusicOnly { tracks } => {
                write!(f, "{tracks} tracks loaded. Select the card images folder")
            }
            Self::Ready { cards, tracks } => write!(f, "{cards} cards and {tracks} tracks loaded"),
        }
    }
}

/// Linear volume ramp settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeSettings {
    /// Total ramp duration in milliseconds
    pub duration_ms: u64,

    /// Number of equal steps in the ramp
    pub steps: u32,
}

impl FadeSettings {
    pub const fn new(duration_ms: u64, steps: u32) -> Self {
        Self { duration_ms, steps }
    }

    /// Time between two steps
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.duration_ms) / self.steps.max(1)
    }
}

/// Configuration for a presentation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// How long each card stays on display (default: 8000 ms)
    #[serde(default = "default_display_duration_ms")]
    pub display_duration_ms: u64,

    /// Soundtrack fade-in on start and resume (default: 1000 ms / 20 steps)
    #[serde(default = "default_fade_in")]
    pub fade_in: FadeSettings,

    /// Soundtrack fade-out on pause (default: 500 ms / 10 steps)
    #[serde(default = "default_fade_out")]
    pub fade_out: FadeSettings,

    /// Reveals kept visible by renderers (default: 15)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

impl PresentationConfig {
    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_duration_ms)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.display_duration_ms == 0 {
            return Err(PresentationError::InvalidConfig(
                "display duration must be greater than zero".to_string(),
            ));
        }

        for (label, fade) in [("fade-in", &self.fade_in), ("fade-out", &self.fade_out)] {
            if fade.steps == 0 {
                return Err(PresentationError::InvalidConfig(format!(
                    "{label} needs at least one step"
                )));
            }
        }

        if self.history_depth == 0 {
            return Err(PresentationError::InvalidConfig(
                "history depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_display_duration_ms() -> u64 {
    8000
}

fn default_fade_in() -> FadeSettings {
    FadeSettings::new(1000, 20)
}

fn default_fade_out() -> FadeSettings {
    FadeSettings::new(500, 10)
}

fn default_history_depth() -> usize {
    15
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            display_duration_ms: default_display_duration_ms(),
            fade_in: default_fade_in(),
            fade_out: default_fade_out(),
            history_depth: default_history_depth(),
        }
    }
}
