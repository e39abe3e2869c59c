/// Caller configuration
use crate::cli::Cli;
use crate::error::{CallerError, Result};
use loteria_presentation::PresentationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, read when present
pub const DEFAULT_CONFIG_FILE: &str = "caller.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CallerConfig {
    #[serde(default)]
    pub presentation: PresentationConfig,

    #[serde(default)]
    pub media: MediaSettings,

    #[serde(default)]
    pub audio: AudioSettings,

    /// Fixed seed for reproducible shuffles
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MediaSettings {
    /// Folder with card images
    #[serde(default)]
    pub cards_dir: Option<PathBuf>,

    /// Folder with background music
    #[serde(default)]
    pub music_dir: Option<PathBuf>,

    /// Include subfolders
    #[serde(default)]
    pub recursive: bool,

    #[serde(default)]
    pub follow_links: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    /// Play the soundtrack
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl MediaSettings {
    /// The card folder, the one setting a presentation cannot do without
    pub fn cards_path(&self) -> Result<&Path> {
        self.cards_dir.as_deref().ok_or_else(|| {
            CallerError::Config(
                "No card folder given (use --cards or set LOTERIA__MEDIA__CARDS_DIR)".to_string(),
            )
        })
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

impl CallerConfig {
    /// Load configuration from file and environment
    ///
    /// Uses `path` when given (it must exist), otherwise `caller.toml` if
    /// present. Environment variables prefixed with `LOTERIA__` override the
    /// file, with `__` between nested keys
    /// (e.g. `LOTERIA__PRESENTATION__DISPLAY_DURATION_MS=5000`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CallerError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("LOTERIA")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Command-line flags take precedence over file and environment
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(cards) = &cli.cards {
            self.media.cards_dir = Some(cards.clone());
        }
        if let Some(music) = &cli.music {
            self.media.music_dir = Some(music.clone());
        }
        if let Some(display_ms) = cli.display_ms {
            self.presentation.display_duration_ms = display_ms;
        }
        if cli.recursive {
            self.media.recursive = true;
        }
        if cli.no_audio {
            self.audio.enabled = false;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.presentation.validate()?;
        self.media.cards_path()?;
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}
