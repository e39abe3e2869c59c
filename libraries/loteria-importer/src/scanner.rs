//! File scanning for card images and soundtrack files

use crate::types::{MediaKind, MediaLibrary};
use crate::{ImportError, Result};
use loteria_presentation::{AudioTrack, Card};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scanner for media files in directories
#[derive(Debug, Clone, Default)]
pub struct MediaScanner {
    /// Whether to descend into subdirectories
    recursive: bool,

    /// Whether to follow symbolic links
    follow_links: bool,

    /// Maximum depth to traverse when recursive
    max_depth: Option<usize>,
}

impl MediaScanner {
    /// Create a scanner that only looks at the top directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether to follow symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set maximum directory depth to traverse
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Scan a directory for files of one kind
    ///
    /// # Returns
    ///
    /// Matching file paths sorted by path
    pub fn scan_directory(&self, path: &Path, kind: MediaKind) -> Result<Vec<PathBuf>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        if !path.is_dir() {
            return Err(ImportError::InvalidPath(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let depth = if self.recursive {
            self.max_depth.unwrap_or(usize::MAX)
        } else {
            1
        };
        let walker = WalkDir::new(path)
            .follow_links(self.follow_links)
            .max_depth(depth)
            .sort_by_file_name();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() && !entry.path().is_file() {
                continue;
            }

            if MediaKind::of(entry.path()) == Some(kind) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        tracing::debug!(
            directory = %path.display(),
            ?kind,
            count = files.len(),
            "Directory scanned"
        );

        Ok(files)
    }

    /// Card images in `path`, in selection order
    pub fn scan_cards(&self, path: &Path) -> Result<Vec<Card>> {
        Ok(self
            .scan_directory(path, MediaKind::Image)?
            .into_iter()
            .map(Card::from_path)
            .collect())
    }

    /// Soundtrack files in `path`, in selection order
    pub fn scan_tracks(&self, path: &Path) -> Result<Vec<AudioTrack>> {
        Ok(self
            .scan_directory(path, MediaKind::Audio)?
            .into_iter()
            .map(AudioTrack::from_path)
            .collect())
    }

    /// Cards and, if a music directory is given, tracks
    ///
    /// A music directory that cannot be scanned is logged and skipped: the
    /// presentation works without a soundtrack.
    pub fn scan_library(&self, cards_dir: &Path, music: Option<&Path>) -> Result<MediaLibrary> {
        let cards = self.scan_cards(cards_dir)?;

        let tracks = match music {
            Some(dir) => self.scan_tracks(dir).unwrap_or_else(|e| {
                tracing::warn!("Failed to scan {}: {}", dir.display(), e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        if cards.is_empty() {
            tracing::warn!(
                directory = %cards_dir.display(),
                supported = %MediaKind::Image.extensions().join(", "),
                "No card images found"
            );
        }

        let library = MediaLibrary { cards, tracks };
        tracing::info!(status = %library.load_status(), "Media scanned");
        Ok(library)
    }
}
