/// Command-line interface
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "loteria-caller")]
#[command(about = "Calls Loteria cards in the terminal with background music", long_about = None)]
pub struct Cli {
    /// Folder with the card images
    #[arg(short, long)]
    pub cards: Option<PathBuf>,

    /// Folder with background music
    #[arg(short, long)]
    pub music: Option<PathBuf>,

    /// Configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Time each card stays on display, in milliseconds
    #[arg(short = 'd', long)]
    pub display_ms: Option<u64>,

    /// Include subfolders when scanning
    #[arg(short, long)]
    pub recursive: bool,

    /// Present without music
    #[arg(long)]
    pub no_audio: bool,

    /// Seed for reproducible shuffles
    #[arg(long)]
    pub seed: Option<u64>,
}
