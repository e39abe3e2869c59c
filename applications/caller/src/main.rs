/// Loteria Caller - card presentation with background music
use clap::Parser;
use loteria_caller::{
    audio_output::CpalOutput, cli::Cli, config::CallerConfig, driver, render::TerminalRenderer,
};
use loteria_importer::MediaScanner;
use loteria_presentation::{AudioOutput, PresentationSession, SilentOutput};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, the presentation owns stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loteria_caller=info,loteria_presentation=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = CallerConfig::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    config.validate()?;

    // Discover media
    let scanner = MediaScanner::new()
        .recursive(config.media.recursive)
        .follow_links(config.media.follow_links);
    let library = scanner.scan_library(
        config.media.cards_path()?,
        config.media.music_dir.as_deref(),
    )?;

    // Audio output, silent when disabled or unavailable
    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let output: Box<dyn AudioOutput> = if config.audio.enabled {
        match CpalOutput::new(events_tx.clone()) {
            Ok(output) => Box::new(output),
            Err(e) => {
                tracing::warn!("Audio unavailable, presenting without music: {}", e);
                Box::new(SilentOutput)
            }
        }
    } else {
        tracing::info!("Audio disabled");
        Box::new(SilentOutput)
    };

    // Build session
    let renderer = TerminalRenderer::new(std::io::stdout(), config.presentation.history_depth);
    let mut session = PresentationSession::new(config.presentation.clone(), output, renderer);
    if let Some(seed) = config.seed {
        session = session.with_seed(seed);
    }

    session.load_deck(library.cards);
    session.load_audio_tracks(library.tracks);

    let status = session.load_status();
    session.sink_mut().banner(&status);

    let stdin = BufReader::new(tokio::io::stdin());
    driver::run(&mut session, stdin, events_rx).await?;

    // Keep the sender alive until the loop ends
    drop(events_tx);
    tracing::info!("Goodbye");

    Ok(())
}
