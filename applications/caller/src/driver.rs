/// Event loop tying a session to the terminal and the audio thread
use crate::audio_output::AudioEvent;
use crate::command::Command;
use crate::error::Result;
use crate::render::{StatusSnapshot, TerminalRenderer};
use loteria_presentation::{AudioOutput, Clock, MonotonicClock, PresentationSession};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

/// Whether the loop keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Session type driven by the terminal application
pub type TerminalSession<O, W, C = MonotonicClock> = PresentationSession<O, TerminalRenderer<W>, C>;

/// Apply one operator command
pub fn handle_command<O, W, C>(session: &mut TerminalSession<O, W, C>, command: Command) -> Flow
where
    O: AudioOutput,
    W: Write,
    C: Clock,
{
    tracing::debug!(%command, "Command received");

    match command {
        Command::Start => {
            if let Err(e) = session.start() {
                tracing::warn!("Cannot start: {}", e);
                session.sink_mut().notice(&e.to_string());
            }
        }
        Command::Pause => session.pause(),
        Command::Restart => session.restart(),
        Command::Finish => session.finish(),
        Command::Status => {
            let snapshot = snapshot(session);
            session.sink_mut().status(&snapshot);
        }
        Command::Help => session.sink_mut().help(),
        Command::Quit => {
            session.finish();
            return Flow::Quit;
        }
    }

    Flow::Continue
}

/// Parse and apply one input line
pub fn handle_line<O, W, C>(session: &mut TerminalSession<O, W, C>, line: &str) -> Flow
where
    O: AudioOutput,
    W: Write,
    C: Clock,
{
    if line.trim().is_empty() {
        return Flow::Continue;
    }

    match line.parse::<Command>() {
        Ok(command) => handle_command(session, command),
        Err(e) => {
            session
                .sink_mut()
                .notice(&format!("{} (type `help` for the list)", e));
            Flow::Continue
        }
    }
}

/// Apply a notification from the audio thread
pub fn handle_audio_event<O, W, C>(session: &mut TerminalSession<O, W, C>, event: AudioEvent)
where
    O: AudioOutput,
    W: Write,
    C: Clock,
{
    match event {
        AudioEvent::Ended => session.on_track_ended(),
        AudioEvent::Failed(message) => session.on_playback_failed(&message),
    }
}

pub fn snapshot<O, W, C>(session: &TerminalSession<O, W, C>) -> StatusSnapshot
where
    O: AudioOutput,
    W: Write,
    C: Clock,
{
    StatusSnapshot {
        phase: session.phase(),
        shown: session.shown_count(),
        remaining: session.remaining_count(),
        time_left: session.remaining_time(),
        audio: session.audio_state(),
        track: session.current_track().map(|t| t.name.clone()),
        load: session.load_status(),
    }
}

/// Run until `quit` or end of input
///
/// Waits on three sources: operator input, notifications from the audio
/// thread, and the session's next deadline.
pub async fn run<O, W, R>(
    session: &mut TerminalSession<O, W>,
    input: R,
    mut audio_events: UnboundedReceiver<AudioEvent>,
) -> Result<()>
where
    O: AudioOutput,
    W: Write,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        let wakeup = session
            .next_wakeup()
            .map(|at| Instant::from_std(session.clock().instant_at(at)));

        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if handle_line(session, &line) == Flow::Quit {
                            break;
                        }
                    }
                    None => {
                        tracing::info!("Input closed");
                        session.finish();
                        break;
                    }
                }
            }
            Some(event) = audio_events.recv() => handle_audio_event(session, event),
            () = sleep_until(wakeup) => {
                session.poll();
            }
        }
    }

    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
