/// Terminal renderer for a presentation
use crate::command::Command;
use loteria_presentation::{
    AudioState, Card, LoadStatus, PresentationSink, RevealHistory, TimerPhase,
};
use std::io::Write;
use std::time::Duration;

/// Point-in-time view of a session for the `status` command
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub phase: TimerPhase,
    pub shown: usize,
    pub remaining: usize,
    pub time_left: Option<Duration>,
    pub audio: AudioState,
    pub track: Option<String>,
    pub load: LoadStatus,
}

/// Writes reveals, counters and the recent-cards window to a terminal
pub struct TerminalRenderer<W: Write> {
    out: W,
    history: RevealHistory<Card>,
    shown: usize,
    remaining: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, history_depth: usize) -> Self {
        Self {
            out,
            history: RevealHistory::new(history_depth),
            shown: 0,
            remaining: 0,
        }
    }

    pub fn history(&self) -> &RevealHistory<Card> {
        &self.history
    }

    pub fn counters(&self) -> (usize, usize) {
        (self.shown, self.remaining)
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Load summary shown at startup
    pub fn banner(&mut self, status: &LoadStatus) {
        self.line(&format!("Loteria Caller - {}", status));
        if status.controls_enabled() {
            self.line("Type `start` (or `s`) to begin, `help` for all commands.");
        }
    }

    pub fn help(&mut self) {
        for command in Command::ALL {
            let name = match command.alias() {
                Some(alias) => format!("{command} | {alias}"),
                None => command.to_string(),
            };
            self.line(&format!("  {:<12} {}", name, command.description()));
        }
    }

    pub fn status(&mut self, snapshot: &StatusSnapshot) {
        let timer = match (snapshot.phase, snapshot.time_left) {
            (TimerPhase::Running, Some(left)) => format!("running, {:.1}s left", left.as_secs_f32()),
            (TimerPhase::Paused, Some(left)) => format!("paused, {:.1}s left", left.as_secs_f32()),
            (phase, _) => format!("{phase:?}").to_lowercase(),
        };
        let audio = match &snapshot.track {
            Some(track) => format!("{:?} ({})", snapshot.audio, track),
            None => "no music".to_string(),
        };

        self.line(&format!(
            "Shown: {} | Remaining: {} | Timer: {} | Audio: {}",
            snapshot.shown, snapshot.remaining, timer, audio
        ));
        self.line(&snapshot.load.to_string());
    }

    /// One-off message for the operator
    pub fn notice(&mut self, message: &str) {
        self.line(&format!("! {}", message));
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|()| self.out.flush()) {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> PresentationSink for TerminalRenderer<W> {
    fn on_reveal(&mut self, card: &Card) {
        self.history.push(card.clone());

        self.line("");
        self.line(&format!(">>> {} <<<", card.name.to_uppercase()));

        let previous: Vec<&str> = self
            .history
            .iter()
            .skip(1)
            .map(|c| c.name.as_str())
            .collect();
        if !previous.is_empty() {
            self.line(&format!("Before: {}", previous.join(", ")));
        }
    }

    fn on_exhausted(&mut self) {
        self.line("All cards have been shown!");
    }

    fn on_counter_change(&mut self, shown: usize, remaining: usize) {
        self.shown = shown;
        self.remaining = remaining;
        self.line(&format!("Shown: {} | Remaining: {}", shown, remaining));
    }

    fn on_reset(&mut self) {
        self.history.clear();
        self.line("--- Board cleared, deck shuffled ---");
    }

    fn on_state_change(&mut self, phase: TimerPhase) {
        let label = match phase {
            TimerPhase::Idle => "Stopped",
            TimerPhase::Running => "Running",
            TimerPhase::Paused => "Paused",
        };
        self.line(&format!("[{}]", label));
    }

    fn on_playback_failure(&mut self, message: &str) {
        self.notice(&format!("Music unavailable ({}), continuing without it", message));
    }
}
