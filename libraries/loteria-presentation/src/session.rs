//! Presentation session - core orchestration
//!
//! Coordinates the deck sequencer, the display countdown and the soundtrack,
//! and reports everything to the rendering collaborator.
//!
//! The session never sleeps or spawns. A driver asks it for the next wakeup
//! time, waits until then (or until a command arrives) and calls
//! [`PresentationSession::poll`].

use crate::{
    audio::AudioOutput,
    clock::{Clock, MonotonicClock},
    countdown::{Countdown, TimerState},
    deck::{DeckSequencer, Reveal},
    error::{PresentationError, Result},
    events::PresentationSink,
    soundtrack::Soundtrack,
    types::{AudioState, AudioTrack, Card, Deck, LoadStatus, PresentationConfig, TimerPhase},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// One presentation of one deck
///
/// Owns all mutable presentation state:
/// - Deck and its current shuffle (cursor, shown history)
/// - Display countdown with a single pending expiry
/// - Soundtrack with its fade schedule
/// - The rendering sink and the time source
pub struct PresentationSession<O: AudioOutput, S: PresentationSink, C: Clock = MonotonicClock> {
    config: PresentationConfig,

    // Cards
    deck: Deck,
    sequencer: DeckSequencer,

    // Timing
    countdown: Countdown,
    clock: C,

    // Audio
    soundtrack: Soundtrack<O>,

    // Collaborators
    sink: S,
    rng: StdRng,
}

impl<O: AudioOutput, S: PresentationSink> PresentationSession<O, S, MonotonicClock> {
    /// Create a session on the monotonic system clock
    pub fn new(config: PresentationConfig, output: O, sink: S) -> Self {
        Self::with_clock(config, output, sink, MonotonicClock::new())
    }
}

impl<O: AudioOutput, S: PresentationSink, C: Clock> PresentationSession<O, S, C> {
    /// Create a session on a specific clock
    pub fn with_clock(config: PresentationConfig, output: O, sink: S, clock: C) -> Self {
        let countdown = Countdown::new(config.display_duration());
        let soundtrack = Soundtrack::new(output, config.fade_in, config.fade_out);

        Self {
            config,
            deck: Deck::default(),
            sequencer: DeckSequencer::new(),
            countdown,
            clock,
            soundtrack,
            sink,
            rng: StdRng::from_entropy(),
        }
    }

    /// Make shuffles and track selection reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Loading =====

    /// Replace the deck
    ///
    /// Finishes any running presentation, reshuffles and clears the display.
    pub fn load_deck(&mut self, cards: Vec<Card>) {
        self.finish();

        self.deck = Deck::new(cards);
        if self.deck.is_empty() {
            self.sequencer.clear();
        } else {
            self.sequencer.prepare(&self.deck, &mut self.rng);
        }

        self.sink.on_reset();
        self.emit_counters();

        tracing::info!(status = %self.load_status(), "Deck loaded");
    }

    /// Replace the available soundtrack
    pub fn load_audio_tracks(&mut self, tracks: Vec<AudioTrack>) {
        self.soundtrack.set_tracks(tracks);
        tracing::info!(status = %self.load_status(), "Audio tracks loaded");
    }

    pub fn load_status(&self) -> LoadStatus {
        LoadStatus::new(self.deck.len(), self.soundtrack.tracks().len())
    }

    // ===== Commands =====

    /// Start, or resume after a pause
    ///
    /// From idle the next card is revealed at once. From paused the current
    /// card stays up for the time it had left. Already running is a no-op.
    ///
    /// The display timer is settled before the soundtrack is touched, since
    /// loading a track may block.
    pub fn start(&mut self) -> Result<()> {
        if self.sequencer.is_empty() {
            tracing::warn!("Start requested with no cards loaded");
            return Err(PresentationError::NoCardsAvailable);
        }

        let before = self.phase();

        match before {
            TimerPhase::Idle => {
                if self.sequencer.is_exhausted() {
                    tracing::info!("Start requested on an exhausted shuffle");
                    self.sink.on_exhausted();
                    return Ok(());
                }
                self.reveal_next(self.clock.now());
                self.start_soundtrack();
            }
            TimerPhase::Paused => {
                self.countdown.resume(self.clock.now());
                self.emit_phase_change(before);

                if self.soundtrack.current_track().is_none() {
                    self.start_soundtrack();
                } else {
                    let result = self.soundtrack.resume(&self.clock);
                    self.report_playback(result);
                }
            }
            // Tracks may have been loaded after the presentation started
            TimerPhase::Running => self.start_soundtrack(),
        }

        Ok(())
    }

    /// Freeze the current card and fade the soundtrack out
    ///
    /// No-op unless running.
    pub fn pause(&mut self) {
        let now = self.clock.now();
        let before = self.phase();

        if self.countdown.pause(now).is_none() {
            return;
        }

        self.soundtrack.pause(now);
        self.emit_phase_change(before);
    }

    /// Reshuffle, stop audio and clear the display
    pub fn restart(&mut self) {
        let before = self.phase();

        self.countdown.stop();
        self.soundtrack.stop();
        self.sequencer.prepare(&self.deck, &mut self.rng);

        self.sink.on_reset();
        self.emit_counters();
        self.emit_phase_change(before);

        tracing::info!(cards = self.deck.len(), "Presentation restarted");
    }

    /// Stop the countdown and the soundtrack, keeping deck progress
    pub fn finish(&mut self) {
        let before = self.phase();

        self.countdown.stop();
        self.soundtrack.stop();

        self.emit_phase_change(before);
    }

    // ===== Driving =====

    /// Run everything due now
    ///
    /// Applies due fade steps and, if the display window has ended, reveals
    /// the next card. Returns the next wakeup time.
    pub fn poll(&mut self) -> Option<Duration> {
        let now = self.clock.now();

        self.soundtrack.advance(now, self.countdown.is_paused());

        if self.countdown.take_expired(now) {
            tracing::debug!("Display window ended");
            self.reveal_next(now);
        }

        self.next_wakeup()
    }

    /// Earliest timestamp at which [`poll`](Self::poll) has work to do
    pub fn next_wakeup(&self) -> Option<Duration> {
        match (self.countdown.deadline(), self.soundtrack.next_step_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// End-of-track signal from the audio output
    pub fn on_track_ended(&mut self) {
        let result = self.soundtrack.track_ended(self.countdown.is_paused());
        self.report_playback(result);
    }

    /// Playback failure reported by the audio output after `play` returned
    ///
    /// The soundtrack goes quiet and the slideshow carries on.
    pub fn on_playback_failed(&mut self, message: &str) {
        if self.soundtrack.current_track().is_none() {
            return;
        }

        self.soundtrack.fail();
        self.report_playback(Err(PresentationError::PlaybackFailure(message.to_string())));
    }

    // ===== State Queries =====

    pub fn phase(&self) -> TimerPhase {
        self.countdown.phase()
    }

    pub fn timer_state(&self) -> TimerState {
        self.countdown.state()
    }

    /// Time left for the card on display
    pub fn remaining_time(&self) -> Option<Duration> {
        self.countdown.remaining(self.clock.now())
    }

    pub fn audio_state(&self) -> AudioState {
        self.soundtrack.state()
    }

    pub fn volume(&self) -> f32 {
        self.soundtrack.volume()
    }

    pub fn current_track(&self) -> Option<&AudioTrack> {
        self.soundtrack.current_track()
    }

    pub fn shown_count(&self) -> usize {
        self.sequencer.shown_count()
    }

    pub fn remaining_count(&self) -> usize {
        self.sequencer.remaining_count()
    }

    /// Revealed cards of the current shuffle, oldest first
    pub fn shown_history(&self) -> &[Card] {
        self.sequencer.shown_history()
    }

    /// The most recently revealed card
    pub fn current_card(&self) -> Option<&Card> {
        self.sequencer.shown_history().last()
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn output(&self) -> &O {
        self.soundtrack.output()
    }

    pub fn output_mut(&mut self) -> &mut O {
        self.soundtrack.output_mut()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ===== Internal =====

    fn reveal_next(&mut self, now: Duration) {
        let before = self.phase();

        match self.sequencer.next() {
            Reveal::Revealed(card) => {
                tracing::info!(
                    card = %card.name,
                    shown = self.sequencer.shown_count(),
                    remaining = self.sequencer.remaining_count(),
                    "Card revealed"
                );

                self.countdown.begin(now);
                self.sink.on_reveal(&card);
                self.emit_counters();
                self.emit_phase_change(before);
            }
            Reveal::Exhausted => {
                tracing::info!("All cards revealed");
                self.sink.on_exhausted();
                self.finish();
            }
        }
    }

    fn start_soundtrack(&mut self) {
        let result = self.soundtrack.start(&self.clock, &mut self.rng);
        self.report_playback(result);
    }

    fn emit_counters(&mut self) {
        let shown = self.sequencer.shown_count();
        let remaining = self.sequencer.remaining_count();
        self.sink.on_counter_change(shown, remaining);
    }

    fn emit_phase_change(&mut self, before: TimerPhase) {
        let after = self.phase();
        if after != before {
            tracing::debug!(?before, ?after, "Phase changed");
            self.sink.on_state_change(after);
        }
    }

    fn report_playback(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "Continuing without audio");
            self.sink.on_playback_failure(&e.to_string());
        }
    }
}
