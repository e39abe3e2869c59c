//! End-to-end tests for PresentationSession
//!
//! Drives a full session on a manual clock:
//! - Reveal cadence and exhaustion
//! - Pause/resume keeping the display budget
//! - Restart and finish semantics
//! - Soundtrack fades through the session
//! - Non-fatal playback failures

use loteria_presentation::{
    AudioOutput, AudioState, AudioTrack, Card, Clock, ManualClock, PresentationConfig,
    PresentationError, PresentationEvent, PresentationSession, Result, TimerPhase, TimerState,
};
use std::time::Duration;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// Audio output recording every command
#[derive(Debug, Default)]
struct MockOutput {
    loaded: Option<AudioTrack>,
    playing: bool,
    looping: bool,
    volume: f32,
    rewinds: usize,
    play_calls: usize,
    pause_calls: usize,
    load_calls: usize,
    /// Simulate a device refusing to play
    fail_play: bool,
    /// Simulate a slow decode by advancing the clock during `load`
    slow_load: Option<(ManualClock, Duration)>,
}

impl AudioOutput for MockOutput {
    fn load(&mut self, track: &AudioTrack) -> Result<()> {
        self.load_calls += 1;
        if let Some((clock, delay)) = &self.slow_load {
            clock.advance(*delay);
        }
        self.loaded = Some(track.clone());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.play_calls += 1;
        if self.fail_play {
            return Err(PresentationError::PlaybackFailure(
                "autoplay blocked".to_string(),
            ));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.playing = false;
    }

    fn rewind(&mut self) {
        self.rewinds += 1;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}

type Session = PresentationSession<MockOutput, Vec<PresentationEvent>, ManualClock>;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn cards(names: &[&str]) -> Vec<Card> {
    names
        .iter()
        .map(|n| Card::from_path(format!("/cards/{}.png", n)))
        .collect()
}

fn tracks(names: &[&str]) -> Vec<AudioTrack> {
    names
        .iter()
        .map(|n| AudioTrack::from_path(format!("/music/{}.mp3", n)))
        .collect()
}

fn create_session(names: &[&str]) -> (Session, ManualClock) {
    let clock = ManualClock::new();
    let mut session = PresentationSession::with_clock(
        PresentationConfig::default(),
        MockOutput::default(),
        Vec::new(),
        clock.clone(),
    )
    .with_seed(42);
    session.load_deck(cards(names));
    session.sink_mut().clear();
    (session, clock)
}

fn revealed_names(events: &[PresentationEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            PresentationEvent::Revealed { card } => Some(card.name.clone()),
            _ => None,
        })
        .collect()
}

fn last_counters(events: &[PresentationEvent]) -> Option<(usize, usize)> {
    events.iter().rev().find_map(|e| match e {
        PresentationEvent::CountersChanged { shown, remaining } => Some((*shown, *remaining)),
        _ => None,
    })
}

// ============================================================================
// Reveal Cadence
// ============================================================================

#[test]
fn three_card_presentation_with_pause() {
    let (mut session, clock) = create_session(&["A", "B", "C"]);

    // t=0: first card at once
    session.start().unwrap();
    assert_eq!(last_counters(session.sink()), Some((1, 2)));

    // t=3000: pause with 5000 left
    clock.set(ms(3000));
    session.pause();
    assert_eq!(
        session.timer_state(),
        TimerState::Paused {
            remaining: ms(5000)
        }
    );

    // Time passes while paused, nothing happens
    clock.set(ms(10_000));
    session.poll();
    assert_eq!(session.shown_count(), 1);

    // t=10000: resume, second card due at 15000
    session.start().unwrap();
    assert_eq!(session.next_wakeup(), Some(ms(15_000)));

    clock.set(ms(14_999));
    session.poll();
    assert_eq!(session.shown_count(), 1);

    clock.set(ms(15_000));
    session.poll();
    assert_eq!(last_counters(session.sink()), Some((2, 1)));

    // t=23000: third card
    clock.set(ms(23_000));
    session.poll();
    assert_eq!(last_counters(session.sink()), Some((3, 0)));

    // t=31000: exhausted and finished
    clock.set(ms(31_000));
    session.poll();
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert!(session.sink().contains(&PresentationEvent::Exhausted));
    assert!(session.next_wakeup().is_none());

    let mut names = revealed_names(session.sink());
    names.sort();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn reveal_order_matches_shuffle() {
    let (mut session, clock) = create_session(&["1", "2", "3", "4", "5", "6"]);
    session.start().unwrap();

    for i in 1..6u64 {
        clock.set(ms(i * 8000));
        session.poll();
    }

    let names = revealed_names(session.sink());
    let history: Vec<String> = session
        .shown_history()
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(names, history);
    assert_eq!(session.current_card().map(|c| c.name.clone()), names.last().cloned());
}

#[test]
fn each_reveal_gets_full_window() {
    let (mut session, clock) = create_session(&["A", "B", "C"]);
    session.start().unwrap();

    // Poll late, the next window starts when the card is revealed
    clock.set(ms(9000));
    session.poll();
    assert_eq!(session.shown_count(), 2);
    assert_eq!(session.next_wakeup(), Some(ms(17_000)));
    assert_eq!(session.remaining_time(), Some(ms(8000)));
}

#[test]
fn exhaustion_stops_soundtrack() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.start().unwrap();
    clock.set(ms(1000));
    session.poll();
    assert_eq!(session.audio_state(), AudioState::Playing);

    clock.set(ms(8000));
    session.poll();
    clock.set(ms(16_000));
    session.poll();

    assert!(session.sink().contains(&PresentationEvent::Exhausted));
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert_eq!(session.audio_state(), AudioState::Stopped);
    assert!(!session.output().playing);
    assert!(session.current_track().is_none());
    assert!(session.next_wakeup().is_none());
}

#[test]
fn start_on_exhausted_shuffle_reports_exhaustion_again() {
    let (mut session, clock) = create_session(&["Only"]);
    session.start().unwrap();

    clock.set(ms(8000));
    session.poll();
    assert_eq!(session.phase(), TimerPhase::Idle);

    // Start again on an exhausted shuffle: reveal attempt reports exhaustion
    session.start().unwrap();
    let exhausted = session
        .sink()
        .iter()
        .filter(|e| **e == PresentationEvent::Exhausted)
        .count();
    assert_eq!(exhausted, 2);
    assert_eq!(session.shown_count(), 1);
    assert_eq!(session.phase(), TimerPhase::Idle);
}

#[test]
fn start_on_exhausted_shuffle_leaves_soundtrack_alone() {
    let (mut session, clock) = create_session(&["Only"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.start().unwrap();
    clock.set(ms(8000));
    session.poll();
    assert_eq!(session.output().load_calls, 1);
    assert_eq!(session.output().play_calls, 1);

    session.start().unwrap();
    assert_eq!(session.output().load_calls, 1);
    assert_eq!(session.output().play_calls, 1);
    assert!(!session.output().playing);
    assert_eq!(session.audio_state(), AudioState::Stopped);
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn start_without_cards_reports_error() {
    let (mut session, _clock) = create_session(&[]);
    assert_eq!(session.start(), Err(PresentationError::NoCardsAvailable));
    assert!(revealed_names(session.sink()).is_empty());
}

#[test]
fn double_start_and_double_pause_are_noops() {
    let (mut session, clock) = create_session(&["A", "B", "C"]);
    session.start().unwrap();
    session.start().unwrap();
    assert_eq!(session.shown_count(), 1);

    clock.set(ms(2000));
    session.pause();
    clock.set(ms(4000));
    session.pause();
    assert_eq!(
        session.timer_state(),
        TimerState::Paused {
            remaining: ms(6000)
        }
    );
}

#[test]
fn restart_reshuffles_and_resets_counters() {
    let (mut session, clock) = create_session(&["A", "B", "C", "D"]);
    session.start().unwrap();
    clock.set(ms(8000));
    session.poll();
    assert_eq!(session.shown_count(), 2);

    session.restart();
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert_eq!(session.shown_count(), 0);
    assert_eq!(session.remaining_count(), 4);
    assert!(session.shown_history().is_empty());
    assert!(session.next_wakeup().is_none());

    let events = session.sink();
    let reset_at = events
        .iter()
        .rposition(|e| *e == PresentationEvent::Reset)
        .unwrap();
    assert_eq!(
        events[reset_at + 1],
        PresentationEvent::CountersChanged {
            shown: 0,
            remaining: 4
        }
    );
}

#[test]
fn restart_while_paused_clears_pause() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.start().unwrap();
    clock.set(ms(1000));
    session.pause();

    session.restart();
    assert_eq!(session.timer_state(), TimerState::Idle);

    // Start after restart reveals a fresh card
    session.start().unwrap();
    assert_eq!(session.shown_count(), 1);
    assert_eq!(session.next_wakeup(), Some(ms(9000)));
}

#[test]
fn finish_keeps_cursor() {
    let (mut session, clock) = create_session(&["A", "B", "C", "D"]);
    session.start().unwrap();
    clock.set(ms(8000));
    session.poll();

    session.finish();
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert_eq!(session.shown_count(), 2);
    assert!(session.next_wakeup().is_none());

    // Finish twice is harmless
    session.finish();

    // Start continues the same shuffle
    clock.set(ms(20_000));
    session.start().unwrap();
    assert_eq!(session.shown_count(), 3);
}

#[test]
fn finish_stops_soundtrack_from_running_and_paused() {
    let (mut session, clock) = create_session(&["A", "B", "C", "D"]);
    session.load_audio_tracks(tracks(&["uno"]));

    // Running
    session.start().unwrap();
    clock.set(ms(1000));
    session.poll();
    assert!(session.output().playing);

    session.finish();
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert_eq!(session.audio_state(), AudioState::Stopped);
    assert!(!session.output().playing);
    assert_eq!(session.shown_count(), 1);

    // Paused
    clock.set(ms(2000));
    session.start().unwrap();
    assert_eq!(session.shown_count(), 2);
    assert!(session.output().playing);
    clock.set(ms(3000));
    session.pause();

    session.finish();
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert_eq!(session.audio_state(), AudioState::Stopped);
    assert!(!session.output().playing);
    assert!(session.next_wakeup().is_none());
    assert_eq!(session.shown_count(), 2);
    assert_eq!(session.remaining_count(), 2);
}

#[test]
fn phase_changes_are_reported() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.start().unwrap();
    clock.set(ms(1000));
    session.pause();
    session.start().unwrap();
    session.finish();

    let phases: Vec<TimerPhase> = session
        .sink()
        .iter()
        .filter_map(|e| match e {
            PresentationEvent::PhaseChanged { phase } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![
            TimerPhase::Running,
            TimerPhase::Paused,
            TimerPhase::Running,
            TimerPhase::Idle
        ]
    );
}

#[test]
fn loading_deck_finishes_and_resets() {
    let (mut session, _clock) = create_session(&["A", "B"]);
    session.start().unwrap();

    session.load_deck(cards(&["X", "Y", "Z"]));
    assert_eq!(session.phase(), TimerPhase::Idle);
    assert_eq!(session.remaining_count(), 3);
    assert_eq!(last_counters(session.sink()), Some((0, 3)));
    assert!(session.sink().contains(&PresentationEvent::Reset));
}

// ============================================================================
// Soundtrack
// ============================================================================

#[test]
fn start_fades_in_soundtrack() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno", "dos"]));
    session.start().unwrap();

    assert!(session.output().playing);
    assert!(session.output().looping);
    assert_eq!(session.output().loaded.as_ref(), session.current_track());
    assert_eq!(session.audio_state(), AudioState::FadingIn);
    assert_eq!(session.next_wakeup(), Some(ms(50)));

    clock.set(ms(999));
    session.poll();
    assert!((session.volume() - 0.95).abs() < 1e-6);

    clock.set(ms(1000));
    session.poll();
    assert_eq!(session.audio_state(), AudioState::Playing);
    assert_eq!(session.output().volume, 1.0);
    assert_eq!(session.next_wakeup(), Some(ms(8000)));
}

#[test]
fn slow_track_load_keeps_window_and_fade_intact() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.output_mut().slow_load = Some((clock.clone(), ms(2000)));

    session.start().unwrap();

    // The card went up before the load, at t=0
    assert_eq!(clock.now(), ms(2000));
    assert_eq!(session.remaining_time(), Some(ms(6000)));
    assert_eq!(
        session.timer_state(),
        TimerState::Running {
            started_at: ms(0),
            duration: ms(8000),
        }
    );
    assert_eq!(session.next_wakeup(), Some(ms(2050)));

    // The fade starts once playback has begun, not at reveal time
    session.poll();
    assert_eq!(session.audio_state(), AudioState::FadingIn);
    assert_eq!(session.volume(), 0.0);

    clock.set(ms(2500));
    session.poll();
    assert!((session.volume() - 0.5).abs() < 1e-6);

    clock.set(ms(3000));
    session.poll();
    assert_eq!(session.audio_state(), AudioState::Playing);
    assert_eq!(session.shown_count(), 1);

    clock.set(ms(8000));
    session.poll();
    assert_eq!(session.shown_count(), 2);
}

#[test]
fn pause_fades_out_then_halts_audio() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.start().unwrap();
    clock.set(ms(1000));
    session.poll();

    clock.set(ms(2000));
    session.pause();
    assert_eq!(session.audio_state(), AudioState::FadingOut);

    clock.set(ms(2500));
    session.poll();
    assert_eq!(session.audio_state(), AudioState::Paused);
    assert!(!session.output().playing);
    assert_eq!(session.output().pause_calls, 1);
    assert_eq!(session.output().rewinds, 0);

    // Resume continues the same track with a fresh fade-in
    let track = session.current_track().cloned();
    clock.set(ms(4000));
    session.start().unwrap();
    assert_eq!(session.current_track().cloned(), track);
    assert!(session.output().playing);
    assert_eq!(session.audio_state(), AudioState::FadingIn);
}

#[test]
fn pause_during_fade_in_switches_to_fade_out() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.start().unwrap();

    clock.set(ms(300));
    session.poll();
    let before = session.volume();
    assert!(before > 0.0 && before < 1.0);

    session.pause();
    assert_eq!(session.audio_state(), AudioState::FadingOut);

    clock.set(ms(800));
    session.poll();
    assert_eq!(session.volume(), 0.0);
    assert!(!session.output().playing);
}

#[test]
fn resume_during_fade_out_replaces_it() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.start().unwrap();
    clock.set(ms(1000));
    session.poll();

    clock.set(ms(2000));
    session.pause();
    clock.set(ms(2200));
    session.poll();

    session.start().unwrap();
    clock.set(ms(3200));
    session.poll();

    assert_eq!(session.audio_state(), AudioState::Playing);
    assert_eq!(session.volume(), 1.0);
    assert!(session.output().playing);
}

#[test]
fn restart_stops_audio_and_forgets_track() {
    let (mut session, _clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.start().unwrap();

    session.restart();
    assert_eq!(session.audio_state(), AudioState::Stopped);
    assert!(session.current_track().is_none());
    assert!(!session.output().playing);
    assert_eq!(session.output().rewinds, 1);
    assert_eq!(session.output().volume, 0.0);
}

#[test]
fn playback_failure_does_not_stop_presentation() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.output_mut().fail_play = true;

    session.start().unwrap();
    assert_eq!(session.phase(), TimerPhase::Running);
    assert_eq!(session.shown_count(), 1);
    assert_eq!(session.audio_state(), AudioState::Paused);
    assert!(session.sink().iter().any(|e| matches!(
        e,
        PresentationEvent::PlaybackFailed { message } if message.contains("autoplay blocked")
    )));

    clock.set(ms(8000));
    session.poll();
    assert_eq!(session.shown_count(), 2);
}

#[test]
fn track_end_replays_unless_paused() {
    let (mut session, clock) = create_session(&["A", "B"]);
    session.load_audio_tracks(tracks(&["uno"]));
    session.start().unwrap();

    session.on_track_ended();
    assert_eq!(session.output().rewinds, 1);
    assert_eq!(session.output().play_calls, 2);

    clock.set(ms(1000));
    session.pause();
    session.on_track_ended();
    assert_eq!(session.output().rewinds, 1);
}

#[test]
fn no_tracks_means_silent_presentation() {
    let (mut session, _clock) = create_session(&["A"]);
    session.start().unwrap();
    assert_eq!(session.audio_state(), AudioState::Stopped);
    assert_eq!(session.output().play_calls, 0);
    assert_eq!(session.next_wakeup(), Some(ms(8000)));
}
