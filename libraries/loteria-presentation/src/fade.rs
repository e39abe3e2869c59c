//! Time-sliced soundtrack fades
//!
//! Fades are linear ramps applied in equal steps, one step per interval:
//! - Fade-in: 0 → 1, each step sets `min(1, step / steps)`
//! - Fade-out: current volume → 0, each step subtracts `volume_at_start / steps`,
//!   then halts playback
//!
//! Only one fade runs at a time. Starting a fade replaces the previous one.

use crate::audio::AudioOutput;
use crate::types::{AudioState, FadeSettings};
use std::time::Duration;

/// Ramp direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// A fade in progress
#[derive(Debug, Clone, Copy)]
struct ActiveFade {
    direction: FadeDirection,
    started_at: Duration,
    interval: Duration,
    steps: u32,
    completed: u32,
    /// Volume removed per fade-out step
    step_size: f32,
}

impl ActiveFade {
    fn next_step_at(&self) -> Duration {
        self.started_at + self.interval * (self.completed + 1)
    }
}

/// Soundtrack volume ramp controller
#[derive(Debug, Clone)]
pub struct FadeController {
    fade_in: FadeSettings,
    fade_out: FadeSettings,
    state: AudioState,
    volume: f32,
    active: Option<ActiveFade>,
}

impl FadeController {
    pub fn new(fade_in: FadeSettings, fade_out: FadeSettings) -> Self {
        Self {
            fade_in,
            fade_out,
            state: AudioState::Stopped,
            volume: 0.0,
            active: None,
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn direction(&self) -> Option<FadeDirection> {
        self.active.map(|fade| fade.direction)
    }

    pub fn is_fading(&self) -> bool {
        self.active.is_some()
    }

    /// When the next step is due
    pub fn next_step_at(&self) -> Option<Duration> {
        self.active.map(|fade| fade.next_step_at())
    }

    /// Ramp from silence to full volume
    pub fn fade_in<O: AudioOutput + ?Sized>(&mut self, now: Duration, output: &mut O) {
        self.volume = 0.0;
        output.set_volume(0.0);
        self.state = AudioState::FadingIn;
        self.active = Some(ActiveFade {
            direction: FadeDirection::In,
            started_at: now,
            interval: self.fade_in.step_interval(),
            steps: self.fade_in.steps.max(1),
            completed: 0,
            step_size: 0.0,
        });

        tracing::debug!(steps = self.fade_in.steps, "Fade-in started");
    }

    /// Ramp from the current volume to silence, then halt
    pub fn fade_out(&mut self, now: Duration) {
        let steps = self.fade_out.steps.max(1);
        self.state = AudioState::FadingOut;
        self.active = Some(ActiveFade {
            direction: FadeDirection::Out,
            started_at: now,
            interval: self.fade_out.step_interval(),
            steps,
            completed: 0,
            step_size: self.volume / steps as f32,
        });

        tracing::debug!(from = self.volume, steps, "Fade-out started");
    }

    /// Apply every step due at `now`
    ///
    /// A fade-in that observes `paused` stops without further steps.
    /// Returns the number of steps applied.
    pub fn advance<O: AudioOutput + ?Sized>(
        &mut self,
        now: Duration,
        paused: bool,
        output: &mut O,
    ) -> u32 {
        let mut applied = 0;

        while let Some(fade) = self.active {
            if fade.next_step_at() > now {
                break;
            }

            match fade.direction {
                FadeDirection::In => {
                    if paused {
                        tracing::debug!(volume = self.volume, "Fade-in aborted by pause");
                        self.active = None;
                        self.state = AudioState::Playing;
                        break;
                    }
                    self.step_in(fade, output);
                }
                FadeDirection::Out => self.step_out(fade, output),
            }
            applied += 1;
        }

        applied
    }

    /// Drop any fade without touching the output
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Back to stopped and silent
    pub fn reset(&mut self) {
        self.active = None;
        self.volume = 0.0;
        self.state = AudioState::Stopped;
    }

    /// Record that playback is halted at silence without a fade
    pub fn mark_paused(&mut self) {
        self.active = None;
        self.volume = 0.0;
        self.state = AudioState::Paused;
    }

    fn step_in<O: AudioOutput + ?Sized>(&mut self, mut fade: ActiveFade, output: &mut O) {
        fade.completed += 1;
        self.volume = (fade.completed as f32 / fade.steps as f32).min(1.0);

        if fade.completed >= fade.steps {
            self.volume = 1.0;
            self.state = AudioState::Playing;
            self.active = None;
        } else {
            self.active = Some(fade);
        }

        output.set_volume(self.volume);
    }

    fn step_out<O: AudioOutput + ?Sized>(&mut self, mut fade: ActiveFade, output: &mut O) {
        fade.completed += 1;
        self.volume = (self.volume - fade.step_size).max(0.0);

        if fade.completed >= fade.steps || self.volume <= 0.0 {
            self.volume = 0.0;
            output.set_volume(0.0);
            output.pause();
            self.state = AudioState::Paused;
            self.active = None;
        } else {
            output.set_volume(self.volume);
            self.active = Some(fade);
        }
    }
}

impl Default for FadeController {
    fn default() -> Self {
        Self::new(FadeSettings::new(1000, 20), FadeSettings::new(500, 10))
    }
}
