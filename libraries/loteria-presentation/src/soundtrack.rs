//! Background music for a presentation
//!
//! One track per session, chosen at random on first play and looped. Volume
//! follows the fade controller: in on start and resume, out on pause.

use crate::audio::AudioOutput;
use crate::clock::Clock;
use crate::error::Result;
use crate::fade::FadeController;
use crate::shuffle::choose_track;
use crate::types::{AudioState, AudioTrack, FadeSettings};
use rand::Rng;
use std::time::Duration;

/// Track selection, transport and fades over an [`AudioOutput`]
pub struct Soundtrack<O: AudioOutput> {
    output: O,

    /// Tracks available for selection
    tracks: Vec<AudioTrack>,

    /// Track chosen for this session
    current: Option<AudioTrack>,

    fade: FadeController,
}

impl<O: AudioOutput> Soundtrack<O> {
    pub fn new(output: O, fade_in: FadeSettings, fade_out: FadeSettings) -> Self {
        Self {
            output,
            tracks: Vec::new(),
            current: None,
            fade: FadeController::new(fade_in, fade_out),
        }
    }

    /// Replace the available tracks
    ///
    /// A track already playing keeps playing.
    pub fn set_tracks(&mut self, tracks: Vec<AudioTrack>) {
        self.tracks = tracks;
    }

    pub fn tracks(&self) -> &[AudioTrack] {
        &self.tracks
    }

    pub fn current_track(&self) -> Option<&AudioTrack> {
        self.current.as_ref()
    }

    pub fn state(&self) -> AudioState {
        self.fade.state()
    }

    pub fn volume(&self) -> f32 {
        self.fade.volume()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// When the next fade step is due
    pub fn next_step_at(&self) -> Option<Duration> {
        self.fade.next_step_at()
    }

    /// Pick a track, loop it and fade it in
    ///
    /// Does nothing when no tracks are available or a track is already chosen.
    /// Loading may block, so the fade is timed from the clock after playback
    /// has begun.
    pub fn start<R, C>(&mut self, clock: &C, rng: &mut R) -> Result<()>
    where
        R: Rng + ?Sized,
        C: Clock + ?Sized,
    {
        if self.current.is_some() {
            return Ok(());
        }
        let Some(track) = choose_track(&self.tracks, rng).cloned() else {
            return Ok(());
        };

        self.output.load(&track)?;
        self.output.set_looping(true);
        self.output.set_volume(0.0);

        tracing::info!(track = %track.name, "Soundtrack selected");
        self.current = Some(track);

        self.play_with_fade(clock)
    }

    /// Continue the chosen track from where it paused
    pub fn resume<C: Clock + ?Sized>(&mut self, clock: &C) -> Result<()> {
        if self.current.is_none() {
            return Ok(());
        }

        self.output.set_volume(0.0);
        self.play_with_fade(clock)
    }

    /// Fade out, then halt with position retained
    pub fn pause(&mut self, now: Duration) {
        if self.current.is_some() {
            self.fade.fade_out(now);
        }
    }

    /// Halt, rewind and forget the chosen track
    pub fn stop(&mut self) {
        self.fade.reset();
        if let Some(track) = self.current.take() {
            self.output.set_volume(0.0);
            self.output.stop();
            tracing::debug!(track = %track.name, "Soundtrack stopped");
        }
    }

    /// Playback broke after it was started
    ///
    /// Halts at silence and keeps the track, so a later resume retries it.
    pub fn fail(&mut self) {
        if self.current.is_some() {
            self.output.pause();
            self.fade.mark_paused();
        }
    }

    /// Apply due fade steps
    pub fn advance(&mut self, now: Duration, paused: bool) -> u32 {
        self.fade.advance(now, paused, &mut self.output)
    }

    /// Handle an end-of-track signal
    ///
    /// Native looping should make this rare; when it happens while the
    /// presentation is not paused the track is replayed from the start.
    pub fn track_ended(&mut self, paused: bool) -> Result<()> {
        if self.current.is_none() || paused {
            return Ok(());
        }

        tracing::debug!("Track ended without looping, restarting");
        self.output.rewind();
        self.output.play()
    }

    fn play_with_fade<C: Clock + ?Sized>(&mut self, clock: &C) -> Result<()> {
        if let Err(e) = self.output.play() {
            self.fade.mark_paused();
            return Err(e);
        }
        self.fade.fade_in(clock.now(), &mut self.output);
        Ok(())
    }
}
