//! Platform-agnostic audio output trait
//!
//! The presentation core never decodes or mixes audio. It only tells the
//! platform which track to load and drives transport and volume.

use crate::error::Result;
use crate::types::AudioTrack;

/// Platform audio output
///
/// Implementors own the actual playback engine (CPAL on desktop, a browser
/// element, a test recorder...).
pub trait AudioOutput {
    /// Prepare a track for playback from position zero
    ///
    /// # Returns
    /// * `Err(PlaybackFailure)` - Track could not be opened
    fn load(&mut self, track: &AudioTrack) -> Result<()>;

    /// Start or resume playback at the current position
    ///
    /// # Returns
    /// * `Err(PlaybackFailure)` - Engine refused to start
    fn play(&mut self) -> Result<()>;

    /// Halt playback, keeping the position
    fn pause(&mut self);

    /// Move the position back to the start of the track
    fn rewind(&mut self);

    /// Set output volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);

    /// Loop the track natively when it ends
    fn set_looping(&mut self, looping: bool);

    /// Halt playback and rewind
    fn stop(&mut self) {
        self.pause();
        self.rewind();
    }
}

impl<T: AudioOutput + ?Sized> AudioOutput for Box<T> {
    fn load(&mut self, track: &AudioTrack) -> Result<()> {
        (**self).load(track)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn rewind(&mut self) {
        (**self).rewind();
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume);
    }

    fn set_looping(&mut self, looping: bool) {
        (**self).set_looping(looping);
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Output that accepts every command and produces no sound
///
/// Used when no audio device is available or audio is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn load(&mut self, _track: &AudioTrack) -> Result<()> {
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn rewind(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn set_looping(&mut self, _looping: bool) {}
}

/// Output recording every command for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub loaded: Option<AudioTrack>,
    pub playing: bool,
    pub looping: bool,
    pub volume: f32,
    pub rewinds: usize,
    pub play_calls: usize,
    pub fail_play: bool,
}

#[cfg(test)]
impl AudioOutput for RecordingOutput {
    fn load(&mut self, track: &AudioTrack) -> Result<()> {
        self.loaded = Some(track.clone());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.play_calls += 1;
        if self.fail_play {
            return Err(crate::error::PresentationError::PlaybackFailure(
                "device busy".to_string(),
            ));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
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
