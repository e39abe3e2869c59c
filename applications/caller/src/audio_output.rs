/// CPAL soundtrack output driven from a dedicated audio thread
use crate::decode::decode_file;
use crate::error::{CallerError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use loteria_presentation::{AudioOutput, AudioTrack, PresentationError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::UnboundedSender;

/// Notifications from the audio thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// A non-looping track ran out
    Ended,
    /// Decoding or starting the stream failed after the command was sent
    Failed(String),
}

/// Commands sent to the audio thread
enum AudioCommand {
    /// Decode a track into the device layout and rewind
    Load { path: PathBuf, name: String },
    /// Start the stream
    Play,
    /// Halt the stream, keeping the position
    Pause,
    /// Shutdown the audio thread
    Shutdown,
}

/// State shared between the control side and the audio callback
struct SharedState {
    /// Decoded track in device layout
    buffer: Mutex<Arc<Vec<f32>>>,
    /// Current position (in samples, not frames)
    position: AtomicUsize,
    playing: AtomicBool,
    looping: AtomicBool,
    /// Volume as f32 bits
    volume: AtomicU32,
}

impl SharedState {
    fn new() -> Self {
        Self {
            buffer: Mutex::new(Arc::new(Vec::new())),
            position: AtomicUsize::new(0),
            playing: AtomicBool::new(false),
            looping: AtomicBool::new(false),
            volume: AtomicU32::new(0f32.to_bits()),
        }
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }

    fn set_buffer(&self, samples: Vec<f32>) {
        if let Ok(mut buffer) = self.buffer.lock() {
            *buffer = Arc::new(samples);
        }
        self.position.store(0, Ordering::Relaxed);
    }

    fn has_audio(&self) -> bool {
        self.buffer.lock().map(|b| !b.is_empty()).unwrap_or(false)
    }
}

/// CPAL audio output
///
/// **Architecture**: the CPAL stream is not `Send` on every platform, so a
/// dedicated thread owns it and receives commands over a channel. Decoding
/// happens on that thread too, keeping the caller's event loop responsive.
/// Volume, looping and position are atomics read directly by the callback.
pub struct CpalOutput {
    command_tx: Sender<AudioCommand>,
    state: Arc<SharedState>,
    sample_rate: u32,
    channels: usize,
    _audio_thread: Option<JoinHandle<()>>,
}

impl CpalOutput {
    /// Open the default output device
    ///
    /// `events` receives end-of-track and late failure notifications.
    pub fn new(events: UnboundedSender<AudioEvent>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| CallerError::Audio("No output device found".to_string()))?;

        let config = device
            .default_output_config()
            .map_err(|e| CallerError::Audio(e.to_string()))?;

        let sample_rate = config.sample_rate();
        let config = config.config();
        let channels = config.channels as usize;

        let state = Arc::new(SharedState::new());
        let (command_tx, command_rx) = bounded::<AudioCommand>(32);

        let state_clone = Arc::clone(&state);
        let audio_thread = thread::Builder::new()
            .name("loteria-audio".to_string())
            .spawn(move || {
                Self::audio_thread_run(device, config, sample_rate, state_clone, events, command_rx);
            })?;

        tracing::info!(sample_rate, channels, "Audio output opened");

        Ok(Self {
            command_tx,
            state,
            sample_rate,
            channels,
            _audio_thread: Some(audio_thread),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    fn send(&self, command: AudioCommand) -> std::result::Result<(), PresentationError> {
        self.command_tx
            .send(command)
            .map_err(|e| PresentationError::PlaybackFailure(format!("Audio thread gone: {}", e)))
    }

    /// Audio thread main loop
    fn audio_thread_run(
        device: Device,
        config: StreamConfig,
        sample_rate: u32,
        state: Arc<SharedState>,
        events: UnboundedSender<AudioEvent>,
        command_rx: Receiver<AudioCommand>,
    ) {
        let channels = config.channels as usize;
        let mut stream: Option<Stream> = None;

        while let Ok(cmd) = command_rx.recv() {
            match cmd {
                AudioCommand::Load { path, name } => {
                    match decode_file(&path)
                        .and_then(|decoded| decoded.into_layout(sample_rate, channels))
                    {
                        Ok(samples) => state.set_buffer(samples),
                        Err(e) => {
                            state.set_buffer(Vec::new());
                            let _ = events.send(AudioEvent::Failed(format!("{}: {}", name, e)));
                        }
                    }
                }
                AudioCommand::Play => {
                    // A failed load was already reported
                    if !state.has_audio() {
                        continue;
                    }
                    let result = Self::ensure_stream(&device, &config, &state, &events, &mut stream)
                        .and_then(|s| s.play().map_err(|e| e.to_string()));
                    match result {
                        Ok(()) => state.playing.store(true, Ordering::Relaxed),
                        Err(e) => {
                            let _ = events.send(AudioEvent::Failed(e));
                        }
                    }
                }
                AudioCommand::Pause => {
                    state.playing.store(false, Ordering::Relaxed);
                    if let Some(s) = &stream {
                        if let Err(e) = s.pause() {
                            tracing::debug!("Stream pause unsupported: {}", e);
                        }
                    }
                }
                AudioCommand::Shutdown => break,
            }
        }

        drop(stream);
        tracing::debug!("Audio thread stopped");
    }

    fn ensure_stream<'a>(
        device: &Device,
        config: &StreamConfig,
        state: &Arc<SharedState>,
        events: &UnboundedSender<AudioEvent>,
        stream: &'a mut Option<Stream>,
    ) -> std::result::Result<&'a Stream, String> {
        if stream.is_none() {
            let state_for_callback = Arc::clone(state);
            let events_for_callback = events.clone();
            let built = device
                .build_output_stream(
                    config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        audio_callback(data, &state_for_callback, &events_for_callback);
                    },
                    |err| tracing::error!("Audio stream error: {}", err),
                    None,
                )
                .map_err(|e| e.to_string())?;
            *stream = Some(built);
        }

        stream
            .as_ref()
            .ok_or_else(|| "Stream unavailable".to_string())
    }
}

/// Audio callback (runs in the real-time audio thread)
fn audio_callback(output: &mut [f32], state: &SharedState, events: &UnboundedSender<AudioEvent>) {
    if !state.playing.load(Ordering::Relaxed) {
        output.fill(0.0);
        return;
    }

    let buffer = match state.buffer.lock() {
        Ok(guard) => Arc::clone(&guard),
        Err(_) => {
            output.fill(0.0);
            return;
        }
    };

    let len = buffer.len();
    if len == 0 {
        output.fill(0.0);
        return;
    }

    let volume = state.volume();
    let looping = state.looping.load(Ordering::Relaxed);
    let mut pos = state.position.load(Ordering::Relaxed);
    let mut finished = false;

    for out_sample in output.iter_mut() {
        if pos >= len {
            if looping {
                pos = 0;
            } else {
                *out_sample = 0.0;
                finished = true;
                continue;
            }
        }

        *out_sample = buffer[pos] * volume;
        pos += 1;
    }

    state.position.store(pos.min(len), Ordering::Relaxed);

    if finished && state.playing.swap(false, Ordering::Relaxed) {
        let _ = events.send(AudioEvent::Ended);
    }
}

impl AudioOutput for CpalOutput {
    /// Queue a track for decoding on the audio thread
    ///
    /// Only a missing file fails here. Decode errors arrive later as
    /// [`AudioEvent::Failed`].
    fn load(&mut self, track: &AudioTrack) -> loteria_presentation::Result<()> {
        if !track.path.is_file() {
            return Err(PresentationError::PlaybackFailure(format!(
                "{}: file not found",
                track.name
            )));
        }

        self.send(AudioCommand::Load {
            path: track.path.clone(),
            name: track.name.clone(),
        })
    }

    fn play(&mut self) -> loteria_presentation::Result<()> {
        self.send(AudioCommand::Play)
    }

    fn pause(&mut self) {
        if let Err(e) = self.send(AudioCommand::Pause) {
            tracing::warn!("{}", e);
        }
    }

    fn rewind(&mut self) {
        self.state.position.store(0, Ordering::Relaxed);
    }

    fn set_volume(&mut self, volume: f32) {
        self.state
            .volume
            .store(volume.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.looping.store(looping, Ordering::Relaxed);
    }
}

impl Drop for CpalOutput {
    fn drop(&mut self) {
        let _ = self.command_tx.send(AudioCommand::Shutdown);
    }
}
