/// Soundtrack decoding and format conversion
use crate::error::{CallerError, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// A fully decoded track, interleaved f32
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: usize,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1)
    }

    /// Convert to the device layout
    pub fn into_layout(self, sample_rate: u32, channels: usize) -> Result<Vec<f32>> {
        let mapped = map_channels(&self.samples, self.channels, channels);
        if self.sample_rate == sample_rate {
            return Ok(mapped);
        }
        resample(&mapped, channels, self.sample_rate, sample_rate)
    }
}

/// Decode a whole file into memory
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| CallerError::Decode(format!("Failed to probe file: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| CallerError::Decode("No audio tracks found".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| CallerError::Decode(format!("Failed to create decoder: {}", e)))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(CallerError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::debug!("Skipping undecodable packet: {}", e);
            }
            Err(e) => return Err(CallerError::Decode(e.to_string())),
        }
    }

    if samples.is_empty() {
        return Err(CallerError::Decode(format!(
            "No audio decoded from {}",
            path.display()
        )));
    }

    tracing::debug!(
        path = %path.display(),
        sample_rate,
        channels,
        frames = samples.len() / channels.max(1),
        "Track decoded"
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// Change the channel count of interleaved samples
///
/// Mono output averages all channels. Mono input is copied to every output
/// channel. Otherwise channels are kept by index and missing ones are silent.
pub fn map_channels(samples: &[f32], from: usize, to: usize) -> Vec<f32> {
    if from == to || from == 0 || to == 0 {
        return samples.to_vec();
    }

    let frames = samples.len() / from;
    let mut out = Vec::with_capacity(frames * to);

    for frame in samples.chunks_exact(from) {
        if to == 1 {
            out.push(frame.iter().sum::<f32>() / from as f32);
        } else if from == 1 {
            out.extend(std::iter::repeat(frame[0]).take(to));
        } else {
            out.extend((0..to).map(|ch| frame.get(ch).copied().unwrap_or(0.0)));
        }
    }

    out
}

/// Resample interleaved samples to `target_rate`
pub fn resample(
    samples: &[f32],
    channels: usize,
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
        WindowFunction,
    };

    let channels = channels.max(1);
    let frames = samples.len() / channels;
    if frames == 0 || source_rate == target_rate {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f32>::new(
        target_rate as f64 / source_rate as f64,
        2.0,
        params,
        frames,
        channels,
    )
    .map_err(|e| CallerError::Decode(format!("Resampler setup failed: {}", e)))?;

    // Deinterleave
    let mut deinterleaved = vec![Vec::with_capacity(frames); channels];
    for frame in samples.chunks_exact(channels) {
        for (ch, channel_vec) in deinterleaved.iter_mut().enumerate() {
            channel_vec.push(frame[ch]);
        }
    }

    let resampled = resampler
        .process(&deinterleaved, None)
        .map_err(|e| CallerError::Decode(format!("Resampling failed: {}", e)))?;

    // Interleave
    let output_frames = resampled.first().map_or(0, Vec::len);
    let mut interleaved = Vec::with_capacity(output_frames * channels);
    for frame_idx in 0..output_frames {
        for channel_data in &resampled {
            interleaved.push(channel_data[frame_idx]);
        }
    }

    Ok(interleaved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Minimal 16-bit PCM WAV file
    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let data_len = (samples.len() * 2) as u32;
        let byte_rate = sample_rate * u32::from(channels) * 2;

        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&(channels * 2).to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }

        fs::write(path, bytes).unwrap();
    }

    #[test]
    fn decode_wav() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tone.wav");
        let samples: Vec<i16> = (0..2000).map(|i| ((i % 100) * 100) as i16).collect();
        write_wav(&path, 8000, 2, &samples);

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.sample_rate, 8000);
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.frames(), 1000);
        assert!(decoded.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn decode_garbage_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("noise.mp3");
        fs::write(&path, b"definitely not audio").unwrap();

        assert!(decode_file(&path).is_err());
    }

    #[test]
    fn decode_missing_file_fails() {
        let result = decode_file(Path::new("/definitely/not/here.mp3"));
        assert!(matches!(result, Err(CallerError::Io(_))));
    }

    #[test]
    fn mono_to_stereo_duplicates() {
        assert_eq!(
            map_channels(&[0.1, 0.2], 1, 2),
            vec![0.1, 0.1, 0.2, 0.2]
        );
    }

    #[test]
    fn stereo_to_mono_averages() {
        let mono = map_channels(&[0.2, 0.4, -1.0, 1.0], 2, 1);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert_eq!(mono[1], 0.0);
    }

    #[test]
    fn surround_to_stereo_keeps_front() {
        let frame = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        assert_eq!(map_channels(&frame, 6, 2), vec![0.1, 0.2]);
        assert_eq!(map_channels(&[0.1, 0.2], 2, 4), vec![0.1, 0.2, 0.0, 0.0]);
    }

    #[test]
    fn resample_halves_length() {
        let samples: Vec<f32> = (0..4800 * 2)
            .map(|i| ((i / 2) as f32 * 0.01).sin() * 0.5)
            .collect();

        let out = resample(&samples, 2, 48000, 24000).unwrap();
        assert_eq!(out.len() % 2, 0);
        let frames = (out.len() / 2) as i64;
        assert!((frames - 2400).abs() < 100, "got {} frames", frames);
    }

    #[test]
    fn same_rate_is_untouched() {
        let samples = vec![0.1, -0.1, 0.2, -0.2];
        assert_eq!(resample(&samples, 2, 44100, 44100).unwrap(), samples);
    }
}
