//! Multi-format audio file decoder using symphonia
//!
//! Decodes WAV, MP3, FLAC, OGG, and M4A containers to PCM, then
//! downmixes and resamples to the 16kHz mono recognition format.

use std::fs::File;
use std::path::Path;

use async_trait::async_trait;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioDecoder, DecodeError};
use crate::domain::transcription::{Waveform, RECOGNITION_SAMPLE_RATE};
use crate::infrastructure::audio;

/// File decoder backed by symphonia's format probe
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }
}

impl Default for SymphoniaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioDecoder for SymphoniaDecoder {
    async fn decode(&self, path: &Path) -> Result<Waveform, DecodeError> {
        if !path.exists() {
            return Err(DecodeError::FileNotFound(path.to_path_buf()));
        }

        let path = path.to_path_buf();

        // Decoding is CPU-bound, keep it off the async runtime
        tokio::task::spawn_blocking(move || decode_file(&path))
            .await
            .map_err(|e| DecodeError::DecodeFailed(format!("Decode task error: {}", e)))?
    }
}

fn decode_file(path: &Path) -> Result<Waveform, DecodeError> {
    let file = File::open(path).map_err(|e| DecodeError::DecodeFailed(e.to_string()))?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::UnsupportedFormat("no decodable audio track".to_string()))?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::UnsupportedFormat(e.to_string()))?;

    let mut sample_rate = 0u32;
    let mut channels = 0u16;
    let mut interleaved: Vec<i16> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<i16>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::DecodeFailed(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if sample_buf.is_none() {
                    let spec = *decoded.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count() as u16;
                    sample_buf = Some(SampleBuffer::<i16>::new(decoded.capacity() as u64, spec));
                }
                if let Some(buf) = sample_buf.as_mut() {
                    buf.copy_interleaved_ref(decoded);
                    interleaved.extend_from_slice(buf.samples());
                }
            }
            // A corrupt packet is skippable; anything else is fatal
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => return Err(DecodeError::DecodeFailed(e.to_string())),
        }
    }

    if interleaved.is_empty() || sample_rate == 0 {
        return Ok(Waveform::new(Vec::new(), RECOGNITION_SAMPLE_RATE));
    }

    let mono = audio::downmix_to_mono(&interleaved, channels);
    let resampled = audio::resample_to_recognition_rate(&mono, sample_rate)
        .map_err(|e| DecodeError::DecodeFailed(e.to_string()))?;

    Ok(Waveform::new(resampled, RECOGNITION_SAMPLE_RATE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tone_wav(path: &Path, sample_rate: u32, channels: u16, secs: u32) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..(sample_rate * secs) {
            let t = i as f32 / sample_rate as f32;
            let sample = (f32::sin(2.0 * std::f32::consts::PI * 440.0 * t) * 12000.0) as i16;
            for _ in 0..channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[tokio::test]
    async fn missing_file_is_reported() {
        let decoder = SymphoniaDecoder::new();
        let err = decoder
            .decode(Path::new("/nonexistent/audio.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, DecodeError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn non_audio_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.wav");
        std::fs::write(&path, b"this is not audio").unwrap();

        let decoder = SymphoniaDecoder::new();
        let err = decoder.decode(&path).await.unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn wav_file_is_normalized_to_recognition_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone_wav(&path, 8000, 1, 1);

        let decoder = SymphoniaDecoder::new();
        let waveform = decoder.decode(&path).await.unwrap();

        assert_eq!(waveform.sample_rate(), RECOGNITION_SAMPLE_RATE);
        // 1 second of audio regardless of the source rate
        assert!((waveform.duration_secs() - 1.0).abs() < 0.05);
        assert!(!waveform.is_silent());
    }

    #[tokio::test]
    async fn stereo_wav_is_downmixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        write_tone_wav(&path, 16_000, 2, 1);

        let decoder = SymphoniaDecoder::new();
        let waveform = decoder.decode(&path).await.unwrap();

        assert_eq!(waveform.sample_rate(), RECOGNITION_SAMPLE_RATE);
        assert!((waveform.duration_secs() - 1.0).abs() < 0.05);
    }
}
