//! Shared PCM helpers: channel downmix and sample-rate conversion
//!
//! Both the file decoder and the microphone listener normalize their
//! output to 16kHz mono through this module.

use rubato::{FftFixedIn, Resampler};
use thiserror::Error;

use crate::domain::transcription::RECOGNITION_SAMPLE_RATE;

/// Resampling errors
#[derive(Debug, Clone, Error)]
pub enum ResampleError {
    #[error("Resampler init failed: {0}")]
    Init(String),

    #[error("Resampling failed: {0}")]
    Process(String),
}

/// Mix interleaved multi-channel samples down to mono by averaging
pub fn downmix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels as usize)
        .map(|chunk| {
            let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Resample mono audio from the source rate to the recognition rate
pub fn resample_to_recognition_rate(
    samples: &[i16],
    source_rate: u32,
) -> Result<Vec<i16>, ResampleError> {
    if source_rate == RECOGNITION_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }

    // Convert i16 to f32 for resampling
    let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

    // Calculate output length
    let ratio = RECOGNITION_SAMPLE_RATE as f64 / source_rate as f64;
    let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        RECOGNITION_SAMPLE_RATE as usize,
        1024, // Chunk size
        2,    // Sub-chunks
        1,    // Mono
    )
    .map_err(|e| ResampleError::Init(e.to_string()))?;

    let mut output = Vec::with_capacity(output_len);
    let mut input_pos = 0;

    while input_pos < samples_f32.len() {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(samples_f32.len());
        let chunk: Vec<Vec<f32>> = vec![samples_f32[input_pos..end_pos].to_vec()];

        // Pad the tail chunk if we ran out of samples
        let chunk = if chunk[0].len() < frames_needed {
            let mut padded = chunk[0].clone();
            padded.resize(frames_needed, 0.0);
            vec![padded]
        } else {
            chunk
        };

        let resampled = resampler
            .process(&chunk, None)
            .map_err(|e| ResampleError::Process(e.to_string()))?;

        output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
        input_pos = end_pos;
    }

    // Trim to expected output length
    output.truncate(output_len);

    Ok(output)
}
