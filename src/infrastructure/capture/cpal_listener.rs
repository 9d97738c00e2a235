//! Cross-platform microphone listener using cpal
//!
//! Captures from the default input device, runs the ambient calibration
//! pass, and hands samples to the speech endpointer until the phrase ends
//! or the timeout fires. The device is held only while `listen` runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};

use super::endpoint::{Decision, EndpointConfig, SpeechEndpointer};
use crate::application::ports::{CaptureError, MicrophoneListener, ProgressCallback};
use crate::domain::recording::ListenSettings;
use crate::domain::transcription::{Waveform, RECOGNITION_SAMPLE_RATE};
use crate::infrastructure::audio;

/// Poll interval for the capture loop
const POLL_MILLIS: u64 = 50;

/// Microphone listener backed by cpal.
///
/// The stream lives entirely inside a blocking task because cpal streams
/// are not thread-safe.
pub struct CpalListener {
    cancel: Arc<AtomicBool>,
}

impl CpalListener {
    /// Create a new listener
    pub fn new() -> Self {
        Self {
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a listener that aborts when `cancel` becomes true
    pub fn with_cancel_flag(cancel: Arc<AtomicBool>) -> Self {
        Self { cancel }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::NoAudioDevice)
    }

    /// Get a suitable input configuration
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        // Prefer mono and configs that include the recognition rate,
        // accept stereo (downmixed later)
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            // Only consider i16 or f32 formats
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= RECOGNITION_SAMPLE_RATE
                && config.max_sample_rate().0 >= RECOGNITION_SAMPLE_RATE;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > RECOGNITION_SAMPLE_RATE;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(CaptureError::StartFailed(
            "No suitable input config found".into(),
        ))?;

        // Use the recognition rate if supported, otherwise the minimum
        let sample_rate = if config_range.min_sample_rate().0 <= RECOGNITION_SAMPLE_RATE
            && config_range.max_sample_rate().0 >= RECOGNITION_SAMPLE_RATE
        {
            SampleRate(RECOGNITION_SAMPLE_RATE)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }
}

impl Default for CpalListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MicrophoneListener for CpalListener {
    async fn listen(
        &self,
        settings: ListenSettings,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Waveform, CaptureError> {
        let cancel = Arc::clone(&self.cancel);

        // Capture runs in a blocking task (cpal::Stream is not Send)
        let capture_handle = tokio::task::spawn_blocking(move || {
            let device = CpalListener::get_input_device()?;
            let (config, sample_format) = CpalListener::get_input_config(&device)?;
            let sample_rate = config.sample_rate.0;
            let channels = config.channels;

            let audio_buffer = Arc::new(StdMutex::new(Vec::<i16>::new()));
            let audio_buffer_clone = Arc::clone(&audio_buffer);

            let stream = match sample_format {
                SampleFormat::I16 => device
                    .build_input_stream(
                        &config,
                        move |data: &[i16], _: &cpal::InputCallbackInfo| {
                            let mono = audio::downmix_to_mono(data, channels);
                            if let Ok(mut buffer) = audio_buffer_clone.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        },
                        |err| eprintln!("Audio stream error: {}", err),
                        None,
                    )
                    .map_err(|e| CaptureError::StartFailed(e.to_string()))?,

                SampleFormat::F32 => device
                    .build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            let i16_data: Vec<i16> =
                                data.iter().map(|&s| (s * 32767.0) as i16).collect();
                            let mono = audio::downmix_to_mono(&i16_data, channels);
                            if let Ok(mut buffer) = audio_buffer_clone.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        },
                        |err| eprintln!("Audio stream error: {}", err),
                        None,
                    )
                    .map_err(|e| CaptureError::StartFailed(e.to_string()))?,

                _ => {
                    return Err(CaptureError::StartFailed(
                        "Unsupported sample format".into(),
                    ))
                }
            };

            stream
                .play()
                .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

            let mut endpointer = SpeechEndpointer::new(EndpointConfig::new(sample_rate, &settings));
            let phrase_limit_ms = settings.phrase_limit.as_millis();
            let started = Instant::now();
            let mut read_pos = 0usize;

            loop {
                if cancel.load(Ordering::SeqCst) {
                    return Err(CaptureError::Cancelled);
                }

                std::thread::sleep(std::time::Duration::from_millis(POLL_MILLIS));

                let new_samples: Vec<i16> = {
                    let buffer = audio_buffer.lock().unwrap();
                    buffer[read_pos..].to_vec()
                };
                read_pos += new_samples.len();

                match endpointer.advance(&new_samples) {
                    Decision::Continue => {}
                    Decision::NoSpeech => return Err(CaptureError::NoSpeechDetected),
                    Decision::Complete { start, end } => {
                        let buffer = audio_buffer.lock().unwrap();
                        let end = end.min(buffer.len());
                        let start = start.min(end);
                        return Ok((buffer[start..end].to_vec(), sample_rate));
                    }
                }

                if endpointer.is_calibrated() {
                    if let Some(ref progress) = on_progress {
                        progress(started.elapsed().as_millis() as u64, phrase_limit_ms);
                    }
                }
            }
        });

        let (samples, sample_rate) = capture_handle
            .await
            .map_err(|e| CaptureError::CaptureFailed(format!("Capture task error: {}", e)))??;

        if samples.is_empty() {
            return Err(CaptureError::CaptureFailed(
                "No audio data captured".to_string(),
            ));
        }

        // Normalize to the recognition rate (CPU-bound)
        let resampled = tokio::task::spawn_blocking(move || {
            audio::resample_to_recognition_rate(&samples, sample_rate)
        })
        .await
        .map_err(|e| CaptureError::CaptureFailed(format!("Resample task error: {}", e)))?
        .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

        Ok(Waveform::new(resampled, RECOGNITION_SAMPLE_RATE))
    }
}
