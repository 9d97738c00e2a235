//! Microphone listening port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::ListenSettings;
use crate::domain::transcription::Waveform;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Failed to start listening: {0}")]
    StartFailed(String),

    #[error("No speech detected within the timeout period")]
    NoSpeechDetected,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Listening was cancelled")]
    Cancelled,
}

/// Progress callback type for reporting listening progress.
/// Parameters: (elapsed_ms, phrase_limit_ms)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Port for capturing speech from the default input device.
///
/// An implementation calibrates against ambient noise, waits for speech
/// up to `settings.timeout`, and returns once a trailing pause is heard
/// or `settings.phrase_limit` elapses. The device is held only for the
/// duration of the call.
#[async_trait]
pub trait MicrophoneListener: Send + Sync {
    /// Listen for a single phrase.
    ///
    /// # Arguments
    /// * `settings` - Timeout, phrase limit, and calibration duration
    /// * `on_progress` - Optional callback for progress updates
    ///
    /// # Returns
    /// The captured waveform, normalized to the recognition sample rate
    async fn listen(
        &self,
        settings: ListenSettings,
        on_progress: Option<ProgressCallback>,
    ) -> Result<Waveform, CaptureError>;
}
