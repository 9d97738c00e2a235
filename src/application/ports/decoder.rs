//! Audio file decoding port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcription::Waveform;

/// Decoding errors
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("Audio file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported or unrecognized audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode audio: {0}")]
    DecodeFailed(String),
}

/// Port for decoding an audio file into a normalized waveform
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    /// Decode the file at `path` into a mono waveform at the
    /// recognition sample rate.
    ///
    /// # Returns
    /// The normalized waveform or an error
    async fn decode(&self, path: &Path) -> Result<Waveform, DecodeError>;
}
