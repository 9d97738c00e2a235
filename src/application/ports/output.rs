//! Output persistence port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcription::Waveform;

/// Output errors
#[derive(Debug, Clone, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Failed to encode audio for archiving: {0}")]
    EncodeFailed(String),
}

/// Port for persisting invocation output
#[async_trait]
pub trait TranscriptWriter: Send + Sync {
    /// Write the transcript text to `path`, exactly as recognized (UTF-8).
    async fn write_text(&self, path: &Path, text: &str) -> Result<(), OutputError>;

    /// Archive the captured waveform as an audio file at `path`.
    async fn write_audio(&self, path: &Path, waveform: &Waveform) -> Result<(), OutputError>;
}
