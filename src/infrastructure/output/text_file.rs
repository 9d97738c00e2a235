//! Filesystem output writer
//!
//! Writes transcripts as UTF-8 text (exactly the recognized text, no
//! decoration) and archives microphone captures as 16-bit WAV.

use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{OutputError, TranscriptWriter};
use crate::domain::transcription::Waveform;

/// Writer that persists output next to the configured output directory
pub struct FileOutputWriter;

impl FileOutputWriter {
    /// Create a new writer
    pub fn new() -> Self {
        Self
    }

    fn write_error(path: &Path, e: impl std::fmt::Display) -> OutputError {
        OutputError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl Default for FileOutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptWriter for FileOutputWriter {
    async fn write_text(&self, path: &Path, text: &str) -> Result<(), OutputError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Self::write_error(path, e))?;
            }
        }

        fs::write(path, text)
            .await
            .map_err(|e| Self::write_error(path, e))
    }

    async fn write_audio(&self, path: &Path, waveform: &Waveform) -> Result<(), OutputError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Self::write_error(path, e))?;
            }
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: waveform.sample_rate(),
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let path_buf = path.to_path_buf();
        let samples = waveform.samples().to_vec();

        // hound is synchronous; keep the encode off the runtime
        tokio::task::spawn_blocking(move || {
            let mut writer = hound::WavWriter::create(&path_buf, spec)
                .map_err(|e| Self::write_error(&path_buf, e))?;
            for sample in samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| OutputError::EncodeFailed(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| OutputError::EncodeFailed(e.to_string()))
        })
        .await
        .map_err(|e| OutputError::EncodeFailed(format!("Write task error: {}", e)))?
    }
}
