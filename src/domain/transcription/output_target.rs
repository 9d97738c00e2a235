//! Output target value object

use std::path::{Path, PathBuf};

/// Default transcript file name for microphone captures
const DEFAULT_TRANSCRIPT_NAME: &str = "transcription";

/// Suffix appended to the input stem for file transcriptions
const TRANSCRIPT_SUFFIX: &str = "_transcription";

/// Value object naming where an invocation's output lands.
/// File inputs produce `{stem}_transcription.txt`; microphone captures
/// produce `transcription.txt`. Both live inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    stem: String,
    dir: PathBuf,
}

impl OutputTarget {
    /// Target for a transcribed audio file, named after the input
    pub fn for_file(input: &Path, output_dir: &Path) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_TRANSCRIPT_NAME.to_string());

        Self {
            stem: format!("{}{}", stem, TRANSCRIPT_SUFFIX),
            dir: output_dir.to_path_buf(),
        }
    }

    /// Target for a microphone capture
    pub fn for_microphone(output_dir: &Path) -> Self {
        Self {
            stem: DEFAULT_TRANSCRIPT_NAME.to_string(),
            dir: output_dir.to_path_buf(),
        }
    }

    /// Path of the transcript text file
    pub fn transcript_path(&self) -> PathBuf {
        self.dir.join(format!("{}.txt", self.stem))
    }

    /// Path of the archived audio file, sibling to the transcript
    pub fn audio_path(&self) -> PathBuf {
        self.dir.join(format!("{}.wav", self.stem))
    }
}
