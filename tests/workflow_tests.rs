//! End-to-end workflow tests with a real filesystem writer
//!
//! The decoder, listener, and recognizer are stubbed; persistence runs
//! through the real file writer into a temp directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use speech_scribe::application::ports::{
    AudioDecoder, CaptureError, DecodeError, MicrophoneListener, ProgressCallback, RecognizeError,
    SpeechRecognizer,
};
use speech_scribe::application::{
    AudioSource, TranscribeCallbacks, TranscribeError, TranscribeInput, TranscriptionWorkflow,
};
use speech_scribe::domain::recording::ListenSettings;
use speech_scribe::domain::transcription::{
    Language, Transcript, Waveform, RECOGNITION_SAMPLE_RATE,
};
use speech_scribe::infrastructure::FileOutputWriter;

fn speech_waveform() -> Waveform {
    Waveform::new(vec![6000i16; 16_000], RECOGNITION_SAMPLE_RATE)
}

struct StubDecoder {
    waveform: Waveform,
}

#[async_trait]
impl AudioDecoder for StubDecoder {
    async fn decode(&self, _path: &Path) -> Result<Waveform, DecodeError> {
        Ok(self.waveform.clone())
    }
}

struct StubListener;

#[async_trait]
impl MicrophoneListener for StubListener {
    async fn listen(
        &self,
        _settings: ListenSettings,
        _on_progress: Option<ProgressCallback>,
    ) -> Result<Waveform, CaptureError> {
        Ok(speech_waveform())
    }
}

struct StubRecognizer {
    result: Result<Transcript, RecognizeError>,
}

#[async_trait]
impl SpeechRecognizer for StubRecognizer {
    async fn recognize(
        &self,
        _waveform: &Waveform,
        _language: &Language,
    ) -> Result<Transcript, RecognizeError> {
        self.result.clone()
    }
}

fn file_input(path: &str, output_dir: PathBuf) -> TranscribeInput {
    TranscribeInput {
        source: AudioSource::File(PathBuf::from(path)),
        output_dir,
        ..Default::default()
    }
}

#[tokio::test]
async fn valid_file_writes_transcript_with_exact_text() {
    let dir = tempfile::tempdir().unwrap();

    let workflow = TranscriptionWorkflow::new(
        StubDecoder {
            waveform: speech_waveform(),
        },
        StubListener,
        StubRecognizer {
            result: Ok(Transcript::with_confidence("the quick brown fox", 0.97)),
        },
        FileOutputWriter::new(),
    );

    let output = workflow
        .execute(
            file_input("lecture.mp3", dir.path().to_path_buf()),
            TranscribeCallbacks::default(),
        )
        .await
        .unwrap();

    let expected_path = dir.path().join("lecture_transcription.txt");
    assert_eq!(output.transcript_path, expected_path);
    assert!(!output.text.is_empty());

    let content = std::fs::read_to_string(&expected_path).unwrap();
    assert_eq!(content, "the quick brown fox");
}

#[tokio::test]
async fn running_twice_produces_identical_content() {
    let dir = tempfile::tempdir().unwrap();

    let workflow = TranscriptionWorkflow::new(
        StubDecoder {
            waveform: speech_waveform(),
        },
        StubListener,
        StubRecognizer {
            result: Ok(Transcript::new("same words every time")),
        },
        FileOutputWriter::new(),
    );

    workflow
        .execute(
            file_input("talk.wav", dir.path().to_path_buf()),
            TranscribeCallbacks::default(),
        )
        .await
        .unwrap();
    let first = std::fs::read_to_string(dir.path().join("talk_transcription.txt")).unwrap();

    workflow
        .execute(
            file_input("talk.wav", dir.path().to_path_buf()),
            TranscribeCallbacks::default(),
        )
        .await
        .unwrap();
    let second = std::fs::read_to_string(dir.path().join("talk_transcription.txt")).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn backend_failure_leaves_no_output_file() {
    let dir = tempfile::tempdir().unwrap();

    let workflow = TranscriptionWorkflow::new(
        StubDecoder {
            waveform: speech_waveform(),
        },
        StubListener,
        StubRecognizer {
            result: Err(RecognizeError::ApiError("backend down".into())),
        },
        FileOutputWriter::new(),
    );

    let err = workflow
        .execute(
            file_input("talk.wav", dir.path().to_path_buf()),
            TranscribeCallbacks::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TranscribeError::Recognize(_)));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn silent_file_leaves_no_output_file() {
    let dir = tempfile::tempdir().unwrap();

    let workflow = TranscriptionWorkflow::new(
        StubDecoder {
            waveform: Waveform::new(vec![0i16; 16_000], RECOGNITION_SAMPLE_RATE),
        },
        StubListener,
        StubRecognizer {
            result: Ok(Transcript::new("never used")),
        },
        FileOutputWriter::new(),
    );

    let err = workflow
        .execute(
            file_input("silence.wav", dir.path().to_path_buf()),
            TranscribeCallbacks::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TranscribeError::NoSpeech));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[tokio::test]
async fn microphone_capture_with_save_audio_archives_wav() {
    let dir = tempfile::tempdir().unwrap();

    let workflow = TranscriptionWorkflow::new(
        StubDecoder {
            waveform: speech_waveform(),
        },
        StubListener,
        StubRecognizer {
            result: Ok(Transcript::new("dictated note")),
        },
        FileOutputWriter::new(),
    );

    let input = TranscribeInput {
        source: AudioSource::Microphone,
        output_dir: dir.path().to_path_buf(),
        save_audio: true,
        ..Default::default()
    };

    let output = workflow
        .execute(input, TranscribeCallbacks::default())
        .await
        .unwrap();

    let transcript_path = dir.path().join("transcription.txt");
    let audio_path = dir.path().join("transcription.wav");

    assert_eq!(output.transcript_path, transcript_path);
    assert_eq!(output.audio_path, Some(audio_path.clone()));
    assert_eq!(
        std::fs::read_to_string(&transcript_path).unwrap(),
        "dictated note"
    );

    let reader = hound::WavReader::open(&audio_path).unwrap();
    assert_eq!(reader.spec().sample_rate, RECOGNITION_SAMPLE_RATE);
    assert_eq!(reader.len() as usize, speech_waveform().len());
}
