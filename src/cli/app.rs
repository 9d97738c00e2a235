//! Main app runner for the transcription invocation

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::ConfigStore;
use crate::application::{TranscribeCallbacks, TranscribeInput, TranscriptionWorkflow};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    CpalListener, FileOutputWriter, GoogleRecognizer, SymphoniaDecoder, XdgConfigStore,
};

use super::args::TranscribeOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "GOOGLE_SPEECH_API_KEY";

/// Run one transcription invocation
pub async fn run_transcription(options: TranscribeOptions) -> ExitCode {
    let presenter = Arc::new(Presenter::new());

    // Setup signal handler so Ctrl+C cancels an in-flight capture
    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    // Create adapters
    let decoder = SymphoniaDecoder::new();
    let listener = CpalListener::with_cancel_flag(shutdown.flag());
    let recognizer = match options.api_key.as_deref() {
        Some(key) => GoogleRecognizer::with_api_key(key),
        None => GoogleRecognizer::new(),
    };
    let writer = FileOutputWriter::new();

    // Create the workflow
    let workflow = TranscriptionWorkflow::new(decoder, listener, recognizer, writer);

    let input = TranscribeInput {
        source: options.source,
        language: options.language,
        listen: options.listen,
        output_dir: options.output_dir,
        save_audio: options.save_audio,
    };

    let callbacks = build_callbacks(&presenter);

    // Execute
    match workflow.execute(input, callbacks).await {
        Ok(output) => {
            presenter.output(&output.text);
            presenter.success(&format!(
                "Transcription saved to: {}",
                output.transcript_path.display()
            ));
            if let Some(audio_path) = output.audio_path {
                presenter.info(&format!("Audio saved to: {}", audio_path.display()));
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.stop_spinner();
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn build_callbacks(presenter: &Arc<Presenter>) -> TranscribeCallbacks {
    let loading_presenter = Arc::clone(presenter);
    let listening_presenter = Arc::clone(presenter);
    let progress_presenter = Arc::clone(presenter);
    let audio_presenter = Arc::clone(presenter);
    let recognizing_presenter = Arc::clone(presenter);
    let done_presenter = Arc::clone(presenter);

    TranscribeCallbacks {
        on_progress: Some(Arc::new(move |elapsed_ms, limit_ms| {
            let progress = progress_presenter.format_progress(elapsed_ms, limit_ms);
            progress_presenter.update_spinner(&format!("Listening... {}", progress));
        })),
        on_loading: Some(Box::new(move |path: &std::path::Path| {
            loading_presenter.info(&format!("Loading audio file: {}", path.display()));
        })),
        on_listening_start: Some(Box::new(move || {
            listening_presenter.start_spinner("Adjusting for ambient noise...");
        })),
        on_audio_ready: Some(Box::new(move |duration: &str| {
            audio_presenter.spinner_success(&format!("Captured {} of audio", duration));
        })),
        on_recognizing_start: Some(Box::new(move || {
            recognizing_presenter.start_spinner("Transcribing...");
        })),
        on_recognizing_end: Some(Box::new(move || {
            done_presenter.spinner_success("Transcription complete");
        })),
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        api_key: env::var(API_KEY_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
