//! Microphone capture adapters

mod cpal_listener;
mod endpoint;

pub use cpal_listener::CpalListener;
pub use endpoint::{Decision, EndpointConfig, SpeechEndpointer};
