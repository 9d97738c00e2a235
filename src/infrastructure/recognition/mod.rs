//! Speech recognition adapters

pub mod flac;
mod google;

pub use google::GoogleRecognizer;
