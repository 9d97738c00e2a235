//! Audio file decoding adapters

mod symphonia;

pub use self::symphonia::SymphoniaDecoder;
