//! Speech endpointing for microphone capture
//!
//! A pure state machine over incoming PCM. One pass of ambient noise sets
//! the energy threshold; speech must then start within the timeout, and the
//! phrase ends at a trailing pause or the phrase limit. Works at the device
//! sample rate so it can run inside the capture loop without resampling.

use crate::domain::recording::ListenSettings;

/// Analysis frame length (20ms worth of samples)
const FRAMES_PER_SECOND: usize = 50;

/// Minimum energy threshold, regardless of how quiet the room is
const MIN_ENERGY_THRESHOLD: f32 = 300.0;

/// Calibrated threshold = ambient RMS * this factor (floored above)
const AMBIENT_MULTIPLIER: f32 = 1.5;

/// Trailing quiet needed to end a phrase (800ms)
const PAUSE_MILLIS: u64 = 800;

/// Endpointing parameters derived from listen settings and the device rate
#[derive(Debug, Clone, Copy)]
pub struct EndpointConfig {
    pub sample_rate: u32,
    pub ambient_samples: usize,
    pub timeout_samples: usize,
    pub phrase_limit_samples: usize,
    pub pause_samples: usize,
}

impl EndpointConfig {
    /// Derive a config for the given device sample rate
    pub fn new(sample_rate: u32, settings: &ListenSettings) -> Self {
        let samples_for = |ms: u64| (ms as usize * sample_rate as usize) / 1000;
        Self {
            sample_rate,
            ambient_samples: samples_for(settings.ambient.as_millis()),
            timeout_samples: samples_for(settings.timeout.as_millis()),
            phrase_limit_samples: samples_for(settings.phrase_limit.as_millis()),
            pause_samples: samples_for(PAUSE_MILLIS),
        }
    }

    fn frame_samples(&self) -> usize {
        (self.sample_rate as usize / FRAMES_PER_SECOND).max(1)
    }
}

/// What the capture loop should do after feeding more samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep capturing
    Continue,
    /// Timeout elapsed with no speech
    NoSpeech,
    /// Phrase complete; capture the sample range [start, end)
    Complete { start: usize, end: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Calibrating,
    AwaitingSpeech,
    Capturing,
}

/// Incremental speech endpointer.
///
/// Feed it device-rate mono samples via [`advance`](Self::advance); sample
/// indices in the returned [`Decision`] are absolute positions in the
/// stream fed so far.
pub struct SpeechEndpointer {
    config: EndpointConfig,
    frame_samples: usize,
    phase: Phase,
    /// Absolute index of the next unprocessed sample
    consumed: usize,
    /// Carry-over for partial frames
    pending: Vec<i16>,
    /// Accumulated squares during calibration
    calibration_sq_sum: f64,
    calibration_count: usize,
    threshold: f32,
    /// Absolute index where awaiting-speech began
    awaiting_from: usize,
    /// Absolute index where the captured phrase begins
    speech_start: usize,
    /// Absolute index just past the last energetic frame
    last_voice_end: usize,
}

impl SpeechEndpointer {
    /// Create an endpointer for the given config
    pub fn new(config: EndpointConfig) -> Self {
        let frame_samples = config.frame_samples();
        Self {
            config,
            frame_samples,
            phase: Phase::Calibrating,
            consumed: 0,
            pending: Vec::new(),
            calibration_sq_sum: 0.0,
            calibration_count: 0,
            threshold: MIN_ENERGY_THRESHOLD,
            awaiting_from: 0,
            speech_start: 0,
            last_voice_end: 0,
        }
    }

    /// The energy threshold in effect (meaningful after calibration)
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether the calibration pass has finished
    pub fn is_calibrated(&self) -> bool {
        self.phase != Phase::Calibrating
    }

    /// Feed newly captured samples; returns what the capture loop should do
    pub fn advance(&mut self, chunk: &[i16]) -> Decision {
        self.pending.extend_from_slice(chunk);

        while self.pending.len() >= self.frame_samples {
            let frame: Vec<i16> = self.pending.drain(..self.frame_samples).collect();
            let decision = self.process_frame(&frame);
            if decision != Decision::Continue {
                return decision;
            }
        }

        Decision::Continue
    }

    fn process_frame(&mut self, frame: &[i16]) -> Decision {
        let frame_start = self.consumed;
        self.consumed += frame.len();
        let frame_end = self.consumed;
        let energy = rms(frame);

        match self.phase {
            Phase::Calibrating => {
                self.calibration_sq_sum +=
                    frame.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>();
                self.calibration_count += frame.len();

                if self.calibration_count >= self.config.ambient_samples {
                    let ambient_rms =
                        (self.calibration_sq_sum / self.calibration_count as f64).sqrt() as f32;
                    self.threshold = (ambient_rms * AMBIENT_MULTIPLIER).max(MIN_ENERGY_THRESHOLD);
                    self.phase = Phase::AwaitingSpeech;
                    self.awaiting_from = frame_end;
                }
                Decision::Continue
            }
            Phase::AwaitingSpeech => {
                if energy > self.threshold {
                    self.phase = Phase::Capturing;
                    // Keep a short pre-roll so the phrase onset is not clipped
                    self.speech_start = frame_start
                        .saturating_sub(self.config.pause_samples)
                        .max(self.awaiting_from);
                    self.last_voice_end = frame_end;
                    Decision::Continue
                } else if frame_end - self.awaiting_from >= self.config.timeout_samples {
                    Decision::NoSpeech
                } else {
                    Decision::Continue
                }
            }
            Phase::Capturing => {
                if energy > self.threshold {
                    self.last_voice_end = frame_end;
                }

                if frame_end - self.last_voice_end >= self.config.pause_samples
                    || frame_end - self.speech_start >= self.config.phrase_limit_samples
                {
                    Decision::Complete {
                        start: self.speech_start,
                        end: frame_end,
                    }
                } else {
                    Decision::Continue
                }
            }
        }
    }
}

fn rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::Duration;

    const RATE: u32 = 16_000;

    fn settings() -> ListenSettings {
        ListenSettings::new(
            Duration::from_secs(2),  // timeout
            Duration::from_secs(10), // phrase limit
            Duration::from_secs(1),  // ambient
        )
    }

    fn endpointer() -> SpeechEndpointer {
        SpeechEndpointer::new(EndpointConfig::new(RATE, &settings()))
    }

    fn silence(secs: f64) -> Vec<i16> {
        vec![0i16; (secs * RATE as f64) as usize]
    }

    fn noise(secs: f64, amplitude: i16) -> Vec<i16> {
        (0..(secs * RATE as f64) as usize)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect()
    }

    fn tone(secs: f64) -> Vec<i16> {
        noise(secs, 8000)
    }

    #[test]
    fn calibration_completes_after_ambient_duration() {
        let mut ep = endpointer();
        assert!(!ep.is_calibrated());
        assert_eq!(ep.advance(&silence(1.1)), Decision::Continue);
        assert!(ep.is_calibrated());
    }

    #[test]
    fn quiet_room_uses_threshold_floor() {
        let mut ep = endpointer();
        ep.advance(&noise(1.1, 50));
        assert_eq!(ep.threshold(), MIN_ENERGY_THRESHOLD);
    }

    #[test]
    fn noisy_room_raises_threshold() {
        let mut ep = endpointer();
        ep.advance(&noise(1.1, 1000));
        assert!(ep.threshold() > MIN_ENERGY_THRESHOLD);
        assert!((ep.threshold() - 1000.0 * AMBIENT_MULTIPLIER).abs() < 100.0);
    }

    #[test]
    fn pure_silence_times_out() {
        let mut ep = endpointer();
        // 1s calibration + 2s timeout, fed with margin
        let decision = ep.advance(&silence(3.5));
        assert_eq!(decision, Decision::NoSpeech);
    }

    #[test]
    fn speech_then_pause_completes() {
        let mut ep = endpointer();
        let mut stream = silence(1.2); // calibration + a beat of quiet
        stream.extend(tone(1.0)); // the phrase
        stream.extend(silence(1.5)); // trailing pause

        let decision = ep.advance(&stream);
        match decision {
            Decision::Complete { start, end } => {
                // Starts near the phrase onset (pre-roll allowed), ends after the pause
                assert!(start <= (1.2 * RATE as f64) as usize + ep.frame_samples);
                assert!(start >= (0.3 * RATE as f64) as usize);
                assert!(end > start);
                // Captured range covers the full second of speech
                assert!(end - start >= RATE as usize);
            }
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn long_speech_hits_phrase_limit() {
        let mut ep = endpointer();
        let mut stream = silence(1.1);
        stream.extend(tone(12.0)); // longer than the 10s phrase limit

        let decision = ep.advance(&stream);
        match decision {
            Decision::Complete { start, end } => {
                let limit = EndpointConfig::new(RATE, &settings()).phrase_limit_samples;
                assert!(end - start >= limit);
                // Did not wait for the tone to end
                assert!(end < (13.0 * RATE as f64) as usize);
            }
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[test]
    fn speech_before_timeout_is_captured() {
        let mut ep = endpointer();
        let mut stream = silence(1.0 + 1.8); // speech starts just inside the 2s timeout
        stream.extend(tone(0.5));
        stream.extend(silence(1.5));

        assert!(matches!(ep.advance(&stream), Decision::Complete { .. }));
    }

    #[test]
    fn short_chunks_behave_like_one_large_chunk() {
        let mut whole = endpointer();
        let mut chunked = endpointer();

        let mut stream = silence(1.2);
        stream.extend(tone(1.0));
        stream.extend(silence(1.5));

        let expected = whole.advance(&stream);

        let mut got = Decision::Continue;
        for chunk in stream.chunks(160) {
            got = chunked.advance(chunk);
            if got != Decision::Continue {
                break;
            }
        }

        assert_eq!(expected, got);
    }
}
