use tracing::info;

use crate::models::Language;

pub const DEFAULT_SPEECH_RATE: f32 = 0.5;
pub const MIN_SPEECH_RATE: f32 = 0.1;
pub const MAX_SPEECH_RATE: f32 = 1.0;
pub const DEFAULT_PITCH_MULTIPLIER: f32 = 1.2;

/// A single request to the speech backend
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language_tag: &'static str,
    pub rate: f32,
    pub pitch_multiplier: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, language: Language, rate: f32) -> Self {
        Self {
            text: text.into(),
            language_tag: language.tag(),
            rate,
            pitch_multiplier: DEFAULT_PITCH_MULTIPLIER,
        }
    }

    pub fn with_pitch(mut self, pitch_multiplier: f32) -> Self {
        self.pitch_multiplier = pitch_multiplier;
        self
    }
}

/// Platform text-to-speech capability
///
/// Calls are fire-and-forget. The session always calls `stop` before `speak`,
/// so at most one utterance is active.
pub trait SpeechOutput: Send + Sync {
    fn stop(&self);
    fn speak(&self, utterance: Utterance);
}

/// Speech backend that only logs what it would say
#[derive(Debug, Clone, Default)]
pub struct TracingSpeech;

impl SpeechOutput for TracingSpeech {
    fn stop(&self) {
        info!(component = "speech", "Stopping current utterance");
    }

    fn speak(&self, utterance: Utterance) {
        info!(
            component = "speech",
            text = %utterance.text,
            language = utterance.language_tag,
            rate = utterance.rate,
            pitch = utterance.pitch_multiplier,
            "Speaking"
        );
    }
}

/// Clamp a requested rate into the range the settings screen offers
pub fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        return DEFAULT_SPEECH_RATE;
    }
    rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE)
}
