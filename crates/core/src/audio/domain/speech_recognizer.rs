use crate::shared::error::TranscribeError;

/// Structured result of one recognized utterance, or of the final flush.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecognitionResult {
    pub text: String,
}

impl RecognitionResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Domain interface for a loaded speech recognition model.
///
/// The model is loaded once per run; each run decodes through a fresh
/// [`RecognizerSession`] bound to the waveform's sample rate.
pub trait SpeechRecognizer {
    fn create_session(
        &self,
        sample_rate: u32,
    ) -> Result<Box<dyn RecognizerSession + '_>, TranscribeError>;
}

/// Incremental decoder over a stream of 16-bit PCM chunks.
///
/// Lifecycle: create, `accept_waveform` any number of times, then
/// `final_result` once. Decoder state between calls is opaque.
pub trait RecognizerSession {
    /// Feed one chunk. Returns `true` when the chunk completed an utterance,
    /// after which `result` yields that utterance's text.
    fn accept_waveform(&mut self, samples: &[i16]) -> Result<bool, TranscribeError>;

    fn result(&mut self) -> Result<RecognitionResult, TranscribeError>;

    /// Flush any trailing partial utterance.
    fn final_result(&mut self) -> Result<RecognitionResult, TranscribeError>;
}
