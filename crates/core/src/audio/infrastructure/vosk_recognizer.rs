use std::path::{Path, PathBuf};

use vosk::{CompleteResult, DecodingState, Model, Recognizer};

use crate::audio::domain::speech_recognizer::{
    RecognitionResult, RecognizerSession, SpeechRecognizer,
};
use crate::shared::error::TranscribeError;

/// Speech recognizer backed by a Vosk (Kaldi) model directory.
///
/// Vosk decodes incrementally and reports utterance boundaries itself, so
/// sessions are a thin wrapper around `vosk::Recognizer`.
pub struct VoskRecognizer {
    model: Model,
    model_path: PathBuf,
}

impl VoskRecognizer {
    pub fn load(model_path: &Path) -> Result<Self, TranscribeError> {
        if !model_path.is_dir() {
            return Err(TranscribeError::ModelLoadFailed(format!(
                "Vosk model directory not found at: {}",
                model_path.display()
            )));
        }
        let path_str = model_path.to_str().ok_or_else(|| {
            TranscribeError::ModelLoadFailed(format!(
                "model path is not valid UTF-8: {}",
                model_path.display()
            ))
        })?;

        log::info!("Loading Vosk model from {}", model_path.display());
        let model = Model::new(path_str).ok_or_else(|| {
            TranscribeError::ModelLoadFailed(format!(
                "Vosk could not load model at {}",
                model_path.display()
            ))
        })?;

        Ok(Self {
            model,
            model_path: model_path.to_path_buf(),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SpeechRecognizer for VoskRecognizer {
    fn create_session(
        &self,
        sample_rate: u32,
    ) -> Result<Box<dyn RecognizerSession + '_>, TranscribeError> {
        let recognizer = Recognizer::new(&self.model, sample_rate as f32).ok_or_else(|| {
            TranscribeError::Recognition(format!(
                "Vosk could not create a recognizer at {sample_rate} Hz"
            ))
        })?;
        Ok(Box::new(VoskSession { recognizer }))
    }
}

struct VoskSession {
    recognizer: Recognizer,
}

impl RecognizerSession for VoskSession {
    fn accept_waveform(&mut self, samples: &[i16]) -> Result<bool, TranscribeError> {
        let state = self
            .recognizer
            .accept_waveform(samples)
            .map_err(|e| TranscribeError::Recognition(e.to_string()))?;
        match state {
            DecodingState::Finalized => Ok(true),
            DecodingState::Running => Ok(false),
            DecodingState::Failed => Err(TranscribeError::Recognition(
                "Vosk failed to decode audio chunk".to_string(),
            )),
        }
    }

    fn result(&mut self) -> Result<RecognitionResult, TranscribeError> {
        Ok(text_of(self.recognizer.result()))
    }

    fn final_result(&mut self) -> Result<RecognitionResult, TranscribeError> {
        Ok(text_of(self.recognizer.final_result()))
    }
}

/// Text of a complete result; with alternatives enabled, the most likely one.
fn text_of(result: CompleteResult<'_>) -> RecognitionResult {
    let text = match result {
        CompleteResult::Single(single) => single.text,
        CompleteResult::Multiple(multiple) => {
            most_likely(multiple.alternatives.iter().map(|alt| alt.text))
        }
    };
    RecognitionResult::new(text)
}

/// Vosk lists alternatives best first. No alternatives means no speech.
fn most_likely<'a>(texts: impl IntoIterator<Item = &'a str>) -> &'a str {
    texts.into_iter().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_directory_returns_model_error() {
        let result = VoskRecognizer::load(Path::new("/nonexistent/vosk-model"));
        assert!(matches!(result, Err(TranscribeError::ModelLoadFailed(_))));
    }

    #[test]
    fn test_most_likely_takes_first_alternative() {
        assert_eq!(most_likely(["hello world", "hello word"]), "hello world");
    }

    #[test]
    fn test_most_likely_without_alternatives_is_empty() {
        assert_eq!(most_likely(std::iter::empty()), "");
    }

    #[test]
    #[ignore] // Requires a Vosk model directory
    fn test_silence_with_alternatives_yields_empty_text() {
        let model = Model::new(crate::shared::constants::VOSK_MODEL_NAME)
            .expect("Failed to load Vosk model");
        let mut recognizer = Recognizer::new(&model, 16000.0).unwrap();
        recognizer.set_max_alternatives(3);
        let mut session = VoskSession { recognizer };
        session.accept_waveform(&vec![0i16; 16000]).unwrap();
        assert_eq!(session.final_result().unwrap().text, "");
    }

    #[test]
    #[ignore] // Requires a Vosk model directory
    fn test_silence_yields_empty_text() {
        let recognizer = VoskRecognizer::load(Path::new(
            crate::shared::constants::VOSK_MODEL_NAME,
        ))
        .expect("Failed to load Vosk model");
        let mut session = recognizer.create_session(16000).unwrap();
        session.accept_waveform(&vec![0i16; 4000]).unwrap();
        assert_eq!(session.final_result().unwrap().text, "");
    }
}
