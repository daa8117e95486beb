use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::speech_recognizer::{
    RecognitionResult, RecognizerSession, SpeechRecognizer,
};
use crate::shared::constants::{
    TARGET_SAMPLE_RATE, WHISPER_DEFAULT_LANGUAGE, WHISPER_WINDOW_SAMPLES,
};
use crate::shared::error::TranscribeError;

/// whisper.cpp refuses to decode less than one second of audio.
const MIN_DECODE_SAMPLES: usize = TARGET_SAMPLE_RATE as usize;

/// Speech recognizer using whisper.cpp via whisper-rs.
///
/// The GGML model is loaded once; each session buffers incoming PCM and
/// decodes it in 30-second windows, which is the longest span Whisper
/// attends to in one pass. A full window counts as a completed utterance.
pub struct WhisperRecognizer {
    ctx: WhisperContext,
    model_path: PathBuf,
    language: String,
    n_threads: i32,
}

impl std::fmt::Debug for WhisperRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperRecognizer")
            .field("model_path", &self.model_path)
            .field("language", &self.language)
            .field("n_threads", &self.n_threads)
            .finish_non_exhaustive()
    }
}

impl WhisperRecognizer {
    pub fn load(model_path: &Path) -> Result<Self, TranscribeError> {
        if !model_path.is_file() {
            return Err(TranscribeError::ModelLoadFailed(format!(
                "Whisper model not found at: {}",
                model_path.display()
            )));
        }
        let path_str = model_path.to_str().ok_or_else(|| {
            TranscribeError::ModelLoadFailed(format!(
                "model path is not valid UTF-8: {}",
                model_path.display()
            ))
        })?;

        log::info!("Loading Whisper model from {}", model_path.display());
        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| {
                TranscribeError::ModelLoadFailed(format!("Failed to load Whisper model: {e}"))
            })?;

        Ok(Self {
            ctx,
            model_path: model_path.to_path_buf(),
            language: WHISPER_DEFAULT_LANGUAGE.to_string(),
            n_threads: num_cpus().min(4) as i32,
        })
    }

    /// Spoken language code, or `auto` to let Whisper detect it.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn decode(&self, samples: &[f32]) -> Result<String, TranscribeError> {
        if samples.is_empty() {
            return Ok(String::new());
        }

        let mut padded;
        let samples = if samples.len() < MIN_DECODE_SAMPLES {
            padded = samples.to_vec();
            padded.resize(MIN_DECODE_SAMPLES, 0.0);
            &padded[..]
        } else {
            samples
        };

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| TranscribeError::Recognition(format!("Failed to create Whisper state: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        let language = (self.language != "auto").then_some(self.language.as_str());
        params.set_language(language);
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(self.n_threads);

        state
            .full(params, samples)
            .map_err(|e| TranscribeError::Recognition(format!("Whisper inference failed: {e}")))?;

        let mut text = String::new();
        for seg_idx in 0..state.full_n_segments() {
            let Some(segment) = state.get_segment(seg_idx) else {
                continue;
            };
            for tok_idx in 0..segment.n_tokens() {
                let Some(token) = segment.get_token(tok_idx) else {
                    continue;
                };
                let Ok(piece) = token.to_str() else {
                    continue;
                };
                if !is_special_token(piece) {
                    text.push_str(piece);
                }
            }
        }

        Ok(text.trim().to_string())
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn create_session(
        &self,
        sample_rate: u32,
    ) -> Result<Box<dyn RecognizerSession + '_>, TranscribeError> {
        if sample_rate != TARGET_SAMPLE_RATE {
            return Err(TranscribeError::Recognition(format!(
                "Whisper requires {TARGET_SAMPLE_RATE} Hz audio, got {sample_rate} Hz"
            )));
        }
        Ok(Box::new(WhisperSession::new(self)))
    }
}

struct WhisperSession<'a> {
    recognizer: &'a WhisperRecognizer,
    window: SampleWindow,
    completed: Option<String>,
}

impl<'a> WhisperSession<'a> {
    fn new(recognizer: &'a WhisperRecognizer) -> Self {
        Self {
            recognizer,
            window: SampleWindow::new(WHISPER_WINDOW_SAMPLES),
            completed: None,
        }
    }
}

impl RecognizerSession for WhisperSession<'_> {
    fn accept_waveform(&mut self, samples: &[i16]) -> Result<bool, TranscribeError> {
        self.window.extend(samples);
        match self.window.take_full() {
            Some(window) => {
                self.completed = Some(self.recognizer.decode(&window)?);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn result(&mut self) -> Result<RecognitionResult, TranscribeError> {
        Ok(RecognitionResult::new(
            self.completed.take().unwrap_or_default(),
        ))
    }

    fn final_result(&mut self) -> Result<RecognitionResult, TranscribeError> {
        let rest = self.window.take_rest();
        Ok(RecognitionResult::new(self.recognizer.decode(&rest)?))
    }
}

/// Buffer of normalized samples, released one fixed-size window at a time.
#[derive(Debug)]
struct SampleWindow {
    capacity: usize,
    buffer: Vec<f32>,
}

impl SampleWindow {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buffer: Vec::with_capacity(capacity),
        }
    }

    fn extend(&mut self, samples: &[i16]) {
        self.buffer
            .extend(samples.iter().map(|&s| s as f32 / 32768.0));
    }

    fn take_full(&mut self) -> Option<Vec<f32>> {
        if self.buffer.len() < self.capacity {
            return None;
        }
        Some(self.buffer.drain(..self.capacity).collect())
    }

    fn take_rest(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.buffer)
    }
}

/// Control tokens such as `[_BEG_]` or `<|endoftext|>`.
fn is_special_token(piece: &str) -> bool {
    let trimmed = piece.trim();
    trimmed.starts_with("[_") || trimmed.starts_with("<|")
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
