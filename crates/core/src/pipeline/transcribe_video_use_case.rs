use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::audio::domain::speech_recognizer::SpeechRecognizer;
use crate::media::domain::media_converter::MediaConverter;
use crate::media::infrastructure::ffmpeg_command_converter::FfmpegCommandConverter;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger, StdoutPipelineLogger};
use crate::pipeline::scratch_waveform::ScratchWaveform;
use crate::pipeline::transcribe_audio_use_case::TranscribeAudioUseCase;
use crate::shared::constants::DEFAULT_CHUNK_FRAMES;
use crate::shared::error::TranscribeError;
use crate::shared::model_locator;

/// Convert a media file to a scratch waveform, transcribe it, and remove the
/// waveform whatever the outcome.
pub struct TranscribeVideoUseCase {
    converter: Box<dyn MediaConverter>,
    recognizer: Box<dyn SpeechRecognizer>,
    logger: Box<dyn PipelineLogger>,
    chunk_frames: usize,
    scratch_parent: Option<PathBuf>,
}

impl TranscribeVideoUseCase {
    pub fn new(
        converter: Box<dyn MediaConverter>,
        recognizer: Box<dyn SpeechRecognizer>,
        logger: Option<Box<dyn PipelineLogger>>,
    ) -> Self {
        Self {
            converter,
            recognizer,
            logger: logger.unwrap_or_else(|| Box::new(NullPipelineLogger)),
            chunk_frames: DEFAULT_CHUNK_FRAMES,
            scratch_parent: None,
        }
    }

    pub fn with_chunk_frames(mut self, chunk_frames: usize) -> Self {
        self.chunk_frames = chunk_frames;
        self
    }

    /// Directory under which the per-run scratch directory is created.
    pub fn with_scratch_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.scratch_parent = Some(parent.into());
        self
    }

    pub fn execute(&mut self, input: &Path, output: &Path) -> Result<String, TranscribeError> {
        let scratch = ScratchWaveform::create(self.scratch_parent.as_deref())?;
        let result = self.convert_and_transcribe(input, output, scratch.path());

        let cleanup = Instant::now();
        if let Err(e) = scratch.close() {
            log::warn!("Failed to delete temporary file: {e}");
        }
        self.logger
            .timing("cleanup", cleanup.elapsed().as_secs_f64() * 1000.0);
        self.logger.summary();

        result
    }

    fn convert_and_transcribe(
        &mut self,
        input: &Path,
        output: &Path,
        wav_path: &Path,
    ) -> Result<String, TranscribeError> {
        let start = Instant::now();
        self.logger.info(&format!(
            "Converting {} to {}...",
            input.display(),
            wav_path.display()
        ));
        self.converter.convert(input, wav_path)?;
        self.logger
            .timing("convert", start.elapsed().as_secs_f64() * 1000.0);
        self.logger.info("Conversion completed.");

        TranscribeAudioUseCase::new(self.recognizer.as_ref())
            .with_chunk_frames(self.chunk_frames)
            .execute(wav_path, output, self.logger.as_mut())
    }
}

/// Transcribe `input` into `output` with the `ffmpeg` executable and the
/// default recognizer, loading the model from `model_path` or from the
/// default bundled model name. Milestones go to the `log` crate.
///
/// The model is loaded before conversion starts, so a missing model is
/// reported ahead of any conversion failure.
pub fn transcribe_video(
    input: &Path,
    output: &Path,
    model_path: Option<&Path>,
) -> Result<String, TranscribeError> {
    let recognizer = load_default_recognizer(model_path)?;
    TranscribeVideoUseCase::new(
        Box::new(FfmpegCommandConverter::new()),
        recognizer,
        Some(Box::new(StdoutPipelineLogger::default())),
    )
    .execute(input, output)
}

#[cfg(feature = "vosk")]
fn load_default_recognizer(
    model_path: Option<&Path>,
) -> Result<Box<dyn SpeechRecognizer>, TranscribeError> {
    use crate::audio::infrastructure::vosk_recognizer::VoskRecognizer;
    use crate::shared::constants::VOSK_MODEL_NAME;

    let path = model_locator::locate(model_path.unwrap_or(Path::new(VOSK_MODEL_NAME)))?;
    Ok(Box::new(VoskRecognizer::load(&path)?))
}

#[cfg(not(feature = "vosk"))]
fn load_default_recognizer(
    model_path: Option<&Path>,
) -> Result<Box<dyn SpeechRecognizer>, TranscribeError> {
    use crate::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
    use crate::shared::constants::WHISPER_MODEL_FILENAME;

    let path = model_locator::locate(model_path.unwrap_or(Path::new(WHISPER_MODEL_FILENAME)))?;
    Ok(Box::new(WhisperRecognizer::load(&path)?))
}
