use std::path::Path;
use std::time::Instant;

use crate::audio::domain::speech_recognizer::SpeechRecognizer;
use crate::audio::domain::transcript::Transcript;
use crate::audio::infrastructure::wav_chunk_reader::WavChunkReader;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::DEFAULT_CHUNK_FRAMES;
use crate::shared::error::TranscribeError;

/// Feeds a validated waveform through a recognizer session chunk by chunk
/// and writes the resulting transcript.
pub struct TranscribeAudioUseCase<'r> {
    recognizer: &'r dyn SpeechRecognizer,
    chunk_frames: usize,
}

impl<'r> TranscribeAudioUseCase<'r> {
    pub fn new(recognizer: &'r dyn SpeechRecognizer) -> Self {
        Self {
            recognizer,
            chunk_frames: DEFAULT_CHUNK_FRAMES,
        }
    }

    pub fn with_chunk_frames(mut self, chunk_frames: usize) -> Self {
        self.chunk_frames = chunk_frames.max(1);
        self
    }

    /// Transcribe `wav_path` into `output_path`, returning the written text.
    ///
    /// The waveform header is checked before a session is created, so a
    /// layout mismatch fails without any recognition work.
    pub fn execute(
        &self,
        wav_path: &Path,
        output_path: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<String, TranscribeError> {
        let start = Instant::now();
        let chunks = WavChunkReader::open(wav_path, self.chunk_frames)?;
        let total_chunks = chunks.total_chunks();
        logger.metric("audio_secs", chunks.duration_secs());

        let mut session = self.recognizer.create_session(chunks.spec().sample_rate)?;
        let mut transcript = Transcript::new();

        logger.info("Transcribing audio...");
        for (index, chunk) in chunks.enumerate() {
            let chunk = chunk?;
            if session.accept_waveform(&chunk)? {
                transcript.push_segment(&session.result()?.text);
            }
            logger.progress(index + 1, total_chunks);
        }
        transcript.push_final(&session.final_result()?.text);
        drop(session);

        let text = transcript.as_text();
        std::fs::write(output_path, text).map_err(|e| TranscribeError::io(output_path, e))?;

        logger.metric("segments", transcript.segment_count() as f64);
        logger.timing("transcribe", start.elapsed().as_secs_f64() * 1000.0);
        logger.info(&format!(
            "Transcription completed and saved to {}",
            output_path.display()
        ));
        Ok(transcript.into_text())
    }
}
