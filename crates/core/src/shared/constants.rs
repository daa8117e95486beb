/// Waveform contract expected by every recognizer.
pub const TARGET_SAMPLE_RATE: u32 = 16000;
pub const TARGET_CHANNELS: u16 = 1;
pub const TARGET_BITS_PER_SAMPLE: u16 = 16;

/// Frames handed to the recognizer per submission.
pub const DEFAULT_CHUNK_FRAMES: usize = 4000;

pub const VOSK_MODEL_NAME: &str = "vosk-model-small-en-us-0.15";
pub const WHISPER_MODEL_FILENAME: &str = "ggml-tiny.en.bin";

/// Whisper decodes at most 30 seconds of audio per pass.
pub const WHISPER_WINDOW_SAMPLES: usize = 30 * TARGET_SAMPLE_RATE as usize;
pub const WHISPER_DEFAULT_LANGUAGE: &str = "en";

pub const SCRATCH_PREFIX: &str = "vidscribe-";
pub const SCRATCH_WAV_FILENAME: &str = "audio.wav";
pub const DEFAULT_FFMPEG_PROGRAM: &str = "ffmpeg";

/// Per-user directory (under the platform data dir) searched for models.
pub const APP_DIR_NAME: &str = "vidscribe";
