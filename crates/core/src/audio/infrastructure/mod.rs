#[cfg(feature = "vosk")]
pub mod vosk_recognizer;
pub mod wav_chunk_reader;
pub mod whisper_recognizer;
