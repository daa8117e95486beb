pub mod speech_recognizer;
pub mod transcript;
pub mod waveform_spec;
