pub mod pipeline_logger;
pub mod scratch_waveform;
pub mod transcribe_audio_use_case;
pub mod transcribe_video_use_case;

pub use transcribe_video_use_case::transcribe_video;
