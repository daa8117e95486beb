//! Convert the audio track of a media file to a normalized waveform and
//! transcribe it with a pre-trained speech recognition model.

pub mod audio;
pub mod media;
pub mod pipeline;
pub mod shared;

pub use pipeline::transcribe_video;
pub use shared::error::{ConversionFailure, TranscribeError};
