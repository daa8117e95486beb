use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::audio::domain::waveform_spec::WaveformSpec;

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("media conversion failed: {0}")]
    ConversionFailed(#[from] ConversionFailure),
    #[error("audio must be WAV format mono PCM with 16000 Hz sample rate, got {0}")]
    InvalidAudioFormat(WaveformSpec),
    #[error("failed to load recognition model: {0}")]
    ModelLoadFailed(String),
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read waveform {path}: {source}")]
    Waveform {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

/// Why a media file could not be turned into the target waveform.
#[derive(Error, Debug)]
pub enum ConversionFailure {
    #[error("converter exited with {0}")]
    Exited(ExitStatus),
    #[error("could not decode media: {0}")]
    Decode(#[source] ffmpeg_next::Error),
}

impl From<ffmpeg_next::Error> for TranscribeError {
    fn from(e: ffmpeg_next::Error) -> Self {
        Self::ConversionFailed(ConversionFailure::Decode(e))
    }
}

impl TranscribeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn waveform(path: impl Into<PathBuf>, source: hound::Error) -> Self {
        Self::Waveform {
            path: path.into(),
            source,
        }
    }
}
