use std::path::Path;

use crate::shared::error::TranscribeError;

/// Domain interface for transcoding a media file into the recognizer's
/// waveform format (mono, 16-bit PCM, 16 kHz WAV).
///
/// Implementations overwrite `output` and block until conversion finishes.
/// They do not remove partial output on failure.
pub trait MediaConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), TranscribeError>;
}
