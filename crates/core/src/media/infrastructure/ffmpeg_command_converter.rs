use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::media::domain::media_converter::MediaConverter;
use crate::shared::constants::{DEFAULT_FFMPEG_PROGRAM, TARGET_CHANNELS, TARGET_SAMPLE_RATE};
use crate::shared::error::{ConversionFailure, TranscribeError};

/// Converts media by running the `ffmpeg` executable as a child process.
///
/// The child inherits stderr so ffmpeg's own diagnostics reach the user.
#[derive(Clone, Debug)]
pub struct FfmpegCommandConverter {
    program: PathBuf,
}

impl FfmpegCommandConverter {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_FFMPEG_PROGRAM),
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn arguments(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(input.as_os_str().to_owned());
        args.extend(
            [
                "-vn".to_string(),
                "-ac".to_string(),
                TARGET_CHANNELS.to_string(),
                "-ar".to_string(),
                TARGET_SAMPLE_RATE.to_string(),
                "-acodec".to_string(),
                "pcm_s16le".to_string(),
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl Default for FfmpegCommandConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaConverter for FfmpegCommandConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), TranscribeError> {
        log::debug!(
            "Running {} on {} -> {}",
            self.program.display(),
            input.display(),
            output.display()
        );

        let status = Command::new(&self.program)
            .args(Self::arguments(input, output))
            .status()
            .map_err(|e| TranscribeError::io(&self.program, e))?;

        if !status.success() {
            return Err(ConversionFailure::Exited(status).into());
        }
        Ok(())
    }
}
