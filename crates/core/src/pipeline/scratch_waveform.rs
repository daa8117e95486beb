use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::shared::constants::{SCRATCH_PREFIX, SCRATCH_WAV_FILENAME};
use crate::shared::error::TranscribeError;

/// Scope guard for the intermediate waveform of one pipeline run.
///
/// Each run gets its own temporary directory, so concurrent runs never share
/// a waveform path. Dropping the guard deletes the waveform (if the converter
/// created it) together with its directory, on success and failure alike.
pub struct ScratchWaveform {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchWaveform {
    /// Reserve a waveform path in a fresh directory under `parent`, or under
    /// the system temp dir when `parent` is `None`. The file itself is not
    /// created.
    pub fn create(parent: Option<&Path>) -> Result<Self, TranscribeError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match parent {
            Some(parent) => builder
                .tempdir_in(parent)
                .map_err(|e| TranscribeError::io(parent, e))?,
            None => builder
                .tempdir()
                .map_err(|e| TranscribeError::io(std::env::temp_dir(), e))?,
        };
        let path = dir.path().join(SCRATCH_WAV_FILENAME);
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the waveform and its directory now, reporting failures.
    pub fn close(mut self) -> Result<(), TranscribeError> {
        self.remove()
    }

    fn remove(&mut self) -> Result<(), TranscribeError> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        let existed = self.path.exists();
        let dir_path = dir.path().to_path_buf();
        dir.close().map_err(|e| TranscribeError::io(dir_path, e))?;
        if existed {
            log::info!("Deleted temporary file {}", self.path.display());
        }
        Ok(())
    }
}

impl Drop for ScratchWaveform {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            log::warn!("Failed to delete temporary file {}: {e}", self.path.display());
        }
    }
}
