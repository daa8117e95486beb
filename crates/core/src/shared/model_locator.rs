use std::path::{Path, PathBuf};

use crate::shared::constants::APP_DIR_NAME;
use crate::shared::error::TranscribeError;

/// Find a recognition model on disk. Nothing is downloaded.
///
/// Resolution order:
/// 1. `model` as given (absolute, or relative to the working directory)
/// 2. Bare model names in the user models directory
pub fn locate(model: &Path) -> Result<PathBuf, TranscribeError> {
    let candidates = candidates(model, models_dir().as_deref());
    if let Some(found) = candidates.iter().find(|c| c.exists()) {
        return Ok(found.clone());
    }

    let searched = candidates
        .iter()
        .map(|c| c.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(TranscribeError::ModelLoadFailed(format!(
        "model not found (searched: {searched})"
    )))
}

/// Per-user directory holding models referenced by bare name.
///
/// - macOS: `~/Library/Application Support/vidscribe/models/`
/// - Linux: `$XDG_DATA_HOME/vidscribe/models/` or `~/.local/share/vidscribe/models/`
/// - Windows: `%APPDATA%/vidscribe/models/`
pub fn models_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR_NAME).join("models"))
}

fn candidates(model: &Path, models_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut out = vec![model.to_path_buf()];
    let is_bare_name = model.components().count() == 1 && model.is_relative();
    if is_bare_name {
        if let Some(dir) = models_dir {
            out.push(dir.join(model));
        }
    }
    out
}
