use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use vidscribe_core::shared::constants::{
    APP_DIR_NAME, DEFAULT_CHUNK_FRAMES, DEFAULT_FFMPEG_PROGRAM, VOSK_MODEL_NAME,
    WHISPER_DEFAULT_LANGUAGE, WHISPER_MODEL_FILENAME,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Vosk,
    Whisper,
}

impl Engine {
    pub fn default_model(self) -> &'static str {
        match self {
            Engine::Vosk => VOSK_MODEL_NAME,
            Engine::Whisper => WHISPER_MODEL_FILENAME,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        if cfg!(feature = "vosk") {
            Engine::Vosk
        } else {
            Engine::Whisper
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Vosk => write!(f, "vosk"),
            Engine::Whisper => write!(f, "whisper"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// Run the ffmpeg executable.
    #[default]
    Command,
    /// Decode in-process with the ffmpeg libraries.
    Library,
}

/// Persistent defaults, overridden per run by command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: Engine,
    pub model: Option<PathBuf>,
    pub converter: ConverterKind,
    pub ffmpeg: PathBuf,
    pub chunk_frames: usize,
    pub scratch_dir: Option<PathBuf>,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            model: None,
            converter: ConverterKind::default(),
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG_PROGRAM),
            chunk_frames: DEFAULT_CHUNK_FRAMES,
            scratch_dir: None,
            language: WHISPER_DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or malformed files fall back to the defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// The model to load: the configured path, else the engine's default name.
    pub fn model_or_default(&self) -> PathBuf {
        self.model
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.engine.default_model()))
    }
}
