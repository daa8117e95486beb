mod settings;

use std::path::PathBuf;
use std::process;

use clap::Parser;

use vidscribe_core::audio::domain::speech_recognizer::SpeechRecognizer;
use vidscribe_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use vidscribe_core::media::domain::media_converter::MediaConverter;
use vidscribe_core::media::infrastructure::ffmpeg_command_converter::FfmpegCommandConverter;
use vidscribe_core::media::infrastructure::ffmpeg_library_converter::FfmpegLibraryConverter;
use vidscribe_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use vidscribe_core::pipeline::transcribe_video_use_case::TranscribeVideoUseCase;
use vidscribe_core::shared::model_locator;
use vidscribe_core::TranscribeError;

use settings::{ConverterKind, Engine, Settings};

/// Transcribe the speech in a video or audio file to text.
#[derive(Parser, Debug)]
#[command(name = "vidscribe")]
struct Cli {
    /// Input media file (any container/codec ffmpeg can decode).
    input: PathBuf,

    /// Output transcript text file.
    output: PathBuf,

    /// Recognition model directory (Vosk) or file (Whisper).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Speech recognition engine.
    #[arg(long, value_enum)]
    engine: Option<Engine>,

    /// How media is converted to a waveform.
    #[arg(long, value_enum)]
    converter: Option<ConverterKind>,

    /// ffmpeg executable used by the command converter.
    #[arg(long)]
    ffmpeg: Option<PathBuf>,

    /// Audio frames submitted to the recognizer at a time.
    #[arg(long)]
    chunk_frames: Option<usize>,

    /// Directory in which the temporary waveform is created.
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Spoken language for Whisper (`auto` to detect).
    #[arg(long)]
    language: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = apply(Settings::load(), &cli);
    validate(&cli, &settings)?;

    let recognizer = build_recognizer(&settings)?;
    let converter = build_converter(&settings);

    let mut use_case = TranscribeVideoUseCase::new(
        converter,
        recognizer,
        Some(Box::new(StdoutPipelineLogger::default())),
    )
    .with_chunk_frames(settings.chunk_frames);
    if let Some(dir) = &settings.scratch_dir {
        use_case = use_case.with_scratch_parent(dir);
    }

    use_case.execute(&cli.input, &cli.output)?;
    Ok(())
}

/// Layer command-line flags over the settings file.
fn apply(mut settings: Settings, cli: &Cli) -> Settings {
    if let Some(engine) = cli.engine {
        if engine != settings.engine {
            // A configured model belongs to the configured engine.
            settings.model = None;
        }
        settings.engine = engine;
    }
    if let Some(model) = &cli.model {
        settings.model = Some(model.clone());
    }
    if let Some(converter) = cli.converter {
        settings.converter = converter;
    }
    if let Some(ffmpeg) = &cli.ffmpeg {
        settings.ffmpeg = ffmpeg.clone();
    }
    if let Some(chunk_frames) = cli.chunk_frames {
        settings.chunk_frames = chunk_frames;
    }
    if let Some(dir) = &cli.scratch_dir {
        settings.scratch_dir = Some(dir.clone());
    }
    if let Some(language) = &cli.language {
        settings.language = language.clone();
    }
    settings
}

fn validate(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(TranscribeError::Io {
            path: cli.input.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "input file not found"),
        }
        .into());
    }
    if settings.chunk_frames == 0 {
        return Err("Chunk frames must be a positive integer, got 0".into());
    }
    if let Some(dir) = &settings.scratch_dir {
        if !dir.is_dir() {
            return Err(format!("Scratch directory not found: {}", dir.display()).into());
        }
    }
    Ok(())
}

fn build_converter(settings: &Settings) -> Box<dyn MediaConverter> {
    match settings.converter {
        ConverterKind::Command => {
            Box::new(FfmpegCommandConverter::new().with_program(&settings.ffmpeg))
        }
        ConverterKind::Library => Box::new(FfmpegLibraryConverter),
    }
}

fn build_recognizer(
    settings: &Settings,
) -> Result<Box<dyn SpeechRecognizer>, Box<dyn std::error::Error>> {
    let model_path = model_locator::locate(&settings.model_or_default())?;
    log::info!("Using {} model: {}", settings.engine, model_path.display());

    match settings.engine {
        Engine::Whisper => Ok(Box::new(
            WhisperRecognizer::load(&model_path)?.with_language(settings.language.as_str()),
        )),
        Engine::Vosk => load_vosk(&model_path),
    }
}

#[cfg(feature = "vosk")]
fn load_vosk(
    model_path: &std::path::Path,
) -> Result<Box<dyn SpeechRecognizer>, Box<dyn std::error::Error>> {
    use vidscribe_core::audio::infrastructure::vosk_recognizer::VoskRecognizer;
    Ok(Box::new(VoskRecognizer::load(model_path)?))
}

#[cfg(not(feature = "vosk"))]
fn load_vosk(
    _model_path: &std::path::Path,
) -> Result<Box<dyn SpeechRecognizer>, Box<dyn std::error::Error>> {
    Err(TranscribeError::ModelLoadFailed(
        "this build has no Vosk support; rebuild with `--features vosk` or use `--engine whisper`"
            .to_string(),
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vidscribe").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_arguments_only() {
        let cli = parse(&["speech_sample.mp4", "out.txt"]);
        assert_eq!(cli.input, PathBuf::from("speech_sample.mp4"));
        assert_eq!(cli.output, PathBuf::from("out.txt"));
        assert!(cli.model.is_none());

        let settings = apply(Settings::default(), &cli);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_output_is_rejected() {
        let result = Cli::try_parse_from(["vidscribe", "in.mp4"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = parse(&[
            "in.mp4",
            "out.txt",
            "--engine",
            "whisper",
            "--model",
            "models/ggml-base.en.bin",
            "--converter",
            "library",
            "--chunk-frames",
            "8000",
            "--language",
            "auto",
        ]);
        let settings = apply(Settings::default(), &cli);
        assert_eq!(settings.engine, Engine::Whisper);
        assert_eq!(settings.model, Some(PathBuf::from("models/ggml-base.en.bin")));
        assert_eq!(settings.converter, ConverterKind::Library);
        assert_eq!(settings.chunk_frames, 8000);
        assert_eq!(settings.language, "auto");
    }

    #[test]
    fn test_switching_engine_drops_configured_model() {
        let base = Settings {
            engine: Engine::Vosk,
            model: Some(PathBuf::from("vosk-model-en")),
            ..Settings::default()
        };
        let settings = apply(base, &parse(&["in.mp4", "out.txt", "--engine", "whisper"]));
        assert_eq!(settings.model, None);
        assert_eq!(settings.model_or_default(), PathBuf::from("ggml-tiny.en.bin"));
    }

    #[test]
    fn test_same_engine_keeps_configured_model() {
        let base = Settings {
            engine: Engine::Vosk,
            model: Some(PathBuf::from("vosk-model-en")),
            ..Settings::default()
        };
        let settings = apply(base, &parse(&["in.mp4", "out.txt", "--engine", "vosk"]));
        assert_eq!(settings.model, Some(PathBuf::from("vosk-model-en")));
    }

    #[test]
    fn test_validate_missing_input() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("missing.mp4");
        let cli = parse(&[input.to_str().unwrap(), "out.txt"]);
        let err = validate(&cli, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("input file not found"), "got: {err}");
        match err.downcast_ref::<TranscribeError>() {
            Some(TranscribeError::Io { path, source }) => {
                assert_eq!(path, &input);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[rstest]
    #[case::zero_chunk(0, false)]
    #[case::default_chunk(4000, true)]
    fn test_validate_chunk_frames(#[case] chunk_frames: usize, #[case] ok: bool) {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in.mp4");
        std::fs::write(&input, b"media").unwrap();
        let cli = parse(&[input.to_str().unwrap(), "out.txt"]);
        let settings = Settings {
            chunk_frames,
            ..Settings::default()
        };
        assert_eq!(validate(&cli, &settings).is_ok(), ok);
    }

    #[test]
    fn test_validate_missing_scratch_dir() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in.mp4");
        std::fs::write(&input, b"media").unwrap();
        let cli = parse(&[input.to_str().unwrap(), "out.txt"]);
        let settings = Settings {
            scratch_dir: Some(tmp.path().join("nope")),
            ..Settings::default()
        };
        let err = validate(&cli, &settings).unwrap_err();
        assert!(err.to_string().contains("Scratch directory not found"));
    }

    #[test]
    fn test_build_recognizer_missing_model_fails() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings {
            engine: Engine::Whisper,
            model: Some(tmp.path().join("ggml-missing.bin")),
            ..Settings::default()
        };
        let err = build_recognizer(&settings).err().unwrap();
        assert!(err.to_string().contains("model not found"), "got: {err}");
    }

    #[cfg(not(feature = "vosk"))]
    #[test]
    fn test_vosk_engine_without_feature_fails() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("vosk-model");
        std::fs::create_dir(&model).unwrap();
        let settings = Settings {
            engine: Engine::Vosk,
            model: Some(model),
            ..Settings::default()
        };
        let err = build_recognizer(&settings).err().unwrap();
        assert!(err.to_string().contains("no Vosk support"), "got: {err}");
    }
}
