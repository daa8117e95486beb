use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader};

use crate::audio::domain::waveform_spec::WaveformSpec;
use crate::shared::error::TranscribeError;

/// Reads a PCM WAV file in fixed-size frame chunks using hound.
///
/// The header is validated on open, so a reader only exists for waveforms
/// that satisfy the mono/16-bit/16 kHz contract.
pub struct WavChunkReader {
    path: PathBuf,
    reader: WavReader<BufReader<File>>,
    spec: WaveformSpec,
    chunk_frames: usize,
    exhausted: bool,
}

impl WavChunkReader {
    pub fn open(path: &Path, chunk_frames: usize) -> Result<Self, TranscribeError> {
        let reader = WavReader::open(path).map_err(|e| TranscribeError::waveform(path, e))?;
        let wav_spec = reader.spec();
        let spec = WaveformSpec::from(wav_spec);

        spec.validate()?;
        if wav_spec.sample_format != SampleFormat::Int {
            return Err(TranscribeError::InvalidAudioFormat(spec));
        }

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            spec,
            chunk_frames: chunk_frames.max(1),
            exhausted: false,
        })
    }

    pub fn spec(&self) -> WaveformSpec {
        self.spec
    }

    pub fn total_frames(&self) -> u32 {
        self.reader.duration()
    }

    pub fn total_chunks(&self) -> usize {
        (self.total_frames() as usize).div_ceil(self.chunk_frames)
    }

    pub fn duration_secs(&self) -> f64 {
        self.spec.duration_secs(self.total_frames())
    }

    fn read_chunk(&mut self) -> Result<Vec<i16>, TranscribeError> {
        let wanted = self.chunk_frames * self.spec.channels as usize;
        self.reader
            .samples::<i16>()
            .take(wanted)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| TranscribeError::waveform(&self.path, e))
    }
}

impl Iterator for WavChunkReader {
    type Item = Result<Vec<i16>, TranscribeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        match self.read_chunk() {
            Ok(chunk) if chunk.is_empty() => {
                self.exhausted = true;
                None
            }
            Ok(chunk) => Some(Ok(chunk)),
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}
