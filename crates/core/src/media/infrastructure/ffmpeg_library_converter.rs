use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ffmpeg_next::format::sample::Type as SampleLayout;
use ffmpeg_next::format::Sample;
use ffmpeg_next::util::frame::audio::Audio;

use crate::audio::domain::waveform_spec::WaveformSpec;
use crate::media::domain::media_converter::MediaConverter;
use crate::shared::error::TranscribeError;

type WavOut = hound::WavWriter<BufWriter<File>>;

/// Decodes the best audio stream in-process with ffmpeg-next and writes it
/// as a mono 16-bit 16 kHz WAV with hound.
///
/// Needs no `ffmpeg` executable on the PATH, only the shared libraries.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegLibraryConverter;

impl MediaConverter for FfmpegLibraryConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<(), TranscribeError> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(input)?;

        let audio_stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or(ffmpeg_next::Error::StreamNotFound)?;
        let audio_stream_index = audio_stream.index();
        let codec_params = audio_stream.parameters();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(codec_params)?;
        let mut decoder = codec_ctx.decoder().audio()?;

        let target = WaveformSpec::TARGET;
        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            Sample::I16(SampleLayout::Packed),
            ffmpeg_next::ChannelLayout::MONO,
            target.sample_rate,
        )?;

        let spec = hound::WavSpec {
            channels: target.channels,
            sample_rate: target.sample_rate,
            bits_per_sample: target.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer =
            hound::WavWriter::create(output, spec).map_err(|e| TranscribeError::waveform(output, e))?;

        let mut decoded_frame = Audio::empty();
        let mut resampled_frame = Audio::empty();

        for (stream, packet) in ictx.packets() {
            if stream.index() != audio_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                resampler.run(&decoded_frame, &mut resampled_frame)?;
                write_i16_samples(&resampled_frame, &mut writer, output)?;
            }
        }

        // Flush the decoder
        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            resampler.run(&decoded_frame, &mut resampled_frame)?;
            write_i16_samples(&resampled_frame, &mut writer, output)?;
        }

        // The resampler may still hold buffered samples
        if let Ok(Some(delay)) = resampler.flush(&mut resampled_frame) {
            if delay.output > 0 {
                write_i16_samples(&resampled_frame, &mut writer, output)?;
            }
        }

        writer
            .finalize()
            .map_err(|e| TranscribeError::waveform(output, e))
    }
}

/// Write the samples of a packed mono i16 frame.
fn write_i16_samples(frame: &Audio, writer: &mut WavOut, output: &Path) -> Result<(), TranscribeError> {
    let num_samples = frame.samples();
    if num_samples == 0 {
        return Ok(());
    }
    let bytes = &frame.data(0)[..num_samples * 2];
    for pair in bytes.chunks_exact(2) {
        writer
            .write_sample(i16::from_ne_bytes([pair[0], pair[1]]))
            .map_err(|e| TranscribeError::waveform(output, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::shared::error::ConversionFailure;

    #[test]
    fn test_convert_nonexistent_file_is_conversion_failure() {
        let tmp = TempDir::new().unwrap();
        let path = if cfg!(windows) {
            Path::new("Z:\\nonexistent\\file.mp4")
        } else {
            Path::new("/nonexistent/file.mp4")
        };
        let result = FfmpegLibraryConverter.convert(path, &tmp.path().join("out.wav"));
        assert!(matches!(
            result,
            Err(TranscribeError::ConversionFailed(ConversionFailure::Decode(_)))
        ));
    }

    #[test]
    fn test_convert_garbage_input_is_conversion_failure() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("garbage.mp4");
        std::fs::write(&input, b"this is not a media container").unwrap();
        let result = FfmpegLibraryConverter.convert(&input, &tmp.path().join("out.wav"));
        assert!(
            matches!(
                result,
                Err(TranscribeError::ConversionFailed(ConversionFailure::Decode(_)))
            ),
            "got {result:?}"
        );
    }

    #[test]
    fn test_resamples_wav_to_target_layout() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&input, spec).unwrap();
        for i in 0..44100 * 2 {
            writer.write_sample(((i % 200) as i16 - 100) * 50).unwrap();
        }
        writer.finalize().unwrap();

        let output = tmp.path().join("out.wav");
        FfmpegLibraryConverter.convert(&input, &output).unwrap();

        let reader = hound::WavReader::open(&output).unwrap();
        assert_eq!(WaveformSpec::from(reader.spec()), WaveformSpec::TARGET);
        let frames = reader.duration() as i64;
        assert!((frames - 16000).abs() < 400, "got {frames} frames");
    }
}
