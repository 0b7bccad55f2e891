use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{Error, Result};

/// A decoded audio signal: mono f32 samples in [-1, 1] plus the sampling
/// rate they were resampled to.
///
/// Downstream components assume `sample_rate` equals the model's expected
/// rate; [`decode_audio`] establishes that invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Supported audio containers, detected upstream by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,
}

impl AudioFormat {
    /// Maps a path's extension to a supported container, `None` for
    /// everything else.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
        }
    }
}

/// Decodes raw audio bytes into a mono waveform resampled to
/// `target_sample_rate`.
///
/// WAV goes through hound; mp3/flac/ogg are delegated to symphonia. An
/// unreadable or empty container yields [`Error::Decode`], which skips the
/// file without aborting the batch.
pub fn decode_audio(
    bytes: &[u8],
    format: AudioFormat,
    target_sample_rate: u32,
) -> Result<Waveform> {
    if target_sample_rate == 0 {
        return Err(Error::configuration(
            "target sample rate must be a positive integer",
        ));
    }

    let (samples, channels, source_rate) = match format {
        AudioFormat::Wav => decode_wav(bytes)?,
        AudioFormat::Mp3 | AudioFormat::Flac | AudioFormat::Ogg => {
            decode_compressed(bytes, format)?
        }
    };

    if samples.is_empty() {
        return Err(Error::decode("decoded audio contains no samples"));
    }

    let mono = downmix_to_mono(&samples, channels);
    let resampled = resample_linear(&mono, source_rate, target_sample_rate);

    Ok(Waveform::new(resampled, target_sample_rate))
}

fn decode_wav(bytes: &[u8]) -> Result<(Vec<f32>, usize, u32)> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|error| Error::decode(format!("unreadable wav container: {error}")))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|error| Error::decode(format!("corrupt wav samples: {error}")))?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / full_scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|error| Error::decode(format!("corrupt wav samples: {error}")))?
        }
    };

    Ok((samples, spec.channels as usize, spec.sample_rate))
}

fn decode_compressed(bytes: &[u8], format: AudioFormat) -> Result<(Vec<f32>, usize, u32)> {
    let stream = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(format.extension());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|error| {
            Error::decode(format!(
                "unreadable {} container: {error}",
                format.extension()
            ))
        })?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::decode("container holds no decodable audio track"))?;
    let track_id = track.id;

    let source_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::decode("container reports no sample rate"))?;
    let channels = track
        .codec_params
        .channels
        .map(|channels| channels.count())
        .unwrap_or(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|error| Error::decode(format!("unsupported codec: {error}")))?;

    let mut samples = Vec::new();
    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(error) if end_of_stream(&error) => break,
            Err(error) => {
                return Err(Error::decode(format!("corrupt audio stream: {error}")));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            // A malformed packet is recoverable; resynchronize on the next.
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(error) => {
                return Err(Error::decode(format!("decoder failure: {error}")));
            }
        }
    }

    Ok((samples, channels, source_rate))
}

/// Symphonia signals a clean end of stream as `UnexpectedEof`; any other
/// I/O failure mid-stream would silently truncate the waveform if it were
/// treated the same way.
fn end_of_stream(error: &symphonia::core::errors::Error) -> bool {
    match error {
        symphonia::core::errors::Error::IoError(error) => {
            error.kind() == std::io::ErrorKind::UnexpectedEof
        }
        symphonia::core::errors::Error::ResetRequired => true,
        _ => false,
    }
}

/// Averages interleaved channels into a single mono signal.
fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear-interpolation resampler. Returns the input unchanged when the
/// rates already match.
fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let output_len = ((samples.len() as f64) / ratio).round().max(1.0) as usize;

    (0..output_len)
        .map(|index| {
            let position = index as f64 * ratio;
            let left = position.floor() as usize;
            if left + 1 >= samples.len() {
                return samples[samples.len() - 1];
            }
            let fraction = (position - left as f64) as f32;
            samples[left] * (1.0 - fraction) + samples[left + 1] * fraction
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_audio, downmix_to_mono, end_of_stream, resample_linear, AudioFormat};
    use std::io::Cursor;
    use std::path::Path;

    fn wav_bytes(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("writer");
            for sample in samples {
                writer.write_sample(*sample).expect("sample");
            }
            writer.finalize().expect("finalize");
        }
        cursor.into_inner()
    }

    fn wav_bytes_i32(sample_rate: u32, samples: &[i32]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("writer");
            for sample in samples {
                writer.write_sample(*sample).expect("sample");
            }
            writer.finalize().expect("finalize");
        }
        cursor.into_inner()
    }

    fn wav_bytes_f32(sample_rate: u32, samples: &[f32]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("writer");
            for sample in samples {
                writer.write_sample(*sample).expect("sample");
            }
            writer.finalize().expect("finalize");
        }
        cursor.into_inner()
    }

    #[test]
    fn detects_format_from_extension_case_insensitively() {
        assert_eq!(
            AudioFormat::from_path(Path::new("a/b/clip.WAV")),
            Some(AudioFormat::Wav)
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("clip.flac")),
            Some(AudioFormat::Flac)
        );
        assert_eq!(AudioFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(AudioFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn decodes_pcm16_wav_to_normalized_mono() {
        let bytes = wav_bytes(16_000, 1, &[0, 16_384, -16_384, 0]);
        let waveform = decode_audio(&bytes, AudioFormat::Wav, 16_000).expect("decode");

        assert_eq!(waveform.sample_rate, 16_000);
        assert_eq!(waveform.len(), 4);
        assert!((waveform.samples[1] - 0.5).abs() < 1e-3);
        assert!((waveform.samples[2] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn resamples_to_the_model_rate_during_decode() {
        let bytes = wav_bytes(8_000, 1, &[0; 800]);
        let waveform = decode_audio(&bytes, AudioFormat::Wav, 16_000).expect("decode");

        assert_eq!(waveform.sample_rate, 16_000);
        assert_eq!(waveform.len(), 1_600);
    }

    #[test]
    fn decodes_pcm32_wav_scaled_by_its_bit_depth() {
        let bytes = wav_bytes_i32(16_000, &[0, 1 << 30, -(1 << 30)]);
        let waveform = decode_audio(&bytes, AudioFormat::Wav, 16_000).expect("decode");

        assert_eq!(waveform.len(), 3);
        assert!((waveform.samples[1] - 0.5).abs() < 1e-6);
        assert!((waveform.samples[2] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn decodes_float_wav_without_rescaling() {
        let bytes = wav_bytes_f32(16_000, &[0.25, -0.75, 1.0]);
        let waveform = decode_audio(&bytes, AudioFormat::Wav, 16_000).expect("decode");

        assert_eq!(waveform.samples, vec![0.25, -0.75, 1.0]);
    }

    #[test]
    fn downmixes_stereo_by_averaging() {
        let mono = downmix_to_mono(&[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn resample_is_identity_when_rates_match() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_linear(&samples, 16_000, 16_000), samples);
    }

    #[test]
    fn empty_container_is_a_decode_error() {
        let bytes = wav_bytes(16_000, 1, &[]);
        let error = decode_audio(&bytes, AudioFormat::Wav, 16_000).expect_err("must fail");
        assert!(error.is_file_scoped());
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let error =
            decode_audio(b"definitely not audio", AudioFormat::Wav, 16_000).expect_err("must fail");
        assert!(error.is_file_scoped());
        assert!(error.to_string().contains("decode"));
    }

    #[test]
    fn corrupt_compressed_containers_are_decode_errors() {
        for format in [AudioFormat::Mp3, AudioFormat::Flac, AudioFormat::Ogg] {
            let error =
                decode_audio(b"definitely not audio", format, 16_000).expect_err("must fail");
            assert!(error.is_file_scoped(), "{format:?} must skip, not abort");
        }
    }

    #[test]
    fn only_a_clean_eof_ends_the_packet_loop() {
        use symphonia::core::errors::Error as SymphoniaError;

        let eof = SymphoniaError::IoError(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "end of stream",
        ));
        assert!(end_of_stream(&eof));
        assert!(end_of_stream(&SymphoniaError::ResetRequired));

        let interrupted = SymphoniaError::IoError(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "source went away",
        ));
        assert!(!end_of_stream(&interrupted));
        assert!(!end_of_stream(&SymphoniaError::DecodeError("bad frame")));
    }

    #[test]
    fn zero_target_rate_is_a_configuration_error() {
        let bytes = wav_bytes(16_000, 1, &[1, 2, 3]);
        let error = decode_audio(&bytes, AudioFormat::Wav, 0).expect_err("must fail");
        assert!(!error.is_file_scoped());
    }
}
