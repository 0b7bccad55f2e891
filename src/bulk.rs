//! Batch orchestration: discover files, process them in fixed-size batches
//! through the selected model family, and persist one record per batch.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::audio::{self, AudioFormat};
use crate::chunk;
use crate::config::TranscribeOptions;
use crate::engines;
use crate::error::{Error, Result};
use crate::model::SpeechModel;
use crate::stitch;
use crate::writer::{self, BatchEntry};
use crate::TranscriptResult;

/// Accounting for one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub files_discovered: usize,
    pub files_transcribed: usize,
    pub files_skipped: usize,
    pub batches_written: usize,
}

/// Drives one bulk transcription run with a single loaded model.
///
/// Files and batches are processed strictly sequentially on the calling
/// thread; the only parallelism is inside the external engine family. The
/// model is read-only after construction and reused for every file.
pub struct BulkTranscriber {
    model: SpeechModel,
    options: TranscribeOptions,
}

impl BulkTranscriber {
    pub fn new(model: SpeechModel, options: TranscribeOptions) -> Self {
        Self { model, options }
    }

    pub fn options(&self) -> &TranscribeOptions {
        &self.options
    }

    /// Transcribes every supported audio file under `input_dir` and writes
    /// one record per batch under `output_dir`.
    ///
    /// Decode and inference failures skip the affected file (logged, never
    /// silent); configuration and persistence failures abort the run.
    pub fn run(&self, input_dir: &Path, output_dir: &Path) -> Result<RunSummary> {
        self.validate()?;

        fs::create_dir_all(output_dir)
            .map_err(|error| Error::persistence(output_dir, error))?;

        let files = discover_audio_files(input_dir);
        info!(
            files = files.len(),
            family = %self.model.family(),
            precision = self.options.matmul_precision.label(),
            "starting bulk transcription"
        );

        let mut summary = RunSummary {
            files_discovered: files.len(),
            ..RunSummary::default()
        };

        for batch_start in (0..files.len()).step_by(self.options.batch_size) {
            let batch_end = (batch_start + self.options.batch_size).min(files.len());
            let batch = &files[batch_start..batch_end];

            let mut entries = Vec::with_capacity(batch.len());
            for path in batch {
                match self.transcribe_file(path) {
                    Ok(prediction) => {
                        debug!(path = %path.display(), "transcribed");
                        entries.push(BatchEntry {
                            input: path.display().to_string(),
                            prediction,
                        });
                    }
                    Err(error) if error.is_file_scoped() => {
                        warn!(path = %path.display(), %error, "skipping file");
                        summary.files_skipped += 1;
                    }
                    Err(error) => return Err(error),
                }
            }
            summary.files_transcribed += entries.len();

            // Batch records are keyed by the batch's starting file index.
            writer::write_batch(&entries, output_dir, batch_start)?;
            summary.batches_written += 1;
        }

        info!(
            transcribed = summary.files_transcribed,
            skipped = summary.files_skipped,
            batches = summary.batches_written,
            "bulk transcription finished"
        );

        Ok(summary)
    }

    /// Transcribes a single file through the selected family.
    pub fn transcribe_file(&self, path: &Path) -> Result<TranscriptResult> {
        let format = AudioFormat::from_path(path)
            .ok_or_else(|| Error::decode(format!("unsupported extension: {}", path.display())))?;
        let bytes = fs::read(path)
            .map_err(|error| Error::decode(format!("cannot read {}: {error}", path.display())))?;

        let waveform = audio::decode_audio(&bytes, format, self.options.model_sampling_rate)?;
        self.transcribe_waveform(&waveform)
    }

    fn transcribe_waveform(&self, waveform: &audio::Waveform) -> Result<TranscriptResult> {
        match &self.model {
            SpeechModel::CtcAcoustic {
                model,
                extractor,
                vocabulary,
            } => {
                let segments = engines::ctc::process(
                    model.as_ref(),
                    extractor.as_ref(),
                    vocabulary.as_ref(),
                    waveform,
                    &self.options,
                )?;
                Ok(stitch::stitch(segments))
            }
            SpeechModel::Seq2Seq {
                model,
                extractor,
                decoder,
            } => engines::seq2seq::process(
                model.as_ref(),
                extractor.as_ref(),
                decoder.as_ref(),
                waveform,
                &self.options,
            ),
            SpeechModel::Translation {
                model,
                extractor,
                decoder,
            } => {
                let segments = engines::translation::process(
                    model.as_ref(),
                    extractor.as_ref(),
                    decoder.as_ref(),
                    waveform,
                    &self.options,
                )?;
                Ok(stitch::stitch(segments))
            }
            SpeechModel::Engine { engine } => {
                engines::native::process(engine.as_ref(), waveform, &self.options.engine)
            }
        }
    }

    /// Surfaces configuration problems before the first file is touched.
    fn validate(&self) -> Result<()> {
        if self.options.batch_size == 0 {
            return Err(Error::configuration("batch_size must be a positive integer"));
        }
        if self.options.model_sampling_rate == 0 {
            return Err(Error::configuration(
                "model_sampling_rate must be a positive integer",
            ));
        }
        if self.model.family().uses_chunking() {
            chunk::validate(self.options.chunk_size, self.options.overlap_size)?;
        }
        if let SpeechModel::Seq2Seq { model, .. } = &self.model {
            // Resolve now so an unknown checkpoint aborts before any file.
            crate::alignment::alignment_heads_for(model.name())?;
        }
        Ok(())
    }
}

/// Walks `input_dir` recursively and materializes the candidate file list
/// once, sorted for a stable batch order. Only the fixed extension
/// allow-list (wav, mp3, flac, ogg) is considered; everything else is
/// ignored.
fn discover_audio_files(input_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                warn!(%error, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| AudioFormat::from_path(path).is_some())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::{discover_audio_files, BulkTranscriber};
    use crate::config::TranscribeOptions;
    use crate::error::Result;
    use crate::model::{EngineTranscript, SpeechEngine, SpeechModel};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct NullEngine;

    impl SpeechEngine for NullEngine {
        fn transcribe(
            &self,
            _samples: &[f32],
            _sample_rate: u32,
            _threads: usize,
            _params: &crate::config::EngineParams,
        ) -> Result<EngineTranscript> {
            Ok(EngineTranscript {
                text: String::new(),
                segments: Vec::new(),
            })
        }
    }

    fn engine_transcriber(options: TranscribeOptions) -> BulkTranscriber {
        BulkTranscriber::new(
            SpeechModel::Engine {
                engine: Box::new(NullEngine),
            },
            options,
        )
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be monotonic")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("bulkscribe-bulk-test-{tag}-{nonce}"));
        std::fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    #[test]
    fn zero_batch_size_is_rejected_before_any_file() {
        let transcriber = engine_transcriber(TranscribeOptions {
            batch_size: 0,
            ..TranscribeOptions::default()
        });
        let input = temp_dir("input");
        let output = temp_dir("output");

        let error = transcriber.run(&input, &output).expect_err("must fail");
        assert!(!error.is_file_scoped());

        let _ = std::fs::remove_dir_all(input);
        let _ = std::fs::remove_dir_all(output);
    }

    #[test]
    fn discovery_honors_the_extension_allow_list() {
        let dir = temp_dir("discovery");
        let nested = dir.join("nested");
        std::fs::create_dir_all(&nested).expect("nested dir");

        for name in ["a.wav", "b.mp3", "c.txt", "d.FLAC"] {
            std::fs::write(dir.join(name), b"x").expect("file");
        }
        std::fs::write(nested.join("e.ogg"), b"x").expect("file");

        let files = discover_audio_files(&dir);
        let names: Vec<String> = files
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        assert_eq!(files.len(), 4);
        assert!(names.contains(&"a.wav".to_string()));
        assert!(names.contains(&"d.FLAC".to_string()));
        assert!(names.contains(&"e.ogg".to_string()));
        assert!(!names.contains(&"c.txt".to_string()));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn chunk_geometry_for_chunked_families_is_checked_up_front() {
        struct NoopVocab;
        impl crate::model::CtcVocabulary for NoopVocab {
            fn token(&self, _id: u32) -> Option<String> {
                None
            }
            fn is_special(&self, _id: u32) -> bool {
                false
            }
        }
        struct NoopModel;
        impl crate::model::CtcModel for NoopModel {
            fn feature_norm(&self) -> crate::model::FeatureNorm {
                crate::model::FeatureNorm::Group
            }
            fn forward(&self, _features: &crate::model::Features) -> Result<Vec<Vec<f32>>> {
                Ok(Vec::new())
            }
        }
        struct NoopExtractor;
        impl crate::model::FeatureExtractor for NoopExtractor {
            fn extract(
                &self,
                samples: &[f32],
                _sampling_rate: u32,
                _options: &crate::config::FeatureOptions,
            ) -> Result<crate::model::Features> {
                Ok(crate::model::Features {
                    values: samples.to_vec(),
                    attention_mask: None,
                })
            }
        }

        let transcriber = BulkTranscriber::new(
            SpeechModel::CtcAcoustic {
                model: Box::new(NoopModel),
                extractor: Box::new(NoopExtractor),
                vocabulary: Box::new(NoopVocab),
            },
            TranscribeOptions {
                chunk_size: 8_000,
                overlap_size: 8_000,
                ..TranscribeOptions::default()
            },
        );
        let input = temp_dir("geometry-in");
        let output = temp_dir("geometry-out");

        let error = transcriber.run(&input, &output).expect_err("must fail");
        assert!(!error.is_file_scoped());

        let _ = std::fs::remove_dir_all(input);
        let _ = std::fs::remove_dir_all(output);
    }
}
