//! # bulkscribe
//!
//! Batch speech-to-text transcription across interchangeable model families.
//!
//! Given a directory of audio files and one loaded speech model, the crate
//! decodes each file to a mono waveform at the model's sampling rate, windows
//! long audio when the model family has bounded context, dispatches to the
//! family's inference procedure, stitches per-window output into a single
//! transcript with time offsets, and persists one JSON record per processed
//! batch under a collision-safe name.
//!
//! ## Model families
//!
//! - **CTC acoustic** (wav2vec2-style): per-chunk forward pass, per-frame
//!   arg-max, greedy CTC collapse.
//! - **Seq2seq** (whisper-style): whole-waveform generation with
//!   alignment-heads selection; manages long audio internally, never chunked
//!   here.
//! - **Translation** (seamless-style): per-chunk generation with a
//!   pass-through target language.
//! - **Native engine** (whisper.cpp-style): the whole file is handed to an
//!   external optimized engine and its output is packed verbatim.
//!
//! The loaded model/processor pair is supplied by the caller through the
//! collaborator traits in [`model`]; a [`whisper-rs`] adapter in
//! [`engines::native`] is available behind the `whisper-cpp` feature.
//!
//! ## Quick start
//!
//! ```no_run
//! use bulkscribe::{BulkTranscriber, SpeechModel, TranscribeOptions};
//! # fn load_engine() -> Box<dyn bulkscribe::SpeechEngine> { unimplemented!() }
//!
//! let model = SpeechModel::Engine {
//!     engine: load_engine(),
//! };
//! let transcriber = BulkTranscriber::new(model, TranscribeOptions::default());
//! let summary = transcriber.run("input".as_ref(), "output".as_ref())?;
//! println!(
//!     "transcribed {} of {} files",
//!     summary.files_transcribed, summary.files_discovered
//! );
//! # Ok::<(), bulkscribe::Error>(())
//! ```
//!
//! [`whisper-rs`]: https://crates.io/crates/whisper-rs

pub mod alignment;
pub mod audio;
pub mod bulk;
pub mod chunk;
pub mod config;
pub mod engines;
pub mod error;
pub mod model;
pub mod stitch;
pub mod writer;

use serde::{Deserialize, Serialize};

pub use audio::{decode_audio, AudioFormat, Waveform};
pub use bulk::{BulkTranscriber, RunSummary};
pub use config::{
    EngineParams, FeatureOptions, GenerationParams, MatmulPrecision, Padding, TranscribeOptions,
    TranslationParams,
};
pub use error::{Error, Result};
pub use model::{
    CtcModel, CtcVocabulary, EngineSegment, EngineTranscript, FeatureExtractor, FeatureNorm,
    Features, GeneratedSegment, GenerationOutput, ModelFamily, Seq2SeqModel, SpeechEngine,
    SpeechModel, TokenDecoder, TranslationModel,
};

/// One unit of decoded output.
///
/// Time semantics depend on the model family: chunked families report the
/// overlap-stride convention in samples, seq2seq models report their own
/// start/end times, and the flat seq2seq form produces no segments at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Decoded text for this unit.
    pub tokens: String,
    pub start: f64,
    pub end: f64,
}

/// Final per-file output: the stitched transcript plus the ordered segment
/// list (empty for families that produce no timing info).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub transcription: String,
    pub segments: Vec<TranscriptSegment>,
}
