//! Collaborator boundary to the loaded model/processor pair.
//!
//! The loader that produces an inference-capable object is outside this
//! crate; these traits are the contract it implements. A loaded model is
//! read-only for the whole run, so every trait takes `&self` and the pair
//! is reused across files without locking.

use std::fmt;

use crate::config::{FeatureOptions, GenerationParams, TranslationParams};
use crate::error::Result;

/// The broad model architecture category. Selected once at model-load time
/// and carried for the remainder of the run; every file in a run goes
/// through the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    CtcAcoustic,
    Seq2Seq,
    Translation,
    Engine,
}

impl ModelFamily {
    pub fn label(self) -> &'static str {
        match self {
            Self::CtcAcoustic => "ctc-acoustic",
            Self::Seq2Seq => "seq2seq",
            Self::Translation => "translation",
            Self::Engine => "engine",
        }
    }

    /// Whether this family consumes chunked input. Seq2seq models manage
    /// long audio internally and the engine family delegates whole files.
    pub fn uses_chunking(self) -> bool {
        matches!(self, Self::CtcAcoustic | Self::Translation)
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Model input features extracted from a waveform. The layout is owned by
/// the model pair; this crate only carries it across the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    pub values: Vec<f32>,
    pub attention_mask: Option<Vec<u8>>,
}

/// Feature-extraction normalization mode reported by a CTC model. Layer
/// normalization requires an attention mask on the forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureNorm {
    Group,
    Layer,
}

/// Feature-extraction side of the processor.
pub trait FeatureExtractor {
    fn extract(
        &self,
        samples: &[f32],
        sampling_rate: u32,
        options: &FeatureOptions,
    ) -> Result<Features>;
}

/// Frame-level acoustic model (wav2vec2-style).
pub trait CtcModel {
    fn feature_norm(&self) -> FeatureNorm;

    /// One forward pass; returns per-frame class logits, one row per
    /// output frame. Runs without gradient tracking.
    fn forward(&self, features: &Features) -> Result<Vec<Vec<f32>>>;
}

/// Vocabulary side of a CTC processor: class id to token text, plus which
/// ids are special (blank/pad/eos) and dropped during decoding.
pub trait CtcVocabulary {
    fn token(&self, id: u32) -> Option<String>;
    fn is_special(&self, id: u32) -> bool;
}

/// One model-reported segment from a structured generation output.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSegment {
    pub tokens: Vec<u32>,
    /// Start time in seconds, as reported by the model.
    pub start: f64,
    pub end: f64,
}

/// What an autoregressive generation call produced: either one flat token
/// sequence or per-segment token arrays with timing.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    Tokens(Vec<u32>),
    Segments(Vec<GeneratedSegment>),
}

/// Autoregressive sequence-to-sequence model (whisper-style).
pub trait Seq2SeqModel {
    /// Model identifier used to resolve the alignment-heads table entry.
    fn name(&self) -> &str;

    /// Generation over the full waveform's features. `alignment_heads` is
    /// the resolved token-to-time alignment configuration for this model.
    fn generate(
        &self,
        features: &Features,
        alignment_heads: &[(u32, u32)],
        params: &GenerationParams,
    ) -> Result<GenerationOutput>;
}

/// Token-to-text side of a generative processor.
pub trait TokenDecoder {
    fn decode(&self, tokens: &[u32], skip_special: bool) -> String;
}

/// Multilingual translation-style model (seamless-style). Generation runs
/// per chunk and may return several token rows per call.
pub trait TranslationModel {
    fn generate(&self, features: &Features, params: &TranslationParams) -> Result<Vec<Vec<u32>>>;
}

/// Segment metadata reported by an external engine. Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSegment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Opaque transcript returned by an external engine; packed into the batch
/// record without semantic reinterpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineTranscript {
    pub text: String,
    pub segments: Vec<EngineSegment>,
}

/// External optimized inference engine (whisper.cpp-style). The engine owns
/// its own parallelism; `threads` caps its fan-out for one file.
pub trait SpeechEngine {
    fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
        threads: usize,
        params: &crate::config::EngineParams,
    ) -> Result<EngineTranscript>;
}

/// A loaded model/processor pair, tagged with its family.
///
/// This is the closed set of supported families; dispatch happens by
/// matching on the variant, once per file, with the variant chosen once at
/// load time.
pub enum SpeechModel {
    CtcAcoustic {
        model: Box<dyn CtcModel>,
        extractor: Box<dyn FeatureExtractor>,
        vocabulary: Box<dyn CtcVocabulary>,
    },
    Seq2Seq {
        model: Box<dyn Seq2SeqModel>,
        extractor: Box<dyn FeatureExtractor>,
        decoder: Box<dyn TokenDecoder>,
    },
    Translation {
        model: Box<dyn TranslationModel>,
        extractor: Box<dyn FeatureExtractor>,
        decoder: Box<dyn TokenDecoder>,
    },
    Engine {
        engine: Box<dyn SpeechEngine>,
    },
}

impl SpeechModel {
    pub fn family(&self) -> ModelFamily {
        match self {
            Self::CtcAcoustic { .. } => ModelFamily::CtcAcoustic,
            Self::Seq2Seq { .. } => ModelFamily::Seq2Seq,
            Self::Translation { .. } => ModelFamily::Translation,
            Self::Engine { .. } => ModelFamily::Engine,
        }
    }
}

impl fmt::Debug for SpeechModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpeechModel")
            .field("family", &self.family().label())
            .finish()
    }
}
