//! Typed configuration for a transcription run.
//!
//! Every option the inference calls honor is a named, typed, defaulted
//! field; there is no open-ended argument bag, so an unknown option is a
//! compile error rather than something silently absorbed.

/// Floating-point matrix-multiplication precision handed to the numeric
/// backend when the model is loaded.
///
/// This is a startup-time value consumed by the model loader; nothing in
/// the run toggles it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatmulPrecision {
    Highest,
    #[default]
    High,
    Medium,
}

impl MatmulPrecision {
    pub fn label(self) -> &'static str {
        match self {
            Self::Highest => "highest",
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

/// Padding strategy requested from the feature extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    #[default]
    Longest,
    MaxLength,
    DoNotPad,
}

/// Options forwarded to the feature-extraction side of the processor.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureOptions {
    pub normalize: bool,
    pub padding: Padding,
    pub truncation: bool,
    /// Request an attention mask alongside the features. The CTC engine
    /// forces this on when the model uses layer-norm feature extraction.
    pub attention_mask: bool,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            padding: Padding::Longest,
            truncation: false,
            attention_mask: false,
        }
    }
}

/// Generation controls for the autoregressive families.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub num_beams: usize,
    pub temperature: f32,
    pub length_penalty: f32,
    pub no_repeat_ngram_size: usize,
    pub do_sample: bool,
    /// Ask the model for per-segment token arrays with start/end times
    /// instead of one flat token sequence.
    pub return_segments: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: None,
            min_length: None,
            num_beams: 1,
            temperature: 1.0,
            length_penalty: 1.0,
            no_repeat_ngram_size: 0,
            do_sample: false,
            return_segments: false,
        }
    }
}

/// Options for the multilingual translation family. Language fields are
/// passed through to the model untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslationParams {
    pub target_language: Option<String>,
    pub source_language: Option<String>,
    pub generation: GenerationParams,
}

/// Options for the external optimized engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    /// Worker threads for the engine's internal fan-out; defaults to the
    /// number of available CPU cores.
    pub threads: Option<usize>,
    pub language: Option<String>,
    pub translate: bool,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            threads: None,
            language: None,
            translate: false,
        }
    }
}

/// Top-level options for one bulk transcription run.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscribeOptions {
    /// Files per output record; the last batch may be smaller.
    pub batch_size: usize,
    /// Window length in samples; `0` disables chunking.
    pub chunk_size: usize,
    /// Window overlap in samples; must be smaller than `chunk_size` when
    /// chunking is enabled.
    pub overlap_size: usize,
    /// Sampling rate the model expects; decoding resamples to this rate.
    pub model_sampling_rate: u32,
    pub matmul_precision: MatmulPrecision,
    pub features: FeatureOptions,
    pub generation: GenerationParams,
    pub translation: TranslationParams,
    pub engine: EngineParams,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            batch_size: 8,
            chunk_size: 0,
            overlap_size: 0,
            model_sampling_rate: 16_000,
            matmul_precision: MatmulPrecision::default(),
            features: FeatureOptions::default(),
            generation: GenerationParams::default(),
            translation: TranslationParams::default(),
            engine: EngineParams::default(),
        }
    }
}
