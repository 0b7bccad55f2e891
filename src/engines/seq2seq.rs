//! Autoregressive seq2seq family (whisper-style).
//!
//! These models manage long audio internally, so the waveform is never
//! chunked here: features come from one whole-waveform extraction and a
//! single generation call. The model's alignment-heads configuration is
//! resolved by name before generating and an unknown name fails closed.

use crate::alignment;
use crate::audio::Waveform;
use crate::config::TranscribeOptions;
use crate::error::Result;
use crate::model::{FeatureExtractor, GenerationOutput, Seq2SeqModel, TokenDecoder};
use crate::stitch;
use crate::{TranscriptResult, TranscriptSegment};

pub fn process(
    model: &dyn Seq2SeqModel,
    extractor: &dyn FeatureExtractor,
    decoder: &dyn TokenDecoder,
    waveform: &Waveform,
    options: &TranscribeOptions,
) -> Result<TranscriptResult> {
    let heads = alignment::alignment_heads_for(model.name())?;

    let features = extractor.extract(&waveform.samples, waveform.sample_rate, &options.features)?;
    let output = model.generate(&features, heads, &options.generation)?;

    let result = match output {
        // Flat token sequence: a transcript with no timing information,
        // so the segment list stays empty.
        GenerationOutput::Tokens(tokens) => TranscriptResult {
            transcription: decoder.decode(&tokens, true).trim().to_string(),
            segments: Vec::new(),
        },
        GenerationOutput::Segments(generated) => stitch::stitch(
            generated
                .into_iter()
                .map(|segment| TranscriptSegment {
                    tokens: decoder.decode(&segment.tokens, true),
                    start: segment.start,
                    end: segment.end,
                })
                .collect(),
        ),
    };

    Ok(result)
}
