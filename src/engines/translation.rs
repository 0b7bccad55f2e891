//! Multilingual translation family (seamless-style): chunked generation
//! with pass-through language parameters.

use crate::audio::Waveform;
use crate::chunk;
use crate::config::TranscribeOptions;
use crate::error::Result;
use crate::model::{FeatureExtractor, TokenDecoder, TranslationModel};
use crate::TranscriptSegment;

/// Transcribes one waveform chunk by chunk.
///
/// Each chunk's generation may return several token rows; the decoded rows
/// are trimmed and joined with single spaces to form that chunk's tokens.
/// Segment times use the same overlap-stride convention as the CTC family.
pub fn process(
    model: &dyn TranslationModel,
    extractor: &dyn FeatureExtractor,
    decoder: &dyn TokenDecoder,
    waveform: &Waveform,
    options: &TranscribeOptions,
) -> Result<Vec<TranscriptSegment>> {
    let chunks = chunk::split(waveform, options.chunk_size, options.overlap_size)?;

    let mut segments = Vec::with_capacity(chunks.len());
    for piece in chunks {
        let features = extractor.extract(piece.samples, waveform.sample_rate, &options.features)?;
        let rows = model.generate(&features, &options.translation)?;

        let tokens = rows
            .iter()
            .map(|row| decoder.decode(row, true))
            .map(|text| text.trim().to_string())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string();

        segments.push(TranscriptSegment {
            tokens,
            start: (piece.index * options.overlap_size) as f64,
            end: ((piece.index + 1) * options.overlap_size) as f64,
        });
    }

    Ok(segments)
}
