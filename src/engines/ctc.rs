//! CTC-acoustic family (wav2vec2-style): per-chunk feature extraction, one
//! forward pass, per-frame arg-max, greedy CTC collapse.

use crate::audio::Waveform;
use crate::chunk;
use crate::config::TranscribeOptions;
use crate::error::Result;
use crate::model::{CtcModel, CtcVocabulary, FeatureExtractor, FeatureNorm};
use crate::TranscriptSegment;

/// Transcribes one waveform chunk by chunk.
///
/// Segment start/end use the overlap-stride convention
/// (`index * overlap_size`, `(index + 1) * overlap_size`), tying displayed
/// time to the stride rather than true chunk duration. That approximation
/// is carried from the original system unchanged.
pub fn process(
    model: &dyn CtcModel,
    extractor: &dyn FeatureExtractor,
    vocabulary: &dyn CtcVocabulary,
    waveform: &Waveform,
    options: &TranscribeOptions,
) -> Result<Vec<TranscriptSegment>> {
    let chunks = chunk::split(waveform, options.chunk_size, options.overlap_size)?;

    // Layer-norm feature extraction requires an attention mask on the
    // forward pass.
    let mut feature_options = options.features.clone();
    if model.feature_norm() == FeatureNorm::Layer {
        feature_options.attention_mask = true;
    }

    let mut segments = Vec::with_capacity(chunks.len());
    for piece in chunks {
        let features = extractor.extract(piece.samples, waveform.sample_rate, &feature_options)?;
        let logits = model.forward(&features)?;

        let ids = argmax_frames(&logits);
        let tokens = collapse_greedy(&ids, vocabulary);

        segments.push(TranscriptSegment {
            tokens,
            start: (piece.index * options.overlap_size) as f64,
            end: ((piece.index + 1) * options.overlap_size) as f64,
        });
    }

    Ok(segments)
}

/// Picks the highest-scoring class id for each output frame.
fn argmax_frames(logits: &[Vec<f32>]) -> Vec<u32> {
    logits
        .iter()
        .filter_map(|frame| {
            frame
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(id, _)| id as u32)
        })
        .collect()
}

/// Greedy CTC collapse: drop consecutive duplicate ids, then drop special
/// tokens, and map what remains through the vocabulary.
fn collapse_greedy(ids: &[u32], vocabulary: &dyn CtcVocabulary) -> String {
    let mut text = String::new();
    let mut previous = None;

    for &id in ids {
        if previous == Some(id) {
            continue;
        }
        previous = Some(id);

        if vocabulary.is_special(id) {
            continue;
        }
        if let Some(token) = vocabulary.token(id) {
            text.push_str(&token);
        }
    }

    text
}
