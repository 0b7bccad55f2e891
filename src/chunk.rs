use crate::audio::Waveform;
use crate::error::{Error, Result};

/// A contiguous sub-window of a waveform, tagged with its sample range in
/// the parent and its position in the window sequence.
///
/// Chunks borrow from the parent waveform; each one is consumed by a single
/// inference call and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<'a> {
    pub samples: &'a [f32],
    /// Sample offset of the first sample within the parent waveform.
    pub start_offset: usize,
    /// Sample offset one past the last sample within the parent waveform.
    pub end_offset: usize,
    /// 0-based window index; strictly increasing across the sequence.
    pub index: usize,
}

/// Checks the chunk/overlap relationship without touching any audio.
///
/// Called by the orchestrator before the batch loop so a bad configuration
/// aborts the run before the first file is read. A zero `chunk_size`
/// disables chunking and any overlap value is accepted.
pub fn validate(chunk_size: usize, overlap_size: usize) -> Result<()> {
    if chunk_size > 0 && overlap_size >= chunk_size {
        return Err(Error::configuration(format!(
            "overlap_size ({overlap_size}) must be smaller than chunk_size ({chunk_size}); \
             a zero or negative stride would repeat windows forever"
        )));
    }
    Ok(())
}

/// Splits a waveform into overlapping windows of `chunk_size` samples with
/// stride `chunk_size - overlap_size`.
///
/// `chunk_size == 0` returns a single chunk spanning the whole waveform,
/// for families with unbounded or internally managed context. The final
/// window may be shorter than `chunk_size` and is emitted without padding.
pub fn split<'a>(
    waveform: &'a Waveform,
    chunk_size: usize,
    overlap_size: usize,
) -> Result<Vec<Chunk<'a>>> {
    validate(chunk_size, overlap_size)?;

    let samples = waveform.samples.as_slice();
    if chunk_size == 0 {
        return Ok(vec![Chunk {
            samples,
            start_offset: 0,
            end_offset: samples.len(),
            index: 0,
        }]);
    }

    let stride = chunk_size - overlap_size;
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while start < samples.len() {
        let end = (start + chunk_size).min(samples.len());
        chunks.push(Chunk {
            samples: &samples[start..end],
            start_offset: start,
            end_offset: end,
            index,
        });
        if end == samples.len() {
            break;
        }
        start += stride;
        index += 1;
    }

    Ok(chunks)
}
