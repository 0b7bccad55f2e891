//! Batch record persistence.
//!
//! One JSON file per processed batch, named
//! `predictions-{batch_index}-{uuid}.json`. The fresh v4 uuid keeps
//! concurrent or repeated runs from colliding even when batch indices
//! repeat; records are append-only and never rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::TranscriptResult;

/// One `{input, prediction}` pair in a batch record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Source file path as discovered.
    pub input: String,
    /// Normalized `{transcription, segments}` prediction.
    pub prediction: TranscriptResult,
}

/// Writes one batch's entries to a uniquely named record under
/// `output_dir`.
///
/// The write goes to a temporary sibling first and is renamed into place,
/// so a record either exists complete or not at all. Any failure is a
/// [`Error::Persistence`], which aborts the run; silently dropping a
/// completed batch would be silent data loss.
pub fn write_batch(entries: &[BatchEntry], output_dir: &Path, batch_index: usize) -> Result<PathBuf> {
    let filename = format!("predictions-{batch_index}-{}.json", Uuid::new_v4());
    let final_path = output_dir.join(&filename);
    let staging_path = output_dir.join(format!("{filename}.tmp"));

    let payload = serde_json::to_vec(entries)
        .map_err(|error| Error::persistence(&final_path, std::io::Error::other(error)))?;

    fs::write(&staging_path, payload)
        .map_err(|error| Error::persistence(&staging_path, error))?;
    fs::rename(&staging_path, &final_path).map_err(|error| {
        let _ = fs::remove_file(&staging_path);
        Error::persistence(&final_path, error)
    })?;

    info!(
        batch_index,
        entries = entries.len(),
        path = %final_path.display(),
        "wrote batch record"
    );

    Ok(final_path)
}
