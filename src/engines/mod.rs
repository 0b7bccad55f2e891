//! Per-family inference procedures.
//!
//! Each module implements one model family's processing contract: take a
//! decoded waveform (chunked where the family has bounded context), run
//! inference through the collaborator traits, and return ordered transcript
//! segments. None of them touch the disk.

pub mod ctc;
pub mod native;
pub mod seq2seq;
pub mod translation;
