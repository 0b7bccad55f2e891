//! External optimized engine family (whisper.cpp-style).
//!
//! The whole file's waveform is handed to the engine's own transcription
//! call; the engine parallelizes internally across CPU cores and its output
//! is packed into the result without semantic reinterpretation. No chunking,
//! no feature extraction.

use std::thread;

use crate::audio::Waveform;
use crate::config::EngineParams;
use crate::error::Result;
use crate::model::SpeechEngine;
use crate::{TranscriptResult, TranscriptSegment};

/// Delegates one file to the engine and packs its transcript verbatim.
pub fn process(
    engine: &dyn SpeechEngine,
    waveform: &Waveform,
    params: &EngineParams,
) -> Result<TranscriptResult> {
    let threads = params.threads.unwrap_or_else(default_thread_count);

    let transcript = engine.transcribe(&waveform.samples, waveform.sample_rate, threads, params)?;

    Ok(TranscriptResult {
        transcription: transcript.text,
        segments: transcript
            .segments
            .into_iter()
            .map(|segment| TranscriptSegment {
                tokens: segment.text,
                start: segment.start,
                end: segment.end,
            })
            .collect(),
    })
}

fn default_thread_count() -> usize {
    thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1)
}

/// whisper.cpp adapter implementing [`SpeechEngine`] through `whisper-rs`.
#[cfg(feature = "whisper-cpp")]
pub use whisper_cpp::WhisperCppEngine;

#[cfg(feature = "whisper-cpp")]
mod whisper_cpp {
    use std::path::Path;

    use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

    use crate::config::EngineParams;
    use crate::error::{Error, Result};
    use crate::model::{EngineSegment, EngineTranscript, SpeechEngine};

    pub struct WhisperCppEngine {
        context: WhisperContext,
    }

    impl WhisperCppEngine {
        /// Loads a ggml checkpoint. Load failures are configuration
        /// problems; they happen before any file is processed.
        pub fn load(model_path: &Path) -> Result<Self> {
            let path = model_path
                .to_str()
                .ok_or_else(|| Error::configuration("model path is not valid UTF-8"))?;
            let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
                .map_err(|error| {
                    Error::configuration(format!(
                        "failed to load whisper.cpp model {path}: {error}"
                    ))
                })?;

            Ok(Self { context })
        }
    }

    impl SpeechEngine for WhisperCppEngine {
        fn transcribe(
            &self,
            samples: &[f32],
            _sample_rate: u32,
            threads: usize,
            params: &EngineParams,
        ) -> Result<EngineTranscript> {
            let mut state = self
                .context
                .create_state()
                .map_err(|error| Error::backend(format!("whisper.cpp state: {error}")))?;

            let mut full_params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            full_params.set_n_threads(threads as std::os::raw::c_int);
            full_params.set_translate(params.translate);
            if let Some(language) = params.language.as_deref() {
                full_params.set_language(Some(language));
            }
            full_params.set_print_special(false);
            full_params.set_print_progress(false);
            full_params.set_print_realtime(false);
            full_params.set_print_timestamps(false);

            state
                .full(full_params, samples)
                .map_err(|error| Error::backend(format!("whisper.cpp inference: {error}")))?;

            let segment_count = state
                .full_n_segments()
                .map_err(|error| Error::backend(format!("whisper.cpp segments: {error}")))?;

            let mut segments = Vec::with_capacity(segment_count as usize);
            let mut text = String::new();
            for index in 0..segment_count {
                let segment_text = state
                    .full_get_segment_text(index)
                    .map_err(|error| Error::backend(format!("whisper.cpp segment text: {error}")))?;
                // Engine timestamps are centiseconds.
                let start = state
                    .full_get_segment_t0(index)
                    .map_err(|error| Error::backend(format!("whisper.cpp segment t0: {error}")))?
                    as f64
                    / 100.0;
                let end = state
                    .full_get_segment_t1(index)
                    .map_err(|error| Error::backend(format!("whisper.cpp segment t1: {error}")))?
                    as f64
                    / 100.0;

                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(segment_text.trim());

                segments.push(EngineSegment {
                    text: segment_text,
                    start,
                    end,
                });
            }

            Ok(EngineTranscript { text, segments })
        }
    }
}
