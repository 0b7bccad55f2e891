use std::path::PathBuf;

use bulkscribe::engines::native::WhisperCppEngine;
use bulkscribe::{BulkTranscriber, SpeechModel, TranscribeOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let model_path = PathBuf::from(
        args.get(1)
            .map(|value| value.as_str())
            .unwrap_or("models/whisper-medium-q4_1.bin"),
    );
    let input_dir = PathBuf::from(args.get(2).map(|value| value.as_str()).unwrap_or("input"));
    let output_dir = PathBuf::from(args.get(3).map(|value| value.as_str()).unwrap_or("output"));

    let engine = WhisperCppEngine::load(&model_path)?;
    let transcriber = BulkTranscriber::new(
        SpeechModel::Engine {
            engine: Box::new(engine),
        },
        TranscribeOptions::default(),
    );

    let summary = transcriber.run(&input_dir, &output_dir)?;
    println!(
        "transcribed {} of {} files ({} skipped) into {} batch records",
        summary.files_transcribed,
        summary.files_discovered,
        summary.files_skipped,
        summary.batches_written
    );

    Ok(())
}
