use crate::{TranscriptResult, TranscriptSegment};

/// Merges ordered per-chunk segments into a single transcript.
///
/// Each segment's tokens are trimmed and joined with a single space; the
/// segment list is carried through in the order given. Segment order is the
/// caller's contract and is never re-sorted here. Zero segments yield an
/// empty transcription and an empty list.
pub fn stitch(segments: Vec<TranscriptSegment>) -> TranscriptResult {
    let transcription = segments
        .iter()
        .map(|segment| segment.tokens.trim())
        .collect::<Vec<_>>()
        .join(" ");

    TranscriptResult {
        transcription,
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::stitch;
    use crate::TranscriptSegment;

    fn segment(tokens: &str, index: usize) -> TranscriptSegment {
        TranscriptSegment {
            tokens: tokens.to_string(),
            start: (index * 8_000) as f64,
            end: ((index + 1) * 8_000) as f64,
        }
    }

    #[test]
    fn joins_trimmed_tokens_with_single_spaces() {
        let result = stitch(vec![
            segment("  hello", 0),
            segment("there ", 1),
            segment("world", 2),
        ]);

        assert_eq!(result.transcription, "hello there world");
        assert_eq!(result.segments.len(), 3);
    }

    #[test]
    fn zero_segments_is_not_an_error() {
        let result = stitch(Vec::new());

        assert_eq!(result.transcription, "");
        assert!(result.segments.is_empty());
    }

    #[test]
    fn stitching_is_associative_over_concatenation() {
        let a = segment("alpha ", 0);
        let b = segment(" beta", 1);
        let c = segment("gamma ", 2);

        let all_at_once = stitch(vec![a.clone(), b.clone(), c.clone()]);

        let first_two = stitch(vec![a, b]);
        let appended = format!("{} {}", first_two.transcription, c.tokens.trim());

        assert_eq!(all_at_once.transcription, appended);
    }

    #[test]
    fn segment_order_is_preserved_verbatim() {
        let result = stitch(vec![segment("b", 1), segment("a", 0)]);
        assert_eq!(result.transcription, "b a");
        assert_eq!(result.segments[0].tokens, "b");
    }
}
