//! Alignment-heads lookup for whisper-style models.
//!
//! Each checkpoint family exposes a fixed set of (layer, head) pairs whose
//! cross-attention tracks token-to-time alignment. The table is keyed by
//! checkpoint-name substrings and resolved once per run; an unknown model
//! name fails closed with a configuration error instead of generating with
//! a wrong alignment.

use crate::error::{Error, Result};

/// Table rows are matched in order, so the more specific keys (".en",
/// versioned large checkpoints) come before their prefixes.
const ALIGNMENT_HEADS: &[(&str, &[(u32, u32)])] = &[
    (
        "tiny.en",
        &[
            (1, 0),
            (2, 0),
            (2, 5),
            (3, 0),
            (3, 1),
            (3, 2),
            (3, 3),
            (3, 4),
        ],
    ),
    ("tiny", &[(2, 2), (3, 0), (3, 2), (3, 3), (3, 4), (3, 5)]),
    (
        "base.en",
        &[(3, 3), (4, 7), (5, 1), (5, 5), (6, 1), (6, 6)],
    ),
    (
        "base",
        &[
            (3, 1),
            (4, 2),
            (4, 3),
            (4, 7),
            (5, 1),
            (5, 2),
            (5, 4),
            (5, 6),
        ],
    ),
    (
        "small.en",
        &[
            (6, 6),
            (7, 0),
            (7, 3),
            (7, 8),
            (8, 2),
            (8, 5),
            (8, 7),
            (9, 0),
            (9, 4),
            (9, 8),
        ],
    ),
    (
        "small",
        &[
            (5, 3),
            (5, 9),
            (8, 0),
            (8, 4),
            (8, 7),
            (8, 8),
            (9, 0),
            (9, 7),
            (9, 9),
            (10, 5),
        ],
    ),
    (
        "medium.en",
        &[
            (11, 4),
            (14, 1),
            (14, 12),
            (14, 14),
            (15, 4),
            (16, 0),
            (16, 4),
            (16, 9),
            (17, 12),
            (17, 14),
            (18, 7),
            (18, 10),
            (18, 15),
            (20, 0),
            (20, 3),
            (20, 9),
            (20, 14),
            (21, 12),
        ],
    ),
    (
        "medium",
        &[(13, 15), (15, 4), (15, 15), (16, 1), (20, 0), (23, 4)],
    ),
    (
        "large-v3",
        &[
            (7, 0),
            (10, 17),
            (12, 18),
            (13, 12),
            (16, 1),
            (17, 14),
            (19, 11),
            (21, 4),
            (24, 1),
            (25, 6),
        ],
    ),
    (
        "large-v2",
        &[
            (10, 12),
            (13, 17),
            (16, 11),
            (16, 12),
            (16, 13),
            (17, 15),
            (17, 16),
            (18, 4),
            (18, 11),
            (18, 19),
            (19, 11),
            (21, 2),
            (21, 3),
            (22, 3),
            (22, 9),
            (22, 12),
            (23, 5),
            (23, 7),
            (23, 13),
            (25, 5),
            (26, 1),
            (26, 12),
            (27, 15),
        ],
    ),
    (
        "large-v1",
        &[
            (9, 19),
            (11, 2),
            (11, 4),
            (11, 17),
            (22, 7),
            (22, 11),
            (22, 17),
            (23, 2),
            (23, 15),
        ],
    ),
    (
        "large",
        &[
            (9, 19),
            (11, 2),
            (11, 4),
            (11, 17),
            (22, 7),
            (22, 11),
            (22, 17),
            (23, 2),
            (23, 15),
        ],
    ),
];

/// Resolves the alignment heads for a model name by substring match against
/// the table keys. No match is a configuration error raised before any file
/// is processed.
pub fn alignment_heads_for(model_name: &str) -> Result<&'static [(u32, u32)]> {
    ALIGNMENT_HEADS
        .iter()
        .find(|(key, _)| model_name.contains(key))
        .map(|(_, heads)| *heads)
        .ok_or_else(|| {
            Error::configuration(format!(
                "no alignment-heads entry matches model name {model_name:?}; \
                 generating without a known alignment is not supported"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::alignment_heads_for;

    #[test]
    fn matches_by_substring_of_the_checkpoint_name() {
        let heads = alignment_heads_for("openai/whisper-tiny").expect("known checkpoint");
        assert_eq!(heads[0], (2, 2));
    }

    #[test]
    fn english_only_variants_win_over_their_prefix() {
        let heads = alignment_heads_for("openai/whisper-tiny.en").expect("known checkpoint");
        assert_eq!(heads[0], (1, 0));
    }

    #[test]
    fn versioned_large_checkpoints_resolve_before_bare_large() {
        let v3 = alignment_heads_for("openai/whisper-large-v3").expect("known checkpoint");
        assert_eq!(v3[0], (7, 0));

        let bare = alignment_heads_for("openai/whisper-large").expect("known checkpoint");
        assert_eq!(bare[0], (9, 19));
    }

    #[test]
    fn unknown_model_name_fails_closed() {
        let error = alignment_heads_for("my-custom-model").expect_err("must fail");
        assert!(!error.is_file_scoped());
    }
}
