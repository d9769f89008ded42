//! Diff, fuzzy match and patch primitives for plain text.
//!
//! A Rust port of the diff-match-patch engine: compute a minimal,
//! semantically cleaned edit script between two strings, locate a pattern in
//! a text near an expected offset with the Bitap algorithm, and build
//! self-contextualizing patches that still apply after the source text has
//! drifted.
//!
//! All offsets, lengths, delta counts and patch header numbers count Unicode
//! scalar values (`char`s), not bytes. Public entry points take `&str`;
//! percent escaping in the delta and patch text formats operates on the
//! UTF-8 byte stream.
//!
//! ```
//! use dmp_core::{diff_main, patch_apply, patch_make_from_texts, Settings};
//!
//! let settings = Settings::default();
//! let patches = patch_make_from_texts(
//!     &settings,
//!     "The quick brown fox jumps over the lazy dog.",
//!     "That quick brown fox jumped over a lazy dog.",
//! );
//! let (patched, results) = patch_apply(
//!     &settings,
//!     &patches,
//!     "The quick red rabbit jumps over the tired tiger.",
//! );
//! assert_eq!(patched, "That quick red rabbit jumped over a tired tiger.");
//! assert!(results.iter().all(|&ok| ok));
//!
//! let diffs = diff_main(&settings, "kitten", "sitting", false);
//! assert_eq!(dmp_core::diff_text2(&diffs), "sitting");
//! ```

pub mod clock;
pub mod diff;
pub mod matching;
pub mod patch;
pub mod settings;
pub mod text;

pub use diff::delta::{diff_from_delta, diff_to_delta, DeltaError};
pub use diff::{
    diff_cleanup_efficiency, diff_cleanup_merge, diff_cleanup_semantic,
    diff_cleanup_semantic_lossless, diff_levenshtein, diff_main, diff_pretty_html, diff_text1,
    diff_text2, diff_x_index, Diff, Op,
};
pub use matching::{match_main, MatchError};
pub use patch::codec::{patch_from_text, patch_to_text, PatchParseError};
pub use patch::{
    patch_add_padding, patch_apply, patch_make, patch_make_from_diffs, patch_make_from_texts,
    patch_split_max, Patch,
};
pub use settings::Settings;

/// Returns the crate version at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
