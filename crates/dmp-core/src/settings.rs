//! Behaviour settings shared by the diff, match and patch operations.

/// Tunables for a diff/match/patch run. Treated as immutable for the duration
/// of a call; concurrent calls may each carry their own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Number of seconds to map a diff before giving up (0 for unlimited).
    pub diff_timeout: f32,
    /// Cost of an empty edit operation in terms of edit characters.
    pub diff_edit_cost: u16,
    /// At what point no match is declared (0.0 = perfection, 1.0 = very
    /// loose).
    pub match_threshold: f32,
    /// How far to search for a match (0 = exact location, 1000+ = broad).
    /// A match this many characters from the expected location adds 1.0 to
    /// the score.
    pub match_distance: u32,
    /// Longest pattern the Bitap matcher accepts. Values past 64 are capped
    /// at the width of the match masks.
    pub match_max_bits: u16,
    /// When deleting a large block of text (over `match_max_bits`
    /// characters), how close the contents must be to apply (0.0 =
    /// perfection, 1.0 = very loose). `match_threshold` governs how closely
    /// the end points must match.
    pub patch_delete_threshold: f32,
    /// Chunk size for patch context.
    pub patch_margin: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            diff_timeout: 1.0,
            diff_edit_cost: 4,
            match_threshold: 0.5,
            match_distance: 1000,
            match_max_bits: 32,
            patch_delete_threshold: 0.5,
            patch_margin: 4,
        }
    }
}

impl Settings {
    /// Bitap window size, capped at the bit width of the match masks.
    pub(crate) fn max_bits(&self) -> usize {
        usize::from(self.match_max_bits).min(64)
    }

    pub(crate) fn margin(&self) -> usize {
        usize::from(self.patch_margin)
    }
}
