//! Bitap fuzzy matcher.
//!
//! Locates the best instance of a pattern in a text near an expected offset,
//! where "best" weighs edit errors against distance from that offset. The
//! Baeza-Yates–Gonnet shift-or rows are u64 masks, which bounds usable
//! pattern lengths.

use std::collections::HashMap;

use thiserror::Error;

use crate::settings::Settings;
use crate::text;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("pattern of {len} characters exceeds match_max_bits ({max})")]
    PatternTooLong { len: usize, max: usize },
}

/// Locate the best instance of `pattern` in `text` near `loc`.
///
/// Returns `Ok(None)` when nothing scores under `settings.match_threshold`,
/// and `MatchError::PatternTooLong` when the pattern cannot fit the matcher's
/// bit masks.
pub fn match_main(
    settings: &Settings,
    text: &str,
    pattern: &str,
    loc: usize,
) -> Result<Option<usize>, MatchError> {
    let text = text::to_chars(text);
    let pattern = text::to_chars(pattern);
    if pattern.len() > settings.max_bits() {
        return Err(MatchError::PatternTooLong {
            len: pattern.len(),
            max: settings.max_bits(),
        });
    }
    Ok(match_chars(settings, &text, &pattern, loc))
}

/// Precondition: `pattern.len() <= settings.max_bits()`. The patch applier
/// windows its patterns before calling in here.
pub(crate) fn match_chars(
    settings: &Settings,
    text: &[char],
    pattern: &[char],
    loc: usize,
) -> Option<usize> {
    let loc = loc.min(text.len());
    if text == pattern {
        // Shortcut.
        return Some(0);
    }
    if text.is_empty() {
        // Nothing to match.
        return None;
    }
    if loc + pattern.len() <= text.len() && text[loc..loc + pattern.len()] == *pattern {
        // Perfect match at the perfect spot (includes an empty pattern).
        return Some(loc);
    }
    bitap(settings, text, pattern, loc)
}

/// Fuzzy locate via Bitap. An empty pattern trivially matches at `loc`;
/// patterns longer than the match masks find nothing.
pub fn match_bitap(settings: &Settings, text: &str, pattern: &str, loc: usize) -> Option<usize> {
    let text = text::to_chars(text);
    let pattern = text::to_chars(pattern);
    if pattern.is_empty() {
        return Some(loc.min(text.len()));
    }
    if pattern.len() > settings.max_bits() {
        return None;
    }
    bitap(settings, &text, &pattern, loc)
}

/// Precondition: `1 <= pattern.len() <= settings.max_bits()`, so the mask
/// shifts below stay in range.
fn bitap(settings: &Settings, text: &[char], pattern: &[char], loc: usize) -> Option<usize> {
    let alphabet = alphabet_chars(pattern);
    let pl = pattern.len();
    let tl = text.len();

    // Highest score beyond which we give up.
    let mut score_threshold = f64::from(settings.match_threshold);
    // Is there an exact match nearby? (speedup)
    if let Some(best) = text::index_of(text, pattern, loc) {
        score_threshold = bitap_score(settings, 0, best, loc, pl).min(score_threshold);
        // What about in the other direction? (speedup)
        if let Some(best) = text::last_index_of(text, pattern, (loc + pl).min(tl)) {
            score_threshold = bitap_score(settings, 0, best, loc, pl).min(score_threshold);
        }
    }

    let match_mask: u64 = 1 << (pl - 1);
    let mut best_loc: Option<usize> = None;

    let mut bin_max = pl + tl;
    let mut last_rd: Vec<u64> = Vec::new();
    for d in 0..pl {
        // Scan for the best match; each iteration allows one more error.
        // Binary-search how far from `loc` we can stray at this error level.
        let mut bin_min = 0usize;
        let mut bin_mid = bin_max;
        while bin_min < bin_mid {
            if bitap_score(settings, d, loc + bin_mid, loc, pl) <= score_threshold {
                bin_min = bin_mid;
            } else {
                bin_max = bin_mid;
            }
            bin_mid = (bin_max - bin_min) / 2 + bin_min;
        }
        // Use the result from this iteration as the maximum for the next.
        bin_max = bin_mid;
        let mut start = 1.max(loc.saturating_sub(bin_mid) + 1);
        let finish = (loc + bin_mid).min(tl) + pl;

        let mut rd = vec![0u64; finish + 2];
        rd[finish + 1] = (1u64 << d) - 1;
        let mut j = finish;
        while j >= start {
            let char_match = if j - 1 >= tl {
                // Out of range.
                0
            } else {
                *alphabet.get(&text[j - 1]).unwrap_or(&0)
            };
            rd[j] = if d == 0 {
                // First pass: exact match.
                ((rd[j + 1] << 1) | 1) & char_match
            } else {
                // Subsequent passes: fuzzy match.
                (((rd[j + 1] << 1) | 1) & char_match)
                    | (((last_rd[j + 1] | last_rd[j]) << 1) | 1)
                    | last_rd[j + 1]
            };
            if rd[j] & match_mask != 0 {
                let score = bitap_score(settings, d, j - 1, loc, pl);
                // This match will almost certainly be better than any
                // existing match, but check anyway.
                if score <= score_threshold {
                    score_threshold = score;
                    best_loc = Some(j - 1);
                    if j - 1 > loc {
                        // When passing loc, don't exceed the current
                        // distance from loc.
                        start = 1.max((2 * loc).saturating_sub(j - 1));
                    } else {
                        // Already passed loc; downhill from here.
                        break;
                    }
                }
            }
            j -= 1;
        }
        if bitap_score(settings, d + 1, loc, loc, pl) > score_threshold {
            // No hope for a better match at greater error levels.
            break;
        }
        last_rd = rd;
    }
    best_loc
}

/// Score a match with `errors` edit errors found at position `x`
/// (0.0 = perfect, 1.0 = terrible).
fn bitap_score(settings: &Settings, errors: usize, x: usize, loc: usize, pattern_len: usize) -> f64 {
    let accuracy = errors as f64 / pattern_len as f64;
    let proximity = loc.abs_diff(x);
    if settings.match_distance == 0 {
        // Dodge a divide by zero.
        return if proximity == 0 { accuracy } else { 1.0 };
    }
    accuracy + proximity as f64 / f64::from(settings.match_distance)
}

/// Map each pattern character to a mask with a bit per position it occupies.
pub fn match_alphabet(pattern: &str) -> HashMap<char, u64> {
    alphabet_chars(&text::to_chars(pattern))
}

fn alphabet_chars(pattern: &[char]) -> HashMap<char, u64> {
    let mut alphabet = HashMap::new();
    let len = pattern.len();
    for (i, &c) in pattern.iter().enumerate() {
        *alphabet.entry(c).or_insert(0u64) |= 1u64 << (len - i - 1);
    }
    alphabet
}
