//! Half-match decomposition.
//!
//! If the two texts share a substring at least half the length of the longer
//! one, the diff splits around it. This speedup can produce non-minimal
//! diffs, so it is off when the timeout is unlimited.

use crate::settings::Settings;
use crate::text;

/// A successful split: `common` occurs in both texts, with the pieces before
/// and after it on each side.
pub struct HalfMatch<'a> {
    pub prefix1: &'a [char],
    pub suffix1: &'a [char],
    pub prefix2: &'a [char],
    pub suffix2: &'a [char],
    pub common: &'a [char],
}

struct Candidate<'a> {
    long_prefix: &'a [char],
    long_suffix: &'a [char],
    short_prefix: &'a [char],
    short_suffix: &'a [char],
    common: &'a [char],
}

pub fn half_match<'a>(
    settings: &Settings,
    text1: &'a [char],
    text2: &'a [char],
) -> Option<HalfMatch<'a>> {
    if settings.diff_timeout <= 0.0 {
        // With unlimited time, don't risk a non-optimal diff.
        return None;
    }

    let (long_text, short_text) = if text1.len() > text2.len() {
        (text1, text2)
    } else {
        (text2, text1)
    };
    if long_text.len() < 4 || short_text.len() * 2 < long_text.len() {
        // Pointless.
        return None;
    }

    // Probe with the second quarter, then the third.
    let hm1 = half_match_at(long_text, short_text, (long_text.len() + 3) / 4);
    let hm2 = half_match_at(long_text, short_text, (long_text.len() + 1) / 2);
    let hm = match (hm1, hm2) {
        (None, None) => return None,
        (Some(hm), None) => hm,
        (None, Some(hm)) => hm,
        // Both matched; the tie goes to the second probe.
        (Some(a), Some(b)) => {
            if a.common.len() > b.common.len() {
                a
            } else {
                b
            }
        }
    };

    Some(if text1.len() > text2.len() {
        HalfMatch {
            prefix1: hm.long_prefix,
            suffix1: hm.long_suffix,
            prefix2: hm.short_prefix,
            suffix2: hm.short_suffix,
            common: hm.common,
        }
    } else {
        HalfMatch {
            prefix1: hm.short_prefix,
            suffix1: hm.short_suffix,
            prefix2: hm.long_prefix,
            suffix2: hm.long_suffix,
            common: hm.common,
        }
    })
}

/// Scan every occurrence of a quarter-length seed taken at position `i`,
/// extending each hit in both directions; keep the widest.
fn half_match_at<'a>(
    long_text: &'a [char],
    short_text: &'a [char],
    i: usize,
) -> Option<Candidate<'a>> {
    let seed = &long_text[i..i + long_text.len() / 4];
    let mut best: Option<Candidate<'a>> = None;
    let mut best_common_len = 0;
    let mut j = text::index_of(short_text, seed, 0);
    while let Some(at) = j {
        let prefix_len = text::common_prefix(&long_text[i..], &short_text[at..]);
        let suffix_len = text::common_suffix(&long_text[..i], &short_text[..at]);
        if best_common_len < suffix_len + prefix_len {
            best_common_len = suffix_len + prefix_len;
            best = Some(Candidate {
                common: &short_text[at - suffix_len..at + prefix_len],
                long_prefix: &long_text[..i - suffix_len],
                long_suffix: &long_text[i + prefix_len..],
                short_prefix: &short_text[..at - suffix_len],
                short_suffix: &short_text[at + prefix_len..],
            });
        }
        j = text::index_of(short_text, seed, at + 1);
    }
    if best_common_len * 2 >= long_text.len() {
        best
    } else {
        None
    }
}
