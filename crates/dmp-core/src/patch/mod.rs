//! Patch objects: build, split, pad and apply.
//!
//! A patch is a hunk of diff bracketed by equality context, carrying offsets
//! into the pre-patch and post-patch texts. Unlike unidiff, patch lists have
//! a rolling context: each patch's offsets assume all previous patches have
//! been applied.

use std::fmt;

use dmp_util::strings::percent_encode;

use crate::clock::Deadline;
use crate::diff::{self, cleanup, Diff, Op};
use crate::matching;
use crate::settings::Settings;
use crate::text;

pub mod codec;

/// One hunk: diffs plus offsets into the pre-patch (`start1`, `length1`) and
/// post-patch (`start2`, `length2`) texts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub diffs: Vec<Diff>,
    pub start1: usize,
    pub start2: usize,
    pub length1: usize,
    pub length2: usize,
}

impl fmt::Display for Patch {
    /// Emulate GNU diff's header format: `@@ -382,8 +481,9 @@`. Ranges of
    /// length 1 drop the count and print the offset 1-based; empty ranges
    /// keep the 0-based offset with an explicit 0.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@@ -")?;
        match self.length1 {
            0 => write!(f, "{},0", self.start1)?,
            1 => write!(f, "{}", self.start1 + 1)?,
            n => write!(f, "{},{}", self.start1 + 1, n)?,
        }
        write!(f, " +")?;
        match self.length2 {
            0 => write!(f, "{},0", self.start2)?,
            1 => write!(f, "{}", self.start2 + 1)?,
            n => write!(f, "{},{}", self.start2 + 1, n)?,
        }
        writeln!(f, " @@")?;
        // Escape the body of the patch with %xx notation.
        for diff in &self.diffs {
            let sign = match diff.op {
                Op::Insert => '+',
                Op::Delete => '-',
                Op::Equal => ' ',
            };
            writeln!(f, "{}{}", sign, percent_encode(&diff.text_string()))?;
        }
        Ok(())
    }
}

/// Compute patches to turn `text1` into `text2`, diffing internally with
/// semantic and efficiency cleanup.
pub fn patch_make_from_texts(settings: &Settings, text1: &str, text2: &str) -> Vec<Patch> {
    let mut diffs = diff::diff_main(settings, text1, text2, true);
    if diffs.len() > 2 {
        cleanup::diff_cleanup_semantic(&mut diffs);
        cleanup::diff_cleanup_efficiency(settings, &mut diffs);
    }
    patch_make_impl(settings, &text::to_chars(text1), &diffs)
}

/// Compute patches from a precomputed diff; text1 is reconstructed from it.
pub fn patch_make_from_diffs(settings: &Settings, diffs: &[Diff]) -> Vec<Patch> {
    let text1 = diff::text1_chars(diffs);
    patch_make_impl(settings, &text1, diffs)
}

/// Compute patches from `text1` and a precomputed diff.
pub fn patch_make(settings: &Settings, text1: &str, diffs: &[Diff]) -> Vec<Patch> {
    patch_make_impl(settings, &text::to_chars(text1), diffs)
}

fn patch_make_impl(settings: &Settings, text1: &[char], diffs: &[Diff]) -> Vec<Patch> {
    let mut patches = Vec::new();
    if diffs.is_empty() {
        // Get rid of the null case.
        return patches;
    }

    let margin = settings.margin();
    let mut patch = Patch::default();
    let mut char_count1 = 0usize;
    let mut char_count2 = 0usize;
    // Start with text1 and apply the diffs while walking, so that a patch
    // closed mid-script sees the text as already modified by its
    // predecessors (rolling context).
    let mut prepatch: Vec<char> = text1.to_vec();
    let mut postpatch: Vec<char> = text1.to_vec();
    for (i, diff) in diffs.iter().enumerate() {
        if patch.diffs.is_empty() && diff.op != Op::Equal {
            // A new patch starts here.
            patch.start1 = char_count1;
            patch.start2 = char_count2;
        }
        match diff.op {
            Op::Insert => {
                patch.diffs.push(diff.clone());
                patch.length2 += diff.text.len();
                postpatch.splice(char_count2..char_count2, diff.text.iter().copied());
            }
            Op::Delete => {
                patch.length1 += diff.text.len();
                patch.diffs.push(diff.clone());
                postpatch.drain(char_count2..char_count2 + diff.text.len());
            }
            Op::Equal => {
                if diff.text.len() <= 2 * margin && !patch.diffs.is_empty() && i != diffs.len() - 1
                {
                    // Small equality inside a patch.
                    patch.diffs.push(diff.clone());
                    patch.length1 += diff.text.len();
                    patch.length2 += diff.text.len();
                }
                if diff.text.len() >= 2 * margin && !patch.diffs.is_empty() {
                    // Time for a new patch.
                    patch_add_context(settings, &mut patch, &prepatch);
                    patches.push(std::mem::take(&mut patch));
                    prepatch = postpatch.clone();
                    char_count1 = char_count2;
                }
            }
        }
        if diff.op != Op::Insert {
            char_count1 += diff.text.len();
        }
        if diff.op != Op::Delete {
            char_count2 += diff.text.len();
        }
    }
    // Pick up the leftover patch if not empty.
    if !patch.diffs.is_empty() {
        patch_add_context(settings, &mut patch, &prepatch);
        patches.push(patch);
    }
    patches
}

/// Grow the patch's equality context until the pattern is unique in `text`,
/// without letting it expand beyond what the matcher can handle.
pub fn patch_add_context(settings: &Settings, patch: &mut Patch, text: &[char]) {
    if text.is_empty() {
        return;
    }

    let margin = settings.margin();
    let budget = settings.max_bits().saturating_sub(2 * margin);
    let mut pattern = &text[patch.start2..patch.start2 + patch.length1];
    let mut padding = 0usize;

    while text::index_of(text, pattern, 0) != text::last_index_of(text, pattern, text.len())
        && pattern.len() < budget
    {
        padding += margin;
        let start = patch.start2.saturating_sub(padding);
        let end = (patch.start2 + patch.length1 + padding).min(text.len());
        pattern = &text[start..end];
    }
    // Add one chunk for good luck.
    padding += margin;

    let prefix = &text[patch.start2.saturating_sub(padding)..patch.start2];
    if !prefix.is_empty() {
        patch.diffs.insert(0, Diff::from_chars(Op::Equal, prefix));
    }
    let suffix_end = (patch.start2 + patch.length1 + padding).min(text.len());
    let suffix = &text[patch.start2 + patch.length1..suffix_end];
    if !suffix.is_empty() {
        patch.diffs.push(Diff::from_chars(Op::Equal, suffix));
    }

    // Roll back the start points and extend the lengths.
    patch.start1 -= prefix.len();
    patch.start2 -= prefix.len();
    patch.length1 += prefix.len() + suffix.len();
    patch.length2 += prefix.len() + suffix.len();
}

/// Apply `patches` to `source`, returning the new text and a success flag
/// per (split) patch. A failed hunk never fails the whole call.
pub fn patch_apply(settings: &Settings, patches: &[Patch], source: &str) -> (String, Vec<bool>) {
    if patches.is_empty() {
        return (source.to_string(), Vec::new());
    }

    // Deep copy; no changes leak back to the caller's patches.
    let mut patches = patches.to_vec();
    let null_padding = patch_add_padding(settings, &mut patches);
    let mut text: Vec<char> = Vec::with_capacity(source.len() + 2 * null_padding.len());
    text.extend_from_slice(&null_padding);
    text.extend(source.chars());
    text.extend_from_slice(&null_padding);
    patch_split_max(settings, &mut patches);

    let max_bits = settings.max_bits();
    // Offset between the expected and actual location of the previous
    // patch: if patches were expected at 10 and 20 but the first applied at
    // 12, the second's effective expected position is 22.
    let mut delta = 0isize;
    let mut results = vec![false; patches.len()];
    for (x, patch) in patches.iter().enumerate() {
        let expected_loc = (patch.start2 as isize + delta).max(0) as usize;
        let text1 = diff::text1_chars(&patch.diffs);
        let mut start_loc;
        let mut end_loc: Option<usize> = None;
        if text1.len() > max_bits {
            // Splitting left an oversized pattern only for a monster delete;
            // locate both endpoints independently.
            start_loc = matching::match_chars(settings, &text, &text1[..max_bits], expected_loc);
            if let Some(sl) = start_loc {
                end_loc = matching::match_chars(
                    settings,
                    &text,
                    &text1[text1.len() - max_bits..],
                    expected_loc + text1.len() - max_bits,
                );
                match end_loc {
                    Some(el) if sl < el => {}
                    _ => {
                        // No valid trailing context; drop this patch.
                        start_loc = None;
                    }
                }
            }
        } else {
            start_loc = matching::match_chars(settings, &text, &text1, expected_loc);
        }
        let start_loc = match start_loc {
            None => {
                // No match found. Subtract this patch's delta from the rest.
                results[x] = false;
                delta -= patch.length2 as isize - patch.length1 as isize;
                continue;
            }
            Some(sl) => sl,
        };

        results[x] = true;
        delta = start_loc as isize - expected_loc as isize;
        let text2_end = match end_loc {
            None => (start_loc + text1.len()).min(text.len()),
            Some(el) => (el + max_bits).min(text.len()),
        };
        let text2 = text[start_loc..text2_end].to_vec();
        if text1 == text2 {
            // Perfect match; shove the replacement text straight in.
            let replacement = diff::text2_chars(&patch.diffs);
            text.splice(start_loc..start_loc + text1.len(), replacement);
            continue;
        }

        // Imperfect match. Diff the intended and actual windows to get a
        // framework of equivalent indices.
        let deadline = Deadline::start(settings.diff_timeout);
        let mut window_diffs = diff::diff_main_impl(settings, &text1, &text2, false, &deadline);
        if text1.len() > max_bits
            && diff::diff_levenshtein(&window_diffs) as f64 / text1.len() as f64
                > f64::from(settings.patch_delete_threshold)
        {
            // The end points match but the content is unacceptably bad.
            results[x] = false;
            continue;
        }

        cleanup::diff_cleanup_semantic_lossless(&mut window_diffs);
        let mut index1 = 0usize;
        for diff in &patch.diffs {
            if diff.op != Op::Equal {
                let index2 = diff::diff_x_index(&window_diffs, index1);
                match diff.op {
                    Op::Insert => {
                        text.splice(
                            start_loc + index2..start_loc + index2,
                            diff.text.iter().copied(),
                        );
                    }
                    Op::Delete => {
                        let del_end = diff::diff_x_index(&window_diffs, index1 + diff.text.len());
                        text.drain(start_loc + index2..start_loc + del_end);
                    }
                    Op::Equal => {}
                }
            }
            if diff.op != Op::Delete {
                index1 += diff.text.len();
            }
        }
    }

    // Strip the padding off.
    let inner = &text[null_padding.len()..text.len() - null_padding.len()];
    (text::from_chars(inner), results)
}

/// Add sentinel padding on both text edges so edge patches can still match
/// something. Returns the padding string so the applier can strip it.
pub fn patch_add_padding(settings: &Settings, patches: &mut Vec<Patch>) -> Vec<char> {
    let padding_length = settings.margin();
    // Sentinel characters 1..margin sit outside any normal text.
    let null_padding: Vec<char> = (1..=padding_length as u32)
        .filter_map(char::from_u32)
        .collect();

    // Bump all the patches forward.
    for patch in patches.iter_mut() {
        patch.start1 += padding_length;
        patch.start2 += padding_length;
    }

    // Pad the first patch's leading edge.
    if let Some(first) = patches.first_mut() {
        if first.diffs.first().map_or(true, |d| d.op != Op::Equal) {
            first.diffs.insert(0, Diff::from_chars(Op::Equal, &null_padding));
            first.start1 -= padding_length; // Should be 0.
            first.start2 -= padding_length;
            first.length1 += padding_length;
            first.length2 += padding_length;
        } else if let Some(first_diff) = first.diffs.first_mut() {
            if padding_length > first_diff.text.len() {
                // Grow the first equality.
                let extra = padding_length - first_diff.text.len();
                let mut grown = null_padding[first_diff.text.len()..].to_vec();
                grown.extend_from_slice(&first_diff.text);
                first_diff.text = grown;
                first.start1 -= extra;
                first.start2 -= extra;
                first.length1 += extra;
                first.length2 += extra;
            }
        }
    }

    // Pad the last patch's trailing edge.
    if let Some(last) = patches.last_mut() {
        if last.diffs.last().map_or(true, |d| d.op != Op::Equal) {
            last.diffs.push(Diff::from_chars(Op::Equal, &null_padding));
            last.length1 += padding_length;
            last.length2 += padding_length;
        } else if let Some(last_diff) = last.diffs.last_mut() {
            if padding_length > last_diff.text.len() {
                // Grow the last equality.
                let extra = padding_length - last_diff.text.len();
                last_diff.text.extend_from_slice(&null_padding[..extra]);
                last.length1 += extra;
                last.length2 += extra;
            }
        }
    }

    null_padding
}

/// Break up any patch whose pre-text is longer than the matcher's window
/// into a chain of smaller patches linked by margin-sized context.
pub fn patch_split_max(settings: &Settings, patches: &mut Vec<Patch>) {
    let patch_size = settings.max_bits();
    let margin = settings.margin();
    if patch_size <= margin {
        return;
    }

    let mut x = 0usize;
    while x < patches.len() {
        if patches[x].length1 <= patch_size {
            x += 1;
            continue;
        }
        // Remove the big old patch and cut sub-patches from it.
        let mut bigpatch = patches.remove(x);
        let mut insert_at = x;
        let mut start1 = bigpatch.start1;
        let mut start2 = bigpatch.start2;
        let mut precontext: Vec<char> = Vec::new();
        let mut bpi = 0usize;
        let bps = bigpatch.diffs.len();
        while bpi < bps {
            let mut patch = Patch {
                start1: start1 - precontext.len(),
                start2: start2 - precontext.len(),
                ..Patch::default()
            };
            let mut empty = true;
            if !precontext.is_empty() {
                patch.length1 = precontext.len();
                patch.length2 = precontext.len();
                patch.diffs.push(Diff::from_chars(Op::Equal, &precontext));
            }
            while bpi < bps && patch.length1 < patch_size - margin {
                let diff_type = bigpatch.diffs[bpi].op;
                if diff_type == Op::Insert {
                    // Insertions are harmless.
                    let diff = bigpatch.diffs[bpi].clone();
                    patch.length2 += diff.text.len();
                    start2 += diff.text.len();
                    patch.diffs.push(diff);
                    bpi += 1;
                    empty = false;
                } else if diff_type == Op::Delete
                    && patch.diffs.len() == 1
                    && patch.diffs[0].op == Op::Equal
                    && bigpatch.diffs[bpi].text.len() > 2 * patch_size
                {
                    // A monster delete passes in one chunk.
                    let diff = bigpatch.diffs[bpi].clone();
                    patch.length1 += diff.text.len();
                    start1 += diff.text.len();
                    empty = false;
                    patch.diffs.push(diff);
                    bpi += 1;
                } else {
                    // Deletion or equality; take as much as fits.
                    let available = &bigpatch.diffs[bpi].text;
                    let take = available.len().min(patch_size - patch.length1 - margin);
                    let taken = available[..take].to_vec();
                    patch.length1 += taken.len();
                    start1 += taken.len();
                    if diff_type == Op::Equal {
                        patch.length2 += taken.len();
                        start2 += taken.len();
                    } else {
                        empty = false;
                    }
                    let whole = take == bigpatch.diffs[bpi].text.len();
                    patch.diffs.push(Diff {
                        op: diff_type,
                        text: taken,
                    });
                    if whole {
                        bpi += 1;
                    } else {
                        bigpatch.diffs[bpi].text.drain(..take);
                    }
                }
            }
            // Head context for the next sub-patch: the last margin of this
            // one's post-text.
            precontext = diff::text2_chars(&patch.diffs);
            let keep_from = precontext.len().saturating_sub(margin);
            precontext.drain(..keep_from);

            // Tail context from the remaining pre-text.
            let remaining = diff::text1_chars(&bigpatch.diffs[bpi..]);
            let postcontext = if remaining.len() > margin {
                remaining[..margin].to_vec()
            } else {
                remaining
            };
            if !postcontext.is_empty() {
                patch.length1 += postcontext.len();
                patch.length2 += postcontext.len();
                if patch.diffs.last().is_some_and(|d| d.op == Op::Equal) {
                    if let Some(last) = patch.diffs.last_mut() {
                        last.text.extend_from_slice(&postcontext);
                    }
                } else {
                    patch.diffs.push(Diff {
                        op: Op::Equal,
                        text: postcontext,
                    });
                }
            }
            if !empty {
                patches.insert(insert_at, patch);
                insert_at += 1;
            }
        }
        x = insert_at;
    }
}
