//! Post-diff cleanup passes.
//!
//! `diff_cleanup_merge` normalizes a script (no adjacent ops of the same
//! kind, no stray empty equalities). `diff_cleanup_semantic` then trades
//! minimality for human readability, `diff_cleanup_efficiency` for cheaper
//! machine application.

use dmp_util::strings;

use super::{Diff, Op};
use crate::settings::Settings;
use crate::text;

/// Reorder and merge like edit sections, factoring out commonalities.
/// Any edit section can move as long as it doesn't cross an equality.
pub fn diff_cleanup_merge(diffs: &mut Vec<Diff>) {
    if diffs.is_empty() {
        return;
    }

    // Sentinel equality at the end simplifies the walk.
    diffs.push(Diff::new(Op::Equal, ""));
    let mut pointer = 0usize;
    let mut count_delete = 0usize;
    let mut count_insert = 0usize;
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();
    while pointer < diffs.len() {
        match diffs[pointer].op {
            Op::Insert => {
                count_insert += 1;
                text_insert.extend_from_slice(&diffs[pointer].text);
                pointer += 1;
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(&diffs[pointer].text);
                pointer += 1;
            }
            Op::Equal => {
                // Upon reaching an equality, check for prior redundancies.
                if count_delete + count_insert > 1 {
                    if count_delete != 0 && count_insert != 0 {
                        // Factor out any common prefix.
                        let common = text::common_prefix(&text_insert, &text_delete);
                        if common != 0 {
                            let start = pointer - count_delete - count_insert;
                            if start > 0 && diffs[start - 1].op == Op::Equal {
                                diffs[start - 1].text.extend_from_slice(&text_insert[..common]);
                            } else {
                                diffs.insert(0, Diff::from_chars(Op::Equal, &text_insert[..common]));
                                pointer += 1;
                            }
                            text_insert.drain(..common);
                            text_delete.drain(..common);
                        }
                        // Factor out any common suffix.
                        let common = text::common_suffix(&text_insert, &text_delete);
                        if common != 0 {
                            let mut merged = text_insert[text_insert.len() - common..].to_vec();
                            merged.extend_from_slice(&diffs[pointer].text);
                            diffs[pointer].text = merged;
                            text_insert.truncate(text_insert.len() - common);
                            text_delete.truncate(text_delete.len() - common);
                        }
                    }
                    // Replace the run with the merged records.
                    let start = pointer - count_delete - count_insert;
                    let mut replacement = Vec::with_capacity(2);
                    if !text_delete.is_empty() {
                        replacement.push(Diff::from_chars(Op::Delete, &text_delete));
                    }
                    if !text_insert.is_empty() {
                        replacement.push(Diff::from_chars(Op::Insert, &text_insert));
                    }
                    let advance = replacement.len();
                    diffs.splice(start..pointer, replacement);
                    pointer = start + advance + 1;
                } else if pointer != 0 && diffs[pointer - 1].op == Op::Equal {
                    // Merge this equality into the previous one.
                    let text = diffs.remove(pointer).text;
                    diffs[pointer - 1].text.extend(text);
                } else {
                    pointer += 1;
                }
                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }
    if diffs.last().is_some_and(|d| d.text.is_empty()) {
        diffs.pop();
    }

    // Second pass: slide single edits over a neighbouring equality when the
    // edit ends with (or starts with) that equality, eliminating it.
    // e.g.: A<ins>BA</ins>C -> <ins>AB</ins>AC
    let mut changes = false;
    let mut pointer = 1usize;
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            if diffs[pointer].text.ends_with(&diffs[pointer - 1].text) {
                // Shift the edit over the previous equality.
                let prev = diffs[pointer - 1].text.clone();
                let mut shifted = prev.clone();
                shifted.extend_from_slice(&diffs[pointer].text[..diffs[pointer].text.len() - prev.len()]);
                diffs[pointer].text = shifted;
                let mut next = prev;
                next.extend_from_slice(&diffs[pointer + 1].text);
                diffs[pointer + 1].text = next;
                diffs.remove(pointer - 1);
                changes = true;
            } else if diffs[pointer].text.starts_with(&diffs[pointer + 1].text) {
                // Shift the edit over the next equality.
                let next = diffs.remove(pointer + 1).text;
                diffs[pointer - 1].text.extend_from_slice(&next);
                let mut shifted = diffs[pointer].text[next.len()..].to_vec();
                shifted.extend_from_slice(&next);
                diffs[pointer].text = shifted;
                changes = true;
            }
        }
        pointer += 1;
    }
    // A shift may have opened up further merges; sweep again.
    if changes {
        diff_cleanup_merge(diffs);
    }
}

/// Reduce the number of edits by eliminating semantically trivial
/// equalities.
pub fn diff_cleanup_semantic(diffs: &mut Vec<Diff>) {
    if diffs.is_empty() {
        return;
    }

    let mut changes = false;
    // Stack of indices where equalities are found.
    let mut equalities: Vec<usize> = Vec::new();
    // Always equal to the text at equalities.last().
    let mut last_equality: Vec<char> = Vec::new();
    let mut pointer: isize = 0;
    // Number of characters changed before and after the last equality.
    let mut length_insertions1 = 0usize;
    let mut length_deletions1 = 0usize;
    let mut length_insertions2 = 0usize;
    let mut length_deletions2 = 0usize;
    while (pointer as usize) < diffs.len() {
        let idx = pointer as usize;
        if diffs[idx].op == Op::Equal {
            equalities.push(idx);
            length_insertions1 = length_insertions2;
            length_deletions1 = length_deletions2;
            length_insertions2 = 0;
            length_deletions2 = 0;
            last_equality = diffs[idx].text.clone();
        } else {
            if diffs[idx].op == Op::Insert {
                length_insertions2 += diffs[idx].text.len();
            } else {
                length_deletions2 += diffs[idx].text.len();
            }
            // Eliminate an equality smaller than or equal to the edits on
            // both sides of it.
            if !last_equality.is_empty()
                && last_equality.len() <= length_insertions1.max(length_deletions1)
                && last_equality.len() <= length_insertions2.max(length_deletions2)
            {
                if let Some(&eq_idx) = equalities.last() {
                    // Duplicate record: the equality becomes a delete plus an
                    // insert of the same text.
                    diffs.insert(eq_idx, Diff::from_chars(Op::Delete, &last_equality));
                    diffs[eq_idx + 1].op = Op::Insert;
                    // Throw away the equality we just deleted, and the
                    // previous one, which it may now interact with.
                    equalities.pop();
                    equalities.pop();
                    pointer = match equalities.last() {
                        Some(&i) => i as isize,
                        None => -1,
                    };
                    length_insertions1 = 0;
                    length_deletions1 = 0;
                    length_insertions2 = 0;
                    length_deletions2 = 0;
                    last_equality = Vec::new();
                    changes = true;
                }
            }
        }
        pointer += 1;
    }

    // Normalize the diff.
    if changes {
        diff_cleanup_merge(diffs);
    }
    diff_cleanup_semantic_lossless(diffs);

    // Extract overlaps between adjacent delete/insert pairs.
    // e.g.: <del>abcxxx</del><ins>xxxdef</ins> -> <del>abc</del>xxx<ins>def</ins>
    // e.g.: <del>xxxabc</del><ins>defxxx</ins> -> <ins>def</ins>xxx<del>abc</del>
    // Only extract an overlap as big as the edit ahead or behind it.
    let mut pointer = 1usize;
    while pointer < diffs.len() {
        if diffs[pointer - 1].op == Op::Delete && diffs[pointer].op == Op::Insert {
            let deletion = diffs[pointer - 1].text.clone();
            let insertion = diffs[pointer].text.clone();
            let overlap1 = text::common_overlap(&deletion, &insertion);
            let overlap2 = text::common_overlap(&insertion, &deletion);
            if overlap1 >= overlap2 {
                if overlap1 * 2 >= deletion.len() || overlap1 * 2 >= insertion.len() {
                    // Insert an equality and trim the surrounding edits.
                    diffs.insert(pointer, Diff::from_chars(Op::Equal, &insertion[..overlap1]));
                    diffs[pointer - 1] =
                        Diff::from_chars(Op::Delete, &deletion[..deletion.len() - overlap1]);
                    diffs[pointer + 1] = Diff::from_chars(Op::Insert, &insertion[overlap1..]);
                    pointer += 1;
                }
            } else if overlap2 * 2 >= deletion.len() || overlap2 * 2 >= insertion.len() {
                // Reverse overlap; swap the delete and insert roles.
                diffs.insert(pointer, Diff::from_chars(Op::Equal, &deletion[..overlap2]));
                diffs[pointer - 1] =
                    Diff::from_chars(Op::Insert, &insertion[..insertion.len() - overlap2]);
                diffs[pointer + 1] = Diff::from_chars(Op::Delete, &deletion[overlap2..]);
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }
}

/// Look for single edits surrounded on both sides by equalities which can be
/// shifted sideways to align with logical boundaries.
/// e.g.: The c<ins>at c</ins>ame. -> The <ins>cat </ins>came.
pub fn diff_cleanup_semantic_lossless(diffs: &mut Vec<Diff>) {
    if diffs.is_empty() {
        return;
    }

    let mut pointer = 1usize;
    // The first and last element don't need checking.
    while pointer + 1 < diffs.len() {
        if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
            // A single edit surrounded by equalities.
            let mut equality1 = diffs[pointer - 1].text.clone();
            let mut edit = diffs[pointer].text.clone();
            let mut equality2 = diffs[pointer + 1].text.clone();

            // First, shift the edit as far left as possible.
            let common_offset = text::common_suffix(&equality1, &edit);
            if common_offset > 0 {
                let common = edit[edit.len() - common_offset..].to_vec();
                equality1.truncate(equality1.len() - common_offset);
                let mut shifted = common.clone();
                shifted.extend_from_slice(&edit[..edit.len() - common_offset]);
                edit = shifted;
                let mut prefixed = common;
                prefixed.extend_from_slice(&equality2);
                equality2 = prefixed;
            }

            // Second, step character by character right, scoring each
            // position.
            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score =
                semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2[0]);
                equality2.remove(0);
                let score = semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
                // The >= encourages trailing rather than leading whitespace
                // on edits.
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if diffs[pointer - 1].text != best_equality1 {
                // An improvement was found; save it back to the diff.
                if !best_equality1.is_empty() {
                    diffs[pointer - 1].text = best_equality1;
                } else {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                }
                diffs[pointer].text = best_edit;
                if !best_equality2.is_empty() {
                    diffs[pointer + 1].text = best_equality2;
                } else {
                    diffs.remove(pointer + 1);
                    pointer -= 1;
                }
            }
        }
        pointer += 1;
    }
}

/// Score how well the boundary between `one` and `two` falls on logical
/// boundaries, from 6 (best) down to 0 (worst).
fn semantic_score(one: &[char], two: &[char]) -> u32 {
    if one.is_empty() || two.is_empty() {
        // Edges are the best.
        return 6;
    }

    let char1 = one[one.len() - 1];
    let char2 = two[0];
    let non_alphanumeric1 = !strings::is_alphanumeric(char1);
    let non_alphanumeric2 = !strings::is_alphanumeric(char2);
    let whitespace1 = non_alphanumeric1 && strings::is_whitespace(char1);
    let whitespace2 = non_alphanumeric2 && strings::is_whitespace(char2);
    let line_break1 = whitespace1 && strings::is_control(char1);
    let line_break2 = whitespace2 && strings::is_control(char2);
    let blank_line1 = line_break1 && ends_with_blank_line(one);
    let blank_line2 = line_break2 && starts_with_blank_line(two);

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alphanumeric1 && !whitespace1 && whitespace2 {
        // End of sentence.
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alphanumeric1 || non_alphanumeric2 {
        1
    } else {
        0
    }
}

/// Suffix matches `\n\r?\n`.
fn ends_with_blank_line(text: &[char]) -> bool {
    let n = text.len();
    (n >= 2 && text[n - 1] == '\n' && text[n - 2] == '\n')
        || (n >= 3 && text[n - 1] == '\n' && text[n - 2] == '\r' && text[n - 3] == '\n')
}

/// Prefix matches `\r?\n\r?\n`.
fn starts_with_blank_line(text: &[char]) -> bool {
    let mut i = 0;
    if text.get(i) == Some(&'\r') {
        i += 1;
    }
    if text.get(i) != Some(&'\n') {
        return false;
    }
    i += 1;
    if text.get(i) == Some(&'\r') {
        i += 1;
    }
    text.get(i) == Some(&'\n')
}

/// Reduce the number of edits by eliminating operationally trivial
/// equalities: short equalities wedged between edits on both sides cost more
/// to keep than to fold into the edits.
pub fn diff_cleanup_efficiency(settings: &Settings, diffs: &mut Vec<Diff>) {
    if diffs.is_empty() {
        return;
    }

    let edit_cost = usize::from(settings.diff_edit_cost);
    let mut changes = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Vec<char> = Vec::new();
    let mut pointer: isize = 0;
    // Edit kinds seen before and after the last equality.
    let mut pre_ins = false;
    let mut pre_del = false;
    let mut post_ins = false;
    let mut post_del = false;
    while (pointer as usize) < diffs.len() {
        let idx = pointer as usize;
        if diffs[idx].op == Op::Equal {
            if diffs[idx].text.len() < edit_cost && (post_ins || post_del) {
                // Candidate found.
                equalities.push(idx);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = diffs[idx].text.clone();
            } else {
                // Not a candidate, and can never become one.
                equalities.clear();
                last_equality = Vec::new();
            }
            post_ins = false;
            post_del = false;
        } else {
            if diffs[idx].op == Op::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }
            // Eliminate when edits of all four kinds surround the equality,
            // or three kinds do and the equality is shorter than half the
            // edit cost.
            let surround =
                usize::from(pre_ins) + usize::from(pre_del) + usize::from(post_ins) + usize::from(post_del);
            if !last_equality.is_empty()
                && ((pre_ins && pre_del && post_ins && post_del)
                    || (last_equality.len() < edit_cost / 2 && surround == 3))
            {
                if let Some(&eq_idx) = equalities.last() {
                    diffs.insert(eq_idx, Diff::from_chars(Op::Delete, &last_equality));
                    diffs[eq_idx + 1].op = Op::Insert;
                    equalities.pop();
                    last_equality = Vec::new();
                    if pre_ins && pre_del {
                        // No changes can affect previous entries; keep going.
                        post_ins = true;
                        post_del = true;
                        equalities.clear();
                    } else {
                        equalities.pop();
                        pointer = match equalities.last() {
                            Some(&i) => i as isize,
                            None => -1,
                        };
                        post_ins = false;
                        post_del = false;
                    }
                    changes = true;
                }
            }
        }
        pointer += 1;
    }

    if changes {
        diff_cleanup_merge(diffs);
    }
}
