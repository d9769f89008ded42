//! Diff engine: Myers-bisect core with pre/post shortcuts and cleanups.
//!
//! `diff_main` drives the pipeline: equality shortcut, common affix
//! stripping, containment and single-character shortcuts, the half-match
//! decomposition, the line-mode speedup for large inputs, and finally the
//! bisect. The result is normalized with `diff_cleanup_merge`; callers that
//! want human-friendly output run `diff_cleanup_semantic` (or
//! `diff_cleanup_efficiency` for machine consumption) on top.

use std::fmt;

use crate::clock::Deadline;
use crate::settings::Settings;
use crate::text;

pub mod bisect;
pub mod cleanup;
pub mod delta;
pub mod half_match;
pub mod lines;

pub use cleanup::{
    diff_cleanup_efficiency, diff_cleanup_merge, diff_cleanup_semantic,
    diff_cleanup_semantic_lossless,
};

/// Edit operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Delete,
    Insert,
    Equal,
}

/// One edit: an operation and the text it applies to.
#[derive(Clone, PartialEq, Eq)]
pub struct Diff {
    pub op: Op,
    pub text: Vec<char>,
}

impl Diff {
    pub fn new(op: Op, text: &str) -> Self {
        Diff {
            op,
            text: text.chars().collect(),
        }
    }

    pub(crate) fn from_chars(op: Op, text: &[char]) -> Self {
        Diff {
            op,
            text: text.to_vec(),
        }
    }

    /// The text of this edit as an owned string.
    pub fn text_string(&self) -> String {
        self.text.iter().collect()
    }
}

impl fmt::Debug for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Diff({:?}, {:?})", self.op, self.text_string())
    }
}

/// Find the differences between two texts.
///
/// `check_lines` enables the line-mode speedup for inputs over 100
/// characters; it trades a slightly less optimal diff for a large constant
/// factor. The wall-clock budget comes from `settings.diff_timeout`; on
/// expiry the result is still a valid diff, just coarser.
pub fn diff_main(settings: &Settings, text1: &str, text2: &str, check_lines: bool) -> Vec<Diff> {
    let deadline = Deadline::start(settings.diff_timeout);
    let t1 = text::to_chars(text1);
    let t2 = text::to_chars(text2);
    diff_main_impl(settings, &t1, &t2, check_lines, &deadline)
}

pub(crate) fn diff_main_impl(
    settings: &Settings,
    text1: &[char],
    text2: &[char],
    check_lines: bool,
    deadline: &Deadline,
) -> Vec<Diff> {
    if text1 == text2 {
        if text1.is_empty() {
            return Vec::new();
        }
        return vec![Diff::from_chars(Op::Equal, text1)];
    }

    // Strip the common prefix and suffix; both come back as equality
    // bookends after the middle has been diffed.
    let prefix_len = text::common_prefix(text1, text2);
    let prefix = &text1[..prefix_len];
    let t1 = &text1[prefix_len..];
    let t2 = &text2[prefix_len..];

    let suffix_len = text::common_suffix(t1, t2);
    let suffix = &t1[t1.len() - suffix_len..];
    let t1 = &t1[..t1.len() - suffix_len];
    let t2 = &t2[..t2.len() - suffix_len];

    let mut diffs = diff_compute(settings, t1, t2, check_lines, deadline);

    if !prefix.is_empty() {
        diffs.insert(0, Diff::from_chars(Op::Equal, prefix));
    }
    if !suffix.is_empty() {
        diffs.push(Diff::from_chars(Op::Equal, suffix));
    }
    cleanup::diff_cleanup_merge(&mut diffs);
    diffs
}

/// Diff two texts that share no common prefix or suffix.
fn diff_compute(
    settings: &Settings,
    text1: &[char],
    text2: &[char],
    check_lines: bool,
    deadline: &Deadline,
) -> Vec<Diff> {
    if text1.is_empty() {
        return vec![Diff::from_chars(Op::Insert, text2)];
    }
    if text2.is_empty() {
        return vec![Diff::from_chars(Op::Delete, text1)];
    }

    let (long_text, short_text) = if text1.len() > text2.len() {
        (text1, text2)
    } else {
        (text2, text1)
    };
    if let Some(i) = text::index_of(long_text, short_text, 0) {
        // Shorter text is inside the longer text.
        let op = if text1.len() > text2.len() {
            Op::Delete
        } else {
            Op::Insert
        };
        return vec![
            Diff::from_chars(op, &long_text[..i]),
            Diff::from_chars(Op::Equal, short_text),
            Diff::from_chars(op, &long_text[i + short_text.len()..]),
        ];
    }

    if short_text.len() == 1 {
        // After the containment check the single character cannot be an
        // equality.
        return vec![
            Diff::from_chars(Op::Delete, text1),
            Diff::from_chars(Op::Insert, text2),
        ];
    }

    if let Some(hm) = half_match::half_match(settings, text1, text2) {
        // Send both halves off for separate processing with the common
        // middle as an equality between them.
        let mut diffs = diff_main_impl(settings, hm.prefix1, hm.prefix2, check_lines, deadline);
        diffs.push(Diff::from_chars(Op::Equal, hm.common));
        diffs.extend(diff_main_impl(
            settings, hm.suffix1, hm.suffix2, check_lines, deadline,
        ));
        return diffs;
    }

    if check_lines && text1.len() > 100 && text2.len() > 100 {
        return line_mode(settings, text1, text2, deadline);
    }

    bisect::diff_bisect_impl(settings, text1, text2, deadline)
}

/// Quick line-level diff, then rediff the replacement blocks character by
/// character. Can produce non-minimal diffs.
fn line_mode(
    settings: &Settings,
    text1: &[char],
    text2: &[char],
    deadline: &Deadline,
) -> Vec<Diff> {
    let encoding = lines::diff_lines_to_chars(text1, text2);
    let encoded_diffs = diff_main_impl(
        settings,
        &encoding.chars1,
        &encoding.chars2,
        false,
        deadline,
    );
    let mut diffs = lines::diff_chars_to_lines(&encoded_diffs, &encoding.lines);

    // Eliminate freak matches such as blank lines.
    cleanup::diff_cleanup_semantic(&mut diffs);

    // Rediff any replacement blocks. The trailing sentinel equality
    // simplifies the loop and is dropped at the end.
    diffs.push(Diff::new(Op::Equal, ""));
    let mut pointer = 0;
    let mut count_delete = 0;
    let mut count_insert = 0;
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();
    while pointer < diffs.len() {
        match diffs[pointer].op {
            Op::Insert => {
                count_insert += 1;
                text_insert.extend_from_slice(&diffs[pointer].text);
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.extend_from_slice(&diffs[pointer].text);
            }
            Op::Equal => {
                if count_delete >= 1 && count_insert >= 1 {
                    let sub = diff_main_impl(settings, &text_delete, &text_insert, false, deadline);
                    let start = pointer - count_delete - count_insert;
                    let sub_len = sub.len();
                    diffs.splice(start..pointer, sub);
                    pointer = start + sub_len;
                }
                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
        pointer += 1;
    }
    diffs.pop();
    diffs
}

/// Source text: all equalities and deletions.
pub fn diff_text1(diffs: &[Diff]) -> String {
    text::from_chars(&text1_chars(diffs))
}

/// Destination text: all equalities and insertions.
pub fn diff_text2(diffs: &[Diff]) -> String {
    text::from_chars(&text2_chars(diffs))
}

pub(crate) fn text1_chars(diffs: &[Diff]) -> Vec<char> {
    let mut out = Vec::new();
    for diff in diffs {
        if diff.op != Op::Insert {
            out.extend_from_slice(&diff.text);
        }
    }
    out
}

pub(crate) fn text2_chars(diffs: &[Diff]) -> Vec<char> {
    let mut out = Vec::new();
    for diff in diffs {
        if diff.op != Op::Delete {
            out.extend_from_slice(&diff.text);
        }
    }
    out
}

/// Translate a text1 offset to the equivalent text2 offset.
/// e.g. "The cat" vs "The big cat": 1 -> 1, 5 -> 8.
pub fn diff_x_index(diffs: &[Diff], loc: usize) -> usize {
    let mut chars1 = 0;
    let mut chars2 = 0;
    let mut last_chars1 = 0;
    let mut last_chars2 = 0;
    let mut overshot: Option<&Diff> = None;
    for diff in diffs {
        if diff.op != Op::Insert {
            chars1 += diff.text.len();
        }
        if diff.op != Op::Delete {
            chars2 += diff.text.len();
        }
        if chars1 > loc {
            overshot = Some(diff);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }
    if overshot.is_some_and(|d| d.op == Op::Delete) {
        // The location was deleted.
        return last_chars2;
    }
    last_chars2 + (loc - last_chars1)
}

/// Levenshtein distance of the script: inserted, deleted or substituted
/// characters.
pub fn diff_levenshtein(diffs: &[Diff]) -> usize {
    let mut levenshtein = 0;
    let mut insertions = 0;
    let mut deletions = 0;
    for diff in diffs {
        match diff.op {
            Op::Insert => insertions += diff.text.len(),
            Op::Delete => deletions += diff.text.len(),
            Op::Equal => {
                // A deletion next to an insertion is one substitution.
                levenshtein += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }
    levenshtein + insertions.max(deletions)
}

/// Render the script as an HTML report.
pub fn diff_pretty_html(diffs: &[Diff]) -> String {
    let mut html = String::new();
    for diff in diffs {
        let body = escape_html(&diff.text);
        match diff.op {
            Op::Insert => {
                html.push_str("<ins style=\"background:#e6ffe6;\">");
                html.push_str(&body);
                html.push_str("</ins>");
            }
            Op::Delete => {
                html.push_str("<del style=\"background:#ffe6e6;\">");
                html.push_str(&body);
                html.push_str("</del>");
            }
            Op::Equal => {
                html.push_str("<span>");
                html.push_str(&body);
                html.push_str("</span>");
            }
        }
    }
    html
}

fn escape_html(text: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for &c in text {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("&para;<br>"),
            _ => out.push(c),
        }
    }
    out
}
