//! Myers O(ND) middle-snake bisect.

use super::{diff_main_impl, Diff, Op};
use crate::clock::Deadline;
use crate::settings::Settings;
use crate::text;

/// Find the 'middle snake', split the problem in two and recurse.
/// When the deadline expires, fall back to an un-diffed delete + insert.
pub fn diff_bisect(
    settings: &Settings,
    text1: &str,
    text2: &str,
    deadline: &Deadline,
) -> Vec<Diff> {
    diff_bisect_impl(
        settings,
        &text::to_chars(text1),
        &text::to_chars(text2),
        deadline,
    )
}

pub(crate) fn diff_bisect_impl(
    settings: &Settings,
    text1: &[char],
    text2: &[char],
    deadline: &Deadline,
) -> Vec<Diff> {
    if let Some((x, y)) = middle_snake(text1, text2, deadline) {
        return bisect_split(settings, text1, text2, x, y, deadline);
    }
    // Deadline hit, or the number of diffs equals the number of characters:
    // no commonality at all.
    vec![
        Diff::from_chars(Op::Delete, text1),
        Diff::from_chars(Op::Insert, text2),
    ]
}

fn middle_snake(text1: &[char], text2: &[char], deadline: &Deadline) -> Option<(usize, usize)> {
    let n = text1.len() as isize;
    let m = text2.len() as isize;
    let max_d = (n + m + 1) / 2;
    let v_offset = max_d;
    // One slot past 2*max_d keeps the `v_offset + 1` seeding and the k ± 1
    // probes in bounds.
    let v_length = (2 * max_d + 2) as usize;
    let mut v1 = vec![-1isize; v_length];
    let mut v2 = vec![-1isize; v_length];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;
    let delta = n - m;
    // With an odd total length the forward path collides with the reverse
    // path; otherwise the reverse path detects the overlap.
    let front = delta % 2 != 0;
    // Offsets for the start and end of the k loops, trimming the sweep once
    // a path runs off an edge of the grid.
    let mut k1start = 0isize;
    let mut k1end = 0isize;
    let mut k2start = 0isize;
    let mut k2end = 0isize;
    for d in 0..max_d {
        if deadline.expired() {
            return None;
        }

        // Walk the forward path one step.
        let mut k1 = -d + k1start;
        while k1 <= d - k1end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 < m && text1[x1 as usize] == text2[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;
            if x1 > n {
                // Ran off the right of the graph.
                k1end += 2;
            } else if y1 > m {
                // Ran off the bottom of the graph.
                k1start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if k2_offset >= 0 && (k2_offset as usize) < v_length && v2[k2_offset as usize] != -1
                {
                    // Mirror x2 onto the top-left coordinate system.
                    let x2 = n - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return Some((x1 as usize, y1 as usize));
                    }
                }
            }
            k1 += 2;
        }

        // Walk the reverse path one step.
        let mut k2 = -d + k2start;
        while k2 <= d - k2end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n
                && y2 < m
                && text1[(n - x2 - 1) as usize] == text2[(m - y2 - 1) as usize]
            {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;
            if x2 > n {
                // Ran off the left of the graph.
                k2end += 2;
            } else if y2 > m {
                // Ran off the top of the graph.
                k2start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if k1_offset >= 0 && (k1_offset as usize) < v_length && v1[k1_offset as usize] != -1
                {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    // Mirror x2 onto the top-left coordinate system.
                    let x2_mirror = n - x2;
                    if x1 >= x2_mirror {
                        return Some((x1 as usize, y1 as usize));
                    }
                }
            }
            k2 += 2;
        }
    }
    None
}

/// Recurse on the two halves around the split point.
fn bisect_split(
    settings: &Settings,
    text1: &[char],
    text2: &[char],
    x: usize,
    y: usize,
    deadline: &Deadline,
) -> Vec<Diff> {
    let mut diffs = diff_main_impl(settings, &text1[..x], &text2[..y], false, deadline);
    diffs.extend(diff_main_impl(
        settings,
        &text1[x..],
        &text2[y..],
        false,
        deadline,
    ));
    diffs
}
