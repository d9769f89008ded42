//! Line-to-char encoding for the line-mode speedup.
//!
//! Each distinct line is mapped to a small integer id and the texts are
//! rewritten as strings of id characters, so a line-level diff is just a
//! character diff over a dense alphabet.

use std::collections::HashMap;

use super::Diff;

/// Distinct-id budget for text1, leaving the rest of the id space for text2.
const MAX_LINES_1: u32 = 40_000;
/// Hard ceiling of the 16-bit encoding slot.
const MAX_LINES_2: u32 = 65_535;

/// Result of [`diff_lines_to_chars`]. `lines[id]` holds the line behind each
/// id; index 0 is a placeholder so ids can start at 1.
pub struct LineEncoding<'a> {
    pub chars1: Vec<char>,
    pub chars2: Vec<char>,
    pub lines: Vec<&'a [char]>,
}

/// Ids are materialized as `char`s, and `char` excludes the surrogate range;
/// ids at or past 0xD800 shift up by 0x800 to hop the gap.
fn id_to_char(id: u32) -> char {
    let cp = if id < 0xD800 { id } else { id + 0x800 };
    char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn char_to_id(c: char) -> u32 {
    let cp = c as u32;
    if cp >= 0xE000 {
        cp - 0x800
    } else {
        cp
    }
}

/// Split both texts into lines and encode them over the shared id alphabet.
pub fn diff_lines_to_chars<'a>(text1: &'a [char], text2: &'a [char]) -> LineEncoding<'a> {
    let mut line_hash: HashMap<&'a [char], u32> = HashMap::new();
    let mut line_array: Vec<&'a [char]> = vec![&[]];
    let chars1 = munge(text1, &mut line_hash, &mut line_array, MAX_LINES_1);
    let chars2 = munge(text2, &mut line_hash, &mut line_array, MAX_LINES_2);
    LineEncoding {
        chars1,
        chars2,
        lines: line_array,
    }
}

fn munge<'a>(
    text: &'a [char],
    line_hash: &mut HashMap<&'a [char], u32>,
    line_array: &mut Vec<&'a [char]>,
    max_lines: u32,
) -> Vec<char> {
    let mut encoded = Vec::new();
    let mut line_start = 0;
    while line_start < text.len() {
        let mut line_end = text[line_start..]
            .iter()
            .position(|&c| c == '\n')
            .map(|pos| line_start + pos)
            .unwrap_or(text.len() - 1);
        let line = &text[line_start..line_end + 1];
        match line_hash.get(line) {
            Some(&id) => encoded.push(id_to_char(id)),
            None => {
                let mut line = line;
                if line_array.len() as u32 == max_lines {
                    // Id space exhausted; the rest of the text becomes one
                    // synthetic line.
                    line = &text[line_start..];
                    line_end = text.len() - 1;
                }
                let id = line_array.len() as u32;
                line_array.push(line);
                line_hash.insert(line, id);
                encoded.push(id_to_char(id));
            }
        }
        line_start = line_end + 1;
    }
    encoded
}

/// Rehydrate a diff over id characters back into real lines.
pub fn diff_chars_to_lines(diffs: &[Diff], lines: &[&[char]]) -> Vec<Diff> {
    diffs
        .iter()
        .map(|diff| {
            let mut expanded = Vec::new();
            for &c in &diff.text {
                expanded.extend_from_slice(lines[char_to_id(c) as usize]);
            }
            Diff {
                op: diff.op,
                text: expanded,
            }
        })
        .collect()
}
