//! Text form of a patch list.
//!
//! Serialization is the concatenated `Display` of each patch: a GNU-style
//! `@@ -s,l +s,l @@` header followed by one percent-escaped body line per
//! diff, prefixed `+`, `-` or ` `. Parsing inverts the writer's numeric
//! conventions exactly; any malformed line fails the whole parse.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use dmp_util::strings::percent_decode;

use super::Patch;
use crate::diff::{Diff, Op};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchParseError {
    #[error("invalid patch header: {0}")]
    InvalidHeader(String),
    #[error("invalid percent escape in patch body: {0}")]
    InvalidEscape(String),
    #[error("unknown line prefix in patch body: {0}")]
    UnknownSign(String),
}

static HEADER: OnceLock<Regex> = OnceLock::new();

fn header_regex() -> &'static Regex {
    HEADER.get_or_init(|| {
        Regex::new(r"^@@ -(\d+),?(\d*) \+(\d+),?(\d*) @@$").expect("hard-coded header pattern")
    })
}

/// Serialize a patch list.
pub fn patch_to_text(patches: &[Patch]) -> String {
    patches.iter().map(|p| p.to_string()).collect()
}

/// Parse a textual representation of patches.
pub fn patch_from_text(input: &str) -> Result<Vec<Patch>, PatchParseError> {
    let mut patches = Vec::new();
    if input.is_empty() {
        return Ok(patches);
    }

    let lines: Vec<&str> = input.split('\n').collect();
    let mut pointer = 0usize;
    while pointer < lines.len() {
        let line = lines[pointer];
        if line.is_empty() {
            pointer += 1;
            continue;
        }
        let caps = header_regex()
            .captures(line)
            .ok_or_else(|| PatchParseError::InvalidHeader(line.to_string()))?;
        let (start1, length1) = parse_range(&caps[1], &caps[2], line)?;
        let (start2, length2) = parse_range(&caps[3], &caps[4], line)?;
        let mut patch = Patch {
            start1,
            start2,
            length1,
            length2,
            ..Patch::default()
        };

        pointer += 1;
        while pointer < lines.len() {
            let line = lines[pointer];
            let mut chars = line.chars();
            let sign = match chars.next() {
                Some(c) => c,
                None => {
                    // Blank line? Whatever.
                    pointer += 1;
                    continue;
                }
            };
            if sign == '@' {
                // Start of the next patch.
                break;
            }
            let body = percent_decode(chars.as_str())
                .ok_or_else(|| PatchParseError::InvalidEscape(line.to_string()))?;
            match sign {
                '-' => patch.diffs.push(Diff::new(Op::Delete, &body)),
                '+' => patch.diffs.push(Diff::new(Op::Insert, &body)),
                ' ' => patch.diffs.push(Diff::new(Op::Equal, &body)),
                _ => return Err(PatchParseError::UnknownSign(line.to_string())),
            }
            pointer += 1;
        }

        patches.push(patch);
    }
    Ok(patches)
}

/// Invert the header writer's rules: a missing count means length 1 with a
/// 1-based offset, an explicit 0 keeps the 0-based offset.
fn parse_range(start: &str, length: &str, line: &str) -> Result<(usize, usize), PatchParseError> {
    let mut start: usize = start
        .parse()
        .map_err(|_| PatchParseError::InvalidHeader(line.to_string()))?;
    let length = if length.is_empty() {
        start = start.saturating_sub(1);
        1
    } else if length == "0" {
        0
    } else {
        start = start.saturating_sub(1);
        length
            .parse()
            .map_err(|_| PatchParseError::InvalidHeader(line.to_string()))?
    };
    Ok((start, length))
}
