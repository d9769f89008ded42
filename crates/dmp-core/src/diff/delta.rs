//! Compact delta codec.
//!
//! A diff crushes down to tab-separated tokens: `=n` keep n characters,
//! `-n` delete n characters, `+text` insert percent-escaped text. Counts are
//! characters of the source text, so a delta plus the original text1
//! reconstructs the full diff.

use thiserror::Error;

use dmp_util::strings::{percent_decode, percent_encode};

use super::{Diff, Op};
use crate::text;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeltaError {
    #[error("invalid percent escape in delta: {0}")]
    InvalidEscape(String),
    #[error("invalid count in delta: {0}")]
    InvalidCount(String),
    #[error("unknown delta operation: {0}")]
    UnknownOperation(String),
    #[error("delta consumed {consumed} characters, source text has {expected}")]
    LengthMismatch { consumed: usize, expected: usize },
}

/// Encode a diff as a delta string.
/// E.g. `=3\t-2\t+ing` -> keep 3 chars, delete 2, insert "ing".
pub fn diff_to_delta(diffs: &[Diff]) -> String {
    let mut tokens = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match diff.op {
            Op::Insert => tokens.push(format!("+{}", percent_encode(&diff.text_string()))),
            Op::Delete => tokens.push(format!("-{}", diff.text.len())),
            Op::Equal => tokens.push(format!("={}", diff.text.len())),
        }
    }
    tokens.join("\t")
}

/// Reconstruct the full diff from the source text and a delta string.
pub fn diff_from_delta(text1: &str, delta: &str) -> Result<Vec<Diff>, DeltaError> {
    let chars = text::to_chars(text1);
    let mut diffs = Vec::new();
    // Cursor in text1.
    let mut pointer = 0usize;
    for token in delta.split('\t') {
        if token.is_empty() {
            // Blank tokens are ok (from a trailing \t).
            continue;
        }
        // Each token begins with a one-character operation.
        let mut token_chars = token.chars();
        let op = match token_chars.next() {
            Some(c) => c,
            None => continue,
        };
        let param = token_chars.as_str();
        match op {
            '+' => {
                let inserted = percent_decode(param)
                    .ok_or_else(|| DeltaError::InvalidEscape(param.to_string()))?;
                diffs.push(Diff::new(Op::Insert, &inserted));
            }
            '-' | '=' => {
                if param.is_empty() || !param.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(DeltaError::InvalidCount(param.to_string()));
                }
                let n: usize = param
                    .parse()
                    .map_err(|_| DeltaError::InvalidCount(param.to_string()))?;
                if pointer + n > chars.len() {
                    return Err(DeltaError::LengthMismatch {
                        consumed: pointer + n,
                        expected: chars.len(),
                    });
                }
                let kept = &chars[pointer..pointer + n];
                pointer += n;
                let kind = if op == '=' { Op::Equal } else { Op::Delete };
                diffs.push(Diff::from_chars(kind, kept));
            }
            _ => return Err(DeltaError::UnknownOperation(token.to_string())),
        }
    }
    if pointer != chars.len() {
        return Err(DeltaError::LengthMismatch {
            consumed: pointer,
            expected: chars.len(),
        });
    }
    Ok(diffs)
}
