//! String helpers: percent escaping and ASCII character classification.

pub mod classify;
pub mod percent;

pub use classify::{is_alphanumeric, is_control, is_whitespace};
pub use percent::{percent_decode, percent_encode};
