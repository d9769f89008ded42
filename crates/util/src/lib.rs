//! Shared helpers for the dmp crates.

pub mod fuzzer;
pub mod strings;

pub use fuzzer::Fuzzer;
