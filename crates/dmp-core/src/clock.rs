//! Wall-clock deadline for cooperative cancellation.

use std::time::{Duration, Instant};

/// Deadline threaded through the diff recursion. The bisect engine probes it
/// once per outer iteration; on expiry it falls back to a coarse
/// delete-everything/insert-everything script for its subproblem.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// Start a deadline `timeout` seconds from now. A timeout of zero or less
    /// disables expiry.
    pub fn start(timeout: f32) -> Self {
        if timeout > 0.0 {
            Deadline(Some(Instant::now() + Duration::from_secs_f32(timeout)))
        } else {
            Deadline(None)
        }
    }

    /// A deadline that never expires.
    pub fn unlimited() -> Self {
        Deadline(None)
    }

    /// A deadline that has already passed.
    pub fn already_expired() -> Self {
        Deadline(Some(Instant::now()))
    }

    pub fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}
