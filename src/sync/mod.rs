pub mod operation;
pub mod poll;
pub mod trigger;

use std::time::Duration;

/// Cadence of every subscription-style operation. Not configurable per call.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);
