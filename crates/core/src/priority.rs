use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of real (non-free) priority bands.
pub const NUM_PRIORITIES: usize = 3;

/// A qscheduler priority level. Lower numeric value = higher priority.
///
/// Values `0..NUM_PRIORITIES` are the real bands. [`Priority::FREE_BUCKET`]
/// is worse than all of them and holds requests that have no quota or that
/// exceed their account's fanout limit. Other values are representable so
/// that externally built orderings can still be queried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(i32);

impl Priority {
    pub const P0: Priority = Priority(0);
    pub const P1: Priority = Priority(1);
    pub const P2: Priority = Priority(2);
    pub const FREE_BUCKET: Priority = Priority(NUM_PRIORITIES as i32);

    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    pub fn is_free(self) -> bool {
        self == Self::FREE_BUCKET
    }

    /// The real bands, highest priority first.
    pub fn bands() -> impl Iterator<Item = Priority> {
        (0..NUM_PRIORITIES as i32).map(Priority)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_free() {
            f.write_str("FreeBucket")
        } else {
            write!(f, "P{}", self.0)
        }
    }
}
