use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{QschedError, Result};

/// Earliest valid timestamp: 0001-01-01T00:00:00Z.
const MIN_SECONDS: i64 = -62_135_596_800;
/// Latest valid timestamp: 9999-12-31T23:59:59Z.
const MAX_SECONDS: i64 = 253_402_300_799;

/// The zero time, 0001-01-01T00:00:00Z. Requests without a usable enqueue
/// time are ordered as if enqueued at this instant, ahead of any valid time.
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(MIN_SECONDS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Stored form of a wall-clock instant, as carried in scheduler state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    /// Convert to a `DateTime`, rejecting out-of-range values.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        let invalid = || QschedError::InvalidTimestamp {
            seconds: self.seconds,
            nanos: self.nanos,
        };
        if !(MIN_SECONDS..=MAX_SECONDS).contains(&self.seconds) {
            return Err(invalid());
        }
        let nanos = u32::try_from(self.nanos).map_err(|_| invalid())?;
        if nanos >= 1_000_000_000 {
            return Err(invalid());
        }
        DateTime::from_timestamp(self.seconds, nanos).ok_or_else(invalid)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(t: DateTime<Utc>) -> Self {
        // chrono reports a leap second as nanos >= 1e9.
        let nanos = t.timestamp_subsec_nanos().min(999_999_999);
        Self {
            seconds: t.timestamp(),
            nanos: nanos as i32,
        }
    }
}
