use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MILLI: u32 = 1_000_000;

/// A point in time with nanosecond resolution.
///
/// `seconds` counts UTC seconds since the Unix epoch; `nanoseconds` is the
/// non-negative fraction of that second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimestamp")]
pub struct Timestamp {
    seconds: i64,
    nanoseconds: u32,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTimestamp {
    seconds: i64,
    nanoseconds: u32,
}

impl TryFrom<RawTimestamp> for Timestamp {
    type Error = String;

    fn try_from(raw: RawTimestamp) -> Result<Self, Self::Error> {
        if i64::from(raw.nanoseconds) >= NANOS_PER_SECOND {
            return Err(format!(
                "nanoseconds must be below one second, got {}",
                raw.nanoseconds
            ));
        }
        Ok(Self {
            seconds: raw.seconds,
            nanoseconds: raw.nanoseconds,
        })
    }
}

impl Timestamp {
    /// Creates a timestamp, carrying whole seconds out of `nanoseconds`.
    pub fn new(seconds: i64, nanoseconds: u32) -> Self {
        let carry = i64::from(nanoseconds) / NANOS_PER_SECOND;
        Self {
            seconds: seconds.saturating_add(carry),
            nanoseconds: (i64::from(nanoseconds) % NANOS_PER_SECOND) as u32,
        }
    }

    pub fn from_millis(millis: i64) -> Self {
        Self {
            seconds: millis.div_euclid(1000),
            nanoseconds: millis.rem_euclid(1000) as u32 * NANOS_PER_MILLI,
        }
    }

    pub fn from_date(date: SystemTime) -> Self {
        match date.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => Self {
                seconds: elapsed.as_secs() as i64,
                nanoseconds: elapsed.subsec_nanos(),
            },
            Err(before) => {
                let before = before.duration();
                let mut seconds = -(before.as_secs() as i64);
                let mut nanoseconds = before.subsec_nanos();
                if nanoseconds > 0 {
                    seconds -= 1;
                    nanoseconds = NANOS_PER_SECOND as u32 - nanoseconds;
                }
                Self {
                    seconds,
                    nanoseconds,
                }
            }
        }
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }

    pub fn to_millis(&self) -> i64 {
        self.seconds
            .saturating_mul(1000)
            .saturating_add(i64::from(self.nanoseconds / NANOS_PER_MILLI))
    }

    /// The same instant as a `SystemTime`, or `None` when the platform
    /// cannot represent it.
    pub fn to_date(&self) -> Option<SystemTime> {
        let whole = Duration::from_secs(self.seconds.unsigned_abs());
        let fraction = Duration::from_nanos(u64::from(self.nanoseconds));
        let second = if self.seconds >= 0 {
            UNIX_EPOCH.checked_add(whole)?
        } else {
            UNIX_EPOCH.checked_sub(whole)?
        };
        second.checked_add(fraction)
    }

    pub fn is_equal(&self, other: &Timestamp) -> bool {
        self == other
    }

    pub(crate) fn to_json(self) -> serde_json::Value {
        serde_json::json!({
            "seconds": self.seconds,
            "nanoseconds": self.nanoseconds,
        })
    }
}

/// Creates timestamps for the adapter.
pub trait TimestampFactory: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;

    fn from_date(&self, date: SystemTime) -> Timestamp {
        Timestamp::from_date(date)
    }

    fn from_millis(&self, millis: i64) -> Timestamp {
        Timestamp::from_millis(millis)
    }
}

/// Reads the system clock, truncated to millisecond precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimestamps;

impl TimestampFactory for SystemTimestamps {
    fn now(&self) -> Timestamp {
        let now = Timestamp::from_date(SystemTime::now());
        Timestamp::from_millis(now.to_millis())
    }
}
