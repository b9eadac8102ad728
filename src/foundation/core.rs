use chrono::TimeDelta;

use crate::foundation::error::{ReelError, ReelResult};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// 0-based index of a tick on the sampling grid, and of the output frame rendered for it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Zero-padded file name for this frame, e.g. `0042.png` for `digits = 4`.
    pub fn file_name(self, digits: usize, ext: &str) -> String {
        format!("{:0digits$}.{ext}", self.0)
    }
}

/// Fixed interval between two consecutive ticks.
///
/// Stored as whole nanoseconds so that tick `k` is exactly `k * rate`; repeated
/// addition of a float step would drift off the grid on long routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rate {
    nanos: i64,
}

impl Rate {
    /// One tick per second of elapsed route time.
    pub const ONE_SECOND: Rate = Rate {
        nanos: 1_000_000_000,
    };

    /// Build a rate from a positive interval.
    pub fn new(interval: TimeDelta) -> ReelResult<Self> {
        let nanos = interval
            .num_nanoseconds()
            .ok_or_else(|| ReelError::invalid_input("rate exceeds the supported range"))?;
        if nanos <= 0 {
            return Err(ReelError::invalid_input("rate must be > 0"));
        }
        Ok(Self { nanos })
    }

    /// Build a rate from a number of seconds (fractions allowed).
    pub fn from_secs_f64(secs: f64) -> ReelResult<Self> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(ReelError::invalid_input(
                "rate must be a finite number of seconds > 0",
            ));
        }
        let nanos = (secs * NANOS_PER_SEC).round();
        if nanos < 1.0 {
            return Err(ReelError::invalid_input(
                "rate must be at least one nanosecond",
            ));
        }
        if nanos >= i64::MAX as f64 {
            return Err(ReelError::invalid_input("rate exceeds the supported range"));
        }
        Ok(Self {
            nanos: nanos as i64,
        })
    }

    /// The interval as a [`TimeDelta`].
    pub fn interval(self) -> TimeDelta {
        TimeDelta::nanoseconds(self.nanos)
    }

    /// The interval in (fractional) seconds.
    pub fn as_secs_f64(self) -> f64 {
        self.nanos as f64 / NANOS_PER_SEC
    }

    /// Number of ticks on the grid `0, rate, 2*rate, ...` that are `<= duration`.
    ///
    /// This is `floor(duration / rate) + 1`; a zero duration still has the tick at 0.
    pub fn tick_count(self, duration: TimeDelta) -> ReelResult<u64> {
        let duration = duration_nanos(duration)?;
        Ok((duration / self.nanos) as u64 + 1)
    }

    /// Offset of tick `k` from the start of the grid.
    pub fn tick_at(self, k: u64) -> TimeDelta {
        let k = i64::try_from(k).unwrap_or(i64::MAX);
        TimeDelta::nanoseconds(k.saturating_mul(self.nanos))
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.as_secs_f64())
    }
}

/// Seconds in `d`, at nanosecond precision while `d` fits in i64 nanoseconds.
pub(crate) fn secs_f64(d: TimeDelta) -> f64 {
    match d.num_nanoseconds() {
        Some(nanos) => nanos as f64 / NANOS_PER_SEC,
        None => d.num_milliseconds() as f64 / 1_000.0,
    }
}

/// Validate a route/timeline duration and return it in nanoseconds.
pub(crate) fn duration_nanos(duration: TimeDelta) -> ReelResult<i64> {
    let nanos = duration
        .num_nanoseconds()
        .ok_or_else(|| ReelError::invalid_input("duration exceeds the supported range"))?;
    if nanos < 0 {
        return Err(ReelError::invalid_input("duration must be >= 0"));
    }
    Ok(nanos)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
