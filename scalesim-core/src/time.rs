//! Simulated time.
//!
//! [`SimTime`] is a point on the simulation's logical clock, stored as
//! nanoseconds. It is advanced only by executing movements, never by the wall
//! clock, which keeps runs deterministic and reproducible.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// The smallest representable step of simulated time: one nanosecond.
///
/// Collision resolution in the movement queue probes forward in `TICK`
/// increments until it finds an unoccupied instant.
pub const TICK: Duration = Duration::from_nanos(1);

/// A point in simulated time with nanosecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// The simulation epoch, time zero.
    pub const fn zero() -> Self {
        SimTime(0)
    }

    /// Create a `SimTime` from nanoseconds.
    pub const fn from_nanos(nanos: u64) -> Self {
        SimTime(nanos)
    }

    /// Create a `SimTime` from microseconds.
    pub const fn from_micros(micros: u64) -> Self {
        SimTime(micros * 1_000)
    }

    /// Create a `SimTime` from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        SimTime(millis * 1_000_000)
    }

    /// Create a `SimTime` from seconds.
    pub const fn from_secs(secs: u64) -> Self {
        SimTime(secs * 1_000_000_000)
    }

    /// Create a `SimTime` from a `Duration` since the epoch.
    pub fn from_duration(duration: Duration) -> Self {
        SimTime(duration.as_nanos() as u64)
    }

    /// The raw nanosecond value.
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// This instant as a `Duration` since the epoch.
    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.0)
    }

    /// The instant one logical tick later.
    pub const fn next_tick(&self) -> Self {
        SimTime(self.0.saturating_add(1))
    }

    /// The instant one logical tick earlier. Saturates at time zero.
    pub const fn prev_tick(&self) -> Self {
        SimTime(self.0.saturating_sub(1))
    }

    /// The duration elapsed since `earlier`, or zero if `earlier` is later.
    pub fn duration_since(&self, earlier: SimTime) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> Self::Output {
        SimTime(self.0.saturating_add(rhs.as_nanos() as u64))
    }
}

impl Sub<Duration> for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: Duration) -> Self::Output {
        SimTime(self.0.saturating_sub(rhs.as_nanos() as u64))
    }
}

impl Sub<SimTime> for SimTime {
    type Output = Duration;

    fn sub(self, rhs: SimTime) -> Self::Output {
        self.duration_since(rhs)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = self.as_duration();
        let secs = duration.as_secs();
        let nanos = duration.subsec_nanos();

        if nanos == 0 {
            write!(f, "{secs}s")
        } else {
            write!(f, "{secs}.{nanos:09}s")
        }
    }
}
