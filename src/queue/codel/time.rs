//! CoDel time: a compact, wrapping 32-bit timestamp.
//!
//! Nanosecond `SimTime` values are shifted right by [`CODEL_SHIFT`] bits
//! (roughly microsecond resolution) and truncated to 32 bits, so the clock
//! wraps about every 73 minutes. All ordering goes through signed
//! subtraction and is correct across the wrap as long as the two instants
//! are less than 2^31 units apart.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::SimTime;

/// Number of low bits discarded from a nanosecond time.
pub const CODEL_SHIFT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoDelTime(pub u32);

impl CoDelTime {
    pub const ZERO: CoDelTime = CoDelTime(0);

    pub const fn from_sim(t: SimTime) -> Self {
        CoDelTime((t.0 >> CODEL_SHIFT) as u32)
    }

    /// Back to nanoseconds, for logging and reports only.
    pub const fn as_nanos(self) -> u64 {
        (self.0 as u64) << CODEL_SHIFT
    }

    pub const fn wrapping_add(self, rhs: u32) -> Self {
        CoDelTime(self.0.wrapping_add(rhs))
    }

    pub const fn wrapping_sub(self, rhs: CoDelTime) -> Self {
        CoDelTime(self.0.wrapping_sub(rhs.0))
    }

    const fn diff(self, other: CoDelTime) -> i32 {
        self.0.wrapping_sub(other.0) as i32
    }

    /// `self` is strictly later than `other`.
    pub const fn after(self, other: CoDelTime) -> bool {
        self.diff(other) > 0
    }

    pub const fn after_eq(self, other: CoDelTime) -> bool {
        self.diff(other) >= 0
    }

    pub const fn before(self, other: CoDelTime) -> bool {
        self.diff(other) < 0
    }

    pub const fn before_eq(self, other: CoDelTime) -> bool {
        self.diff(other) <= 0
    }
}

impl From<SimTime> for CoDelTime {
    fn from(t: SimTime) -> Self {
        CoDelTime::from_sim(t)
    }
}

impl fmt::Display for CoDelTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}cu", self.0)
    }
}
