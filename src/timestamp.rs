//! # Game Time
//!
//! The simulation clock counts turns. One turn is one second of game time, so
//! durations written in hours or minutes convert to whole turns.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

pub const TURNS_PER_MINUTE: i64 = 60;
pub const TURNS_PER_HOUR: i64 = 60 * TURNS_PER_MINUTE;

/// A point on the game clock, measured in turns since the start of the game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(transparent)]
pub struct TimePoint(i64);

impl TimePoint {
    pub const fn from_turns(turns: i64) -> Self {
        Self(turns)
    }

    pub fn turns(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TimePoint {
    fn from(turns: i64) -> Self {
        Self(turns)
    }
}

impl std::fmt::Display for TimePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "turn {}", self.0)
    }
}

/// A span of game time in turns. May be negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(transparent)]
pub struct TimeDuration(i64);

impl TimeDuration {
    pub const fn from_turns(turns: i64) -> Self {
        Self(turns)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self(minutes * TURNS_PER_MINUTE)
    }

    /// Converts fractional hours to turns, rounding to the nearest turn.
    /// Non-finite input yields a zero duration.
    pub fn from_hours(hours: f64) -> Self {
        if !hours.is_finite() {
            return Self(0);
        }
        Self((hours * TURNS_PER_HOUR as f64).round() as i64)
    }

    pub fn turns(&self) -> i64 {
        self.0
    }
}

impl Add<TimeDuration> for TimePoint {
    type Output = TimePoint;

    fn add(self, rhs: TimeDuration) -> Self::Output {
        TimePoint(self.0.saturating_add(rhs.0))
    }
}

impl Sub<TimeDuration> for TimePoint {
    type Output = TimePoint;

    fn sub(self, rhs: TimeDuration) -> Self::Output {
        TimePoint(self.0.saturating_sub(rhs.0))
    }
}

impl Sub<TimePoint> for TimePoint {
    type Output = TimeDuration;

    fn sub(self, rhs: TimePoint) -> Self::Output {
        TimeDuration(self.0.saturating_sub(rhs.0))
    }
}
