/*
    slr-tracking, sun-safe pass planning for satellite laser ranging
    Copyright (C) 2024-onwards slr-tracking contributors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::time::{Duration, Epoch, Unit};
use serde_derive::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// Number of seconds in a day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// A timestamp in the convention used by ILRS prediction products: an integer
/// modified Julian day plus seconds of day.
///
/// The seconds of day are always normalized into `[0, 86400)`; any overflow or
/// underflow is carried into the day count on construction, so two `MjdEpoch`s
/// compare lexicographically on `(day, seconds)`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MjdEpoch {
    day: i32,
    seconds: f64,
}

impl MjdEpoch {
    /// Builds a timestamp from a modified Julian day and seconds of day,
    /// normalizing the seconds into `[0, 86400)`.
    pub fn new(day: i32, seconds: f64) -> Self {
        let carry = seconds.div_euclid(SECONDS_PER_DAY);
        Self {
            day: day + carry as i32,
            seconds: seconds.rem_euclid(SECONDS_PER_DAY),
        }
    }

    /// The modified Julian day count.
    pub fn day(&self) -> i32 {
        self.day
    }

    /// Seconds elapsed since midnight of `day`, in `[0, 86400)`.
    pub fn seconds_of_day(&self) -> f64 {
        self.seconds
    }

    /// This timestamp as fractional modified Julian days.
    pub fn to_mjd_days(&self) -> f64 {
        self.day as f64 + self.seconds / SECONDS_PER_DAY
    }

    /// Converts into a hifitime UTC epoch.
    pub fn to_epoch(&self) -> Epoch {
        Epoch::from_mjd_utc(self.to_mjd_days())
    }

    /// Builds a timestamp from a hifitime UTC epoch.
    pub fn from_epoch(epoch: Epoch) -> Self {
        let days = epoch.to_mjd_utc_days();
        let day = days.floor();
        Self::new(day as i32, (days - day) * SECONDS_PER_DAY)
    }
}

impl Eq for MjdEpoch {}

impl PartialOrd for MjdEpoch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MjdEpoch {
    fn cmp(&self, other: &Self) -> Ordering {
        // Seconds are finite and normalized by construction.
        self.day
            .cmp(&other.day)
            .then(self.seconds.total_cmp(&other.seconds))
    }
}

impl Add<Duration> for MjdEpoch {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self::new(self.day, self.seconds + rhs.to_seconds())
    }
}

impl Sub<MjdEpoch> for MjdEpoch {
    type Output = Duration;

    /// Signed duration from `rhs` to `self`.
    fn sub(self, rhs: MjdEpoch) -> Duration {
        let seconds =
            (self.day - rhs.day) as f64 * SECONDS_PER_DAY + (self.seconds - rhs.seconds);
        seconds * Unit::Second
    }
}

impl fmt::Display for MjdEpoch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MJD {} +{:.3} s", self.day, self.seconds)
    }
}

/// An inclusive iterator of timestamps from `start` to `end` at a fixed step.
///
/// The pointing drivers and the hazard scan grid both walk windows with it.
pub struct MjdSeries {
    cursor: MjdEpoch,
    end: MjdEpoch,
    step: Duration,
}

impl MjdSeries {
    /// Every timestamp from `start` to `end` (both included) stepping by `step`.
    pub fn inclusive(start: MjdEpoch, end: MjdEpoch, step: Duration) -> Self {
        assert!(step.to_seconds() > 0.0, "step must be strictly positive");
        Self {
            cursor: start,
            end,
            step,
        }
    }
}

impl Iterator for MjdSeries {
    type Item = MjdEpoch;

    fn next(&mut self) -> Option<MjdEpoch> {
        if self.cursor > self.end {
            None
        } else {
            let item = self.cursor;
            self.cursor = item + self.step;
            Some(item)
        }
    }
}

#[cfg(test)]
mod ut_timing {
    use super::*;
    use crate::time::TimeUnits;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalization_carries_overflow() {
        let t = MjdEpoch::new(60340, 86_400.0);
        assert_eq!(t.day(), 60341);
        assert_abs_diff_eq!(t.seconds_of_day(), 0.0);

        let t = MjdEpoch::new(60340, 90_000.5);
        assert_eq!(t.day(), 60341);
        assert_abs_diff_eq!(t.seconds_of_day(), 3600.5, epsilon = 1e-9);

        let t = MjdEpoch::new(60340, -0.5);
        assert_eq!(t.day(), 60339);
        assert_abs_diff_eq!(t.seconds_of_day(), 86_399.5, epsilon = 1e-9);

        let t = MjdEpoch::new(60340, -2.0 * SECONDS_PER_DAY);
        assert_eq!(t.day(), 60338);
        assert_abs_diff_eq!(t.seconds_of_day(), 0.0);
    }

    #[test]
    fn lexicographic_ordering() {
        let a = MjdEpoch::new(60340, 56_726.0);
        let b = MjdEpoch::new(60340, 57_756.0);
        let c = MjdEpoch::new(60341, 1.0);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.cmp(&a), Ordering::Equal);
        // A day rollover from normalization must order correctly too.
        assert!(MjdEpoch::new(60340, 86_500.0) > b);
    }

    #[test]
    fn arithmetic_round_trips() {
        let t = MjdEpoch::new(60340, 86_399.8);
        let later = t + 0.5.seconds();
        assert_eq!(later.day(), 60341);
        assert_abs_diff_eq!(later.seconds_of_day(), 0.3, epsilon = 1e-9);
        assert_abs_diff_eq!((later - t).to_seconds(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn epoch_round_trip() {
        let t = MjdEpoch::new(60340, 56_726.25);
        let back = MjdEpoch::from_epoch(t.to_epoch());
        assert_eq!(back.day(), t.day());
        // MJD days carry ~1 us of resolution through an f64 round trip.
        assert_abs_diff_eq!(back.seconds_of_day(), t.seconds_of_day(), epsilon = 1e-5);
    }

    #[test]
    fn series_is_inclusive() {
        let start = MjdEpoch::new(60340, 0.0);
        let end = MjdEpoch::new(60340, 2.0);
        let epochs: Vec<_> = MjdSeries::inclusive(start, end, 1.seconds()).collect();
        assert_eq!(epochs.len(), 3);
        assert_eq!(epochs[0], start);
        assert_eq!(epochs[2], end);
    }
}
