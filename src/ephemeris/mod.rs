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

use crate::linalg::Vector3;
use crate::timing::MjdEpoch;
use snafu::prelude::*;

/// One time-tagged sample of an object position, in the Earth-fixed frame.
///
/// Velocities are optional: some prediction products only distribute
/// positions, in which case range rates are simply not available downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EphemerisRecord {
    pub epoch: MjdEpoch,
    /// ECEF position in meters
    pub position_m: Vector3<f64>,
    /// ECEF velocity in meters per second
    pub velocity_m_s: Option<Vector3<f64>>,
}

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum EphemerisError {
    #[snafu(display("an ephemeris needs at least one record"))]
    NoRecords,
}

/// An ordered, read-only sequence of time-tagged position samples covering one
/// validity interval for one object.
///
/// How the records were obtained (CPF files, propagation, ...) is the caller's
/// concern; the store only guarantees chronological order and unique epochs.
#[derive(Debug, Clone, PartialEq)]
pub struct Ephemeris {
    records: Vec<EphemerisRecord>,
}

impl Ephemeris {
    /// Builds a store from records in any order, sorting chronologically and
    /// dropping duplicate epochs.
    pub fn from_records(mut records: Vec<EphemerisRecord>) -> Result<Self, EphemerisError> {
        records.sort_by(|a, b| a.epoch.cmp(&b.epoch));
        records.dedup_by(|a, b| a.epoch.eq(&b.epoch));
        ensure!(!records.is_empty(), NoRecordsSnafu);
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EphemerisRecord] {
        &self.records
    }

    /// The validity interval covered by the records.
    pub fn span(&self) -> (MjdEpoch, MjdEpoch) {
        // from_records guarantees at least one record
        (
            self.records.first().unwrap().epoch,
            self.records.last().unwrap().epoch,
        )
    }

    /// Whether `epoch` falls inside the validity interval.
    pub fn covers(&self, epoch: MjdEpoch) -> bool {
        let (start, end) = self.span();
        epoch >= start && epoch <= end
    }

    /// True when every record carries a velocity.
    pub fn has_velocities(&self) -> bool {
        self.records.iter().all(|rec| rec.velocity_m_s.is_some())
    }

    /// Index of the first record at or after `epoch`, i.e. the insertion point
    /// of a binary search on the record epochs.
    pub(crate) fn bracket(&self, epoch: MjdEpoch) -> Result<usize, usize> {
        self.records.binary_search_by(|rec| rec.epoch.cmp(&epoch))
    }

    /// Up to `count` consecutive records surrounding `epoch`, clamped at the
    /// ends of the store.
    pub(crate) fn window(&self, epoch: MjdEpoch, count: usize) -> &[EphemerisRecord] {
        let center = match self.bracket(epoch) {
            Ok(idx) | Err(idx) => idx,
        };
        let half = count / 2;
        let mut first = center.saturating_sub(half);
        let last = self.records.len().min(first + count);
        if last == self.records.len() {
            first = last.saturating_sub(count);
        }
        &self.records[first..last]
    }
}
