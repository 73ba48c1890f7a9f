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

use crate::predictor::TopocentricPrediction;
use crate::station::SkyPosition;
use crate::timing::MjdEpoch;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Classification of one tracking prediction with respect to the sun security
/// sector.
///
/// This is not engine state: it is a pure function of the timestamp and the
/// hazard analysis performed at validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStatus {
    /// Nominal case: the pointing direction is outside the security sector.
    OutsideSun,
    /// The true position is inside the security sector and avoidance is
    /// disabled. The position is valid but pointing a mount at it may be
    /// unsafe.
    InsideSun,
    /// The commanded position follows the avoidance path around the security
    /// sector while the true object position is inside it.
    AvoidingSun,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::OutsideSun => write!(f, "outside_sun"),
            Self::InsideSun => write!(f, "inside_sun"),
            Self::AvoidingSun => write!(f, "avoiding_sun"),
        }
    }
}

/// One fully-populated output record of the tracking engine.
///
/// `tracking_position` is what the mount should be commanded to. Unless the
/// status is [`TrackingStatus::AvoidingSun`], it equals the true predicted
/// angles in `prediction`; during avoidance the two differ and both are
/// retained so callers can tell commanded from true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingPrediction {
    pub epoch: MjdEpoch,
    pub status: TrackingStatus,
    /// Angles to command, possibly an avoidance substitute
    pub tracking_position: SkyPosition,
    /// The true interpolated object state
    pub prediction: TopocentricPrediction,
    /// Sun position at this timestamp, for plots and safety review
    pub sun_position: SkyPosition,
}

/// The schedule built by a driver across a tracking window, in time order.
pub type TrackingPredictions = Vec<TrackingPrediction>;
