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

use crate::predictor::PredictionError;
use crate::sun::HazardError;
use crate::timing::MjdEpoch;
use snafu::prelude::*;

/// Everything that can go wrong while validating a tracking or computing one
/// of its predictions.
///
/// Validation failures (`PredictorNotReady`, `InvalidWindow`,
/// `ElevationMasked`, `SunBlocked`) are terminal: the engine is marked invalid
/// and every later prediction fails fast with `NotValidated`. `OutOfRange`,
/// `HazardUnavailable` and `Prediction` are local to one timestamp and leave
/// the engine untouched.
#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TrackingError {
    #[snafu(display("the predictor has no valid data to predict"))]
    PredictorNotReady,

    #[snafu(display("invalid tracking window: {start} to {end}"))]
    InvalidWindow { start: MjdEpoch, end: MjdEpoch },

    #[snafu(display("no sample in the window reaches the {mask_deg} deg elevation mask"))]
    ElevationMasked { mask_deg: f64 },

    #[snafu(display("the sun security sector covers the whole tracking window"))]
    SunBlocked,

    #[snafu(display("the tracking is not validated, predictions are refused"))]
    NotValidated,

    #[snafu(display("{epoch} is outside the tracking window [{start}, {end}]"))]
    OutOfRange {
        epoch: MjdEpoch,
        start: MjdEpoch,
        end: MjdEpoch,
    },

    #[snafu(display("sun position unavailable at {epoch}: {source}"))]
    HazardUnavailable {
        epoch: MjdEpoch,
        source: HazardError,
    },

    #[snafu(display("prediction failed: {source}"))]
    Prediction { source: PredictionError },

    #[snafu(display("invalid tracking configuration: {msg}"))]
    InvalidTrackingConfig { msg: String },
}
