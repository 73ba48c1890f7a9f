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

/*! # slr-tracking

Sun-safe pass planning for satellite laser ranging ground stations: an
ephemeris-driven position predictor, a solar hazard model, and a tracking
engine that validates a requested time window, detects overlap with the sun
security sector, and splices avoidance trajectories into the nominal pass
without discontinuities.
*/

/// Modified-Julian timestamps and fixed-step series over them.
pub mod timing;

/// Ground station coordinates and topocentric transforms.
pub mod station;

/// The read-only time-tagged position store predictors interpolate.
pub mod ephemeris;

/// Interpolation of an ephemeris into station-relative pointing angles.
pub mod predictor;

/// The solar hazard model: where the sun is, as seen from the station.
pub mod sun;

/// The tracking engine: window validation, sun overlap analysis, avoidance.
pub mod tracking;

mod errors;
/// Fallible operations return an error rather than panicking.
pub use self::errors::TrackingError;

/// Configuration loading and schedule export.
pub mod io;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Commonly used types, for a single import.
pub mod prelude {
    pub use crate::ephemeris::{Ephemeris, EphemerisRecord};
    pub use crate::io::ConfigRepr;
    pub use crate::predictor::{PositionPredictor, PredictionMode, TopocentricPrediction};
    pub use crate::station::{
        angular_separation_deg, GeocentricPoint, GeodeticPoint, SkyPosition, StationLocation,
    };
    pub use crate::sun::{AnalyticSun, SunPositionProvider};
    pub use crate::timing::{MjdEpoch, MjdSeries};
    pub use crate::tracking::{
        TrackingConfig, TrackingPrediction, TrackingPredictions, TrackingScheduler, TrackingStatus,
    };
    pub use crate::TrackingError;
}
