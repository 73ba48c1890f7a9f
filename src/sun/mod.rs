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

use crate::station::{GeodeticPoint, SkyPosition};
use crate::timing::MjdEpoch;
use snafu::prelude::*;

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum HazardError {
    #[snafu(display("sun position unavailable at {epoch}"))]
    Unavailable { epoch: MjdEpoch },
}

/// Source of the Sun topocentric position, as seen from the tracking station.
///
/// The tracking engine treats a failure here as a hard failure of the affected
/// prediction: an unknown sun position is never assumed to be outside the
/// security sector.
pub trait SunPositionProvider: Send + Sync {
    fn sky_position(&self, epoch: MjdEpoch) -> Result<SkyPosition, HazardError>;
}

/// Low-accuracy analytic solar position (mean longitude series, good to a few
/// arcminutes), topocentric for a fixed site.
///
/// The sun security radius is measured in degrees, so this model's error is
/// negligible against it.
#[derive(Debug, Clone)]
pub struct AnalyticSun {
    site: GeodeticPoint,
}

impl AnalyticSun {
    pub fn new(site: GeodeticPoint) -> Self {
        Self { site }
    }
}

impl SunPositionProvider for AnalyticSun {
    fn sky_position(&self, epoch: MjdEpoch) -> Result<SkyPosition, HazardError> {
        // Julian centuries-free mean elements, reckoned from J2000.0.
        let jd = epoch.to_mjd_days() + 2_400_000.5;
        let n = jd - 2_451_545.0;

        let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
        let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();

        let ecliptic_longitude = (mean_longitude
            + 1.915 * mean_anomaly.sin()
            + 0.020 * (2.0 * mean_anomaly).sin())
        .rem_euclid(360.0)
        .to_radians();

        let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

        let right_ascension = (ecliptic_longitude.sin() * obliquity.cos())
            .atan2(ecliptic_longitude.cos());
        let declination = (ecliptic_longitude.sin() * obliquity.sin()).asin();

        let centuries = n / 36_525.0;
        let gmst_deg = (280.460_618_37 + 360.985_647_366_29 * n + 0.000_387_933 * centuries.powi(2)
            - centuries.powi(3) / 38_710_000.0)
            .rem_euclid(360.0);
        let hour_angle =
            (gmst_deg + self.site.longitude_deg - right_ascension.to_degrees()).to_radians();

        let lat = self.site.latitude_deg.to_radians();
        let sin_el = declination.sin() * lat.sin()
            + declination.cos() * lat.cos() * hour_angle.cos();
        let elevation_deg = sin_el.clamp(-1.0, 1.0).asin().to_degrees();
        let azimuth_deg = (-declination.cos() * hour_angle.sin())
            .atan2(declination.sin() * lat.cos() - declination.cos() * lat.sin() * hour_angle.cos())
            .to_degrees();

        Ok(SkyPosition::new(azimuth_deg, elevation_deg))
    }
}
