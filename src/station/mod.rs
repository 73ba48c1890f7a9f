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

use crate::io::ConfigRepr;
use crate::linalg::{Matrix3, Vector3};
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Targets closer than this to the station are considered degenerate.
const MIN_TOPOCENTRIC_RANGE_M: f64 = 1e-3;

/// Geodetic coordinates of a point on the Earth surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeodeticPoint {
    /// in degrees, positive north
    pub latitude_deg: f64,
    /// in degrees, positive east
    pub longitude_deg: f64,
    /// in meters above the reference ellipsoid
    pub height_m: f64,
}

/// Geocentric Cartesian coordinates (ECEF), in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeocentricPoint {
    pub x_m: f64,
    pub y_m: f64,
    pub z_m: f64,
}

impl GeocentricPoint {
    pub fn new(x_m: f64, y_m: f64, z_m: f64) -> Self {
        Self { x_m, y_m, z_m }
    }

    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.x_m, self.y_m, self.z_m)
    }
}

/// A pointing direction in the station local sky, in degrees.
///
/// Azimuth is measured clockwise from north in `[0, 360)`, elevation from the
/// local horizon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SkyPosition {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl SkyPosition {
    pub fn new(azimuth_deg: f64, elevation_deg: f64) -> Self {
        Self {
            azimuth_deg: azimuth_deg.rem_euclid(360.0),
            elevation_deg,
        }
    }

    /// Unit vector in the local (east, north, up) frame.
    pub(crate) fn unit_vector(&self) -> Vector3<f64> {
        let az = self.azimuth_deg.to_radians();
        let el = self.elevation_deg.to_radians();
        Vector3::new(el.cos() * az.sin(), el.cos() * az.cos(), el.sin())
    }

    /// Builds the sky position pointed at by a local (east, north, up) vector.
    pub(crate) fn from_unit_vector(enu: Vector3<f64>) -> Self {
        let horizontal = (enu.x * enu.x + enu.y * enu.y).sqrt();
        Self::new(
            enu.x.atan2(enu.y).to_degrees(),
            enu.z.atan2(horizontal).to_degrees(),
        )
    }
}

impl fmt::Display for SkyPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "az {:.4} deg  el {:.4} deg",
            self.azimuth_deg, self.elevation_deg
        )
    }
}

/// Great-circle angular separation between two sky positions, in degrees.
pub fn angular_separation_deg(a: SkyPosition, b: SkyPosition) -> f64 {
    let (el_a, el_b) = (a.elevation_deg.to_radians(), b.elevation_deg.to_radians());
    let delta_az = (a.azimuth_deg - b.azimuth_deg).to_radians();
    let cos_sep = el_a.sin() * el_b.sin() + el_a.cos() * el_b.cos() * delta_az.cos();
    cos_sep.clamp(-1.0, 1.0).acos().to_degrees()
}

/// The state of an object as seen from a station: pointing angles plus range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopocentricState {
    pub sky: SkyPosition,
    /// in meters
    pub range_m: f64,
    /// in meters per second, only when the source carried velocities
    pub range_rate_m_s: Option<f64>,
}

/// A ground station position, both geodetic and geocentric, immutable once
/// constructed.
///
/// The geocentric point anchors the topocentric transform; the geodetic point
/// orients the local (east, north, up) frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationLocation {
    pub name: String,
    pub geodetic: GeodeticPoint,
    pub geocentric: GeocentricPoint,
}

impl StationLocation {
    pub fn new(name: String, geodetic: GeodeticPoint, geocentric: GeocentricPoint) -> Self {
        Self {
            name,
            geodetic,
            geocentric,
        }
    }

    /// Rotation from ECEF into the local (east, north, up) frame at this station.
    fn enu_rotation(&self) -> Matrix3<f64> {
        let lat = self.geodetic.latitude_deg.to_radians();
        let lon = self.geodetic.longitude_deg.to_radians();
        Matrix3::new(
            -lon.sin(),
            lon.cos(),
            0.0,
            -lat.sin() * lon.cos(),
            -lat.sin() * lon.sin(),
            lat.cos(),
            lat.cos() * lon.cos(),
            lat.cos() * lon.sin(),
            lat.sin(),
        )
    }

    /// Computes the azimuth, elevation and range of an ECEF position as seen
    /// from this station, along with the range rate when a velocity is given.
    ///
    /// Returns `None` if the target coincides with the station.
    pub fn topocentric(
        &self,
        position_m: Vector3<f64>,
        velocity_m_s: Option<Vector3<f64>>,
    ) -> Option<TopocentricState> {
        let rel = position_m - self.geocentric.vector();
        let range_m = rel.norm();
        if range_m < MIN_TOPOCENTRIC_RANGE_M {
            return None;
        }
        let enu = self.enu_rotation() * rel;
        let range_rate_m_s = velocity_m_s.map(|v| rel.dot(&v) / range_m);
        Some(TopocentricState {
            sky: SkyPosition::from_unit_vector(enu / range_m),
            range_m,
            range_rate_m_s,
        })
    }

    /// Inverse of [`Self::topocentric`]: the ECEF position at a given sky
    /// direction and range from this station.
    pub fn direction_to_ecef(&self, sky: SkyPosition, range_m: f64) -> Vector3<f64> {
        let enu = sky.unit_vector() * range_m;
        self.geocentric.vector() + self.enu_rotation().transpose() * enu
    }
}

impl ConfigRepr for StationLocation {}

impl fmt::Display for StationLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (lat.: {:.4} deg    long.: {:.4} deg    alt.: {:.3} m)",
            self.name,
            self.geodetic.latitude_deg,
            self.geodetic.longitude_deg,
            self.geodetic.height_m
        )
    }
}
