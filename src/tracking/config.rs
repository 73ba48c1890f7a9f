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

use crate::errors::TrackingError;
use crate::io::ConfigRepr;
use crate::time::{Duration, Unit};
use serde_derive::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

fn default_scan_step() -> Duration {
    Unit::Second * 1
}

fn default_refine_tolerance() -> Duration {
    Unit::Millisecond * 10
}

fn default_security_radius() -> f64 {
    15.0
}

fn default_sun_avoidance() -> bool {
    true
}

/// Configuration surface of the tracking engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct TrackingConfig {
    /// Minimum elevation mask, in degrees. The requested window is clipped to
    /// the sub-interval above it.
    #[builder(default)]
    #[serde(default)]
    pub min_elevation_deg: f64,
    /// Whether interior sun sectors are traversed on the avoidance circle
    /// (when disabled the true, possibly unsafe, position is returned and
    /// flagged instead).
    #[builder(default = true)]
    #[serde(default = "default_sun_avoidance")]
    pub sun_avoidance: bool,
    /// Minimum allowed angular separation between the pointing direction and
    /// the sun, in degrees.
    #[builder(default = 15.0)]
    #[serde(default = "default_security_radius")]
    pub security_radius_deg: f64,
    /// Grid step of the elevation and sun-overlap scans.
    #[builder(default = Unit::Second * 1)]
    #[serde(default = "default_scan_step")]
    pub scan_step: Duration,
    /// Bisection tolerance when refining a hazard boundary crossing.
    #[builder(default = Unit::Millisecond * 10)]
    #[serde(default = "default_refine_tolerance")]
    pub refine_tolerance: Duration,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: 0.0,
            sun_avoidance: true,
            security_radius_deg: default_security_radius(),
            scan_step: default_scan_step(),
            refine_tolerance: default_refine_tolerance(),
        }
    }
}

impl TrackingConfig {
    /// Checks the numerical sanity of the configuration.
    pub fn validate(&self) -> Result<(), TrackingError> {
        if !(0.0..90.0).contains(&self.min_elevation_deg) {
            return Err(TrackingError::InvalidTrackingConfig {
                msg: format!("elevation mask {} deg not in [0, 90)", self.min_elevation_deg),
            });
        }
        if self.security_radius_deg <= 0.0 || self.security_radius_deg >= 90.0 {
            return Err(TrackingError::InvalidTrackingConfig {
                msg: format!(
                    "sun security radius {} deg not in (0, 90)",
                    self.security_radius_deg
                ),
            });
        }
        if self.scan_step.to_seconds() <= 0.0 {
            return Err(TrackingError::InvalidTrackingConfig {
                msg: format!("scan step {} must be strictly positive", self.scan_step),
            });
        }
        if self.refine_tolerance.to_seconds() <= 0.0
            || self.refine_tolerance >= self.scan_step
        {
            return Err(TrackingError::InvalidTrackingConfig {
                msg: format!(
                    "refine tolerance {} must be in (0, scan step)",
                    self.refine_tolerance
                ),
            });
        }
        Ok(())
    }
}

impl ConfigRepr for TrackingConfig {}

#[cfg(test)]
mod ut_config {
    use super::*;
    use crate::time::TimeUnits;

    #[test]
    fn defaults_are_valid() {
        let cfg = TrackingConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg, TrackingConfig::builder().build());
        assert!(cfg.sun_avoidance);
        assert_eq!(cfg.security_radius_deg, 15.0);
    }

    #[test]
    fn builder_overrides() {
        let cfg = TrackingConfig::builder()
            .min_elevation_deg(8.0)
            .sun_avoidance(false)
            .scan_step(0.5.seconds())
            .build();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.min_elevation_deg, 8.0);
        assert!(!cfg.sun_avoidance);
    }

    #[test]
    fn rejects_nonsense() {
        let bad_mask = TrackingConfig {
            min_elevation_deg: 92.0,
            ..Default::default()
        };
        assert!(bad_mask.validate().is_err());

        let bad_radius = TrackingConfig {
            security_radius_deg: 0.0,
            ..Default::default()
        };
        assert!(bad_radius.validate().is_err());

        let bad_tol = TrackingConfig {
            scan_step: 1.seconds(),
            refine_tolerance: 2.seconds(),
            ..Default::default()
        };
        assert!(bad_tol.validate().is_err());
    }

    #[test]
    fn yaml_round_trip_with_partial_keys() {
        let yaml = "min_elevation_deg: 8.0\nsecurity_radius_deg: 12.5\n";
        let cfg: TrackingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.min_elevation_deg, 8.0);
        assert_eq!(cfg.security_radius_deg, 12.5);
        // Unlisted keys take their documented defaults.
        assert!(cfg.sun_avoidance);
        assert_eq!(cfg.scan_step, Unit::Second * 1);
    }
}
