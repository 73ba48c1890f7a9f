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

use crate::ephemeris::{Ephemeris, EphemerisRecord};
use crate::linalg::Vector3;
use crate::station::{SkyPosition, StationLocation};
use crate::timing::MjdEpoch;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;

mod lagrange;
use lagrange::{lagrange_eval, linear_eval};

/// Width of the sample window used by the interpolated-vector mode.
pub(crate) const INTERPOLATION_SAMPLES: usize = 10;

/// Interpolation strategy of a [`PositionPredictor`], selected once before the
/// first prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// First-order interpolation between the two records bracketing the
    /// requested instant.
    Instant,
    /// Lagrange interpolation over the full sample window, the accuracy
    /// recommended for ranging-grade pointing.
    #[default]
    InterpolatedVector,
}

impl PredictionMode {
    /// Minimum number of ephemeris samples this mode needs.
    fn required_samples(&self) -> usize {
        match self {
            Self::Instant => 2,
            Self::InterpolatedVector => INTERPOLATION_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum PredictionError {
    #[snafu(display("no ephemeris coverage at {epoch}"))]
    NoCoverage { epoch: MjdEpoch },
    #[snafu(display("{got} ephemeris samples available, {need} required by the mode"))]
    NotEnoughSamples { got: usize, need: usize },
    #[snafu(display("invalid interpolation data: {msg}"))]
    InvalidInterpolationData { msg: String },
    #[snafu(display("the predicted position coincides with the station at {epoch}"))]
    DegeneratePosition { epoch: MjdEpoch },
}

/// One interpolated object state: the pointing angles actually used by the
/// mount, plus the interpolated Cartesian state they were derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopocentricPrediction {
    pub epoch: MjdEpoch,
    /// Station-relative pointing angles
    pub sky: SkyPosition,
    /// in meters
    pub range_m: f64,
    /// in meters per second, when the ephemeris carries velocities
    pub range_rate_m_s: Option<f64>,
    /// Interpolated ECEF position, in meters
    pub position_m: Vector3<f64>,
}

/// Interpolates an ephemeris store into station-relative pointing angles.
///
/// A predictor owns its ephemeris and station: both are bound at construction
/// and read-only afterwards, so a configured predictor may be shared across
/// threads for concurrent predictions. Interpolation always runs on the
/// Cartesian components and the angles are derived last, which keeps the
/// azimuth continuous across the 0/360 degree wrap without branch selection.
#[derive(Debug, Clone)]
pub struct PositionPredictor {
    ephemeris: Ephemeris,
    station: StationLocation,
    mode: PredictionMode,
}

impl PositionPredictor {
    /// Binds an ephemeris and a station. No interpolation happens here; the
    /// mode defaults to [`PredictionMode::InterpolatedVector`].
    pub fn new(ephemeris: Ephemeris, station: StationLocation) -> Self {
        Self {
            ephemeris,
            station,
            mode: PredictionMode::default(),
        }
    }

    /// Selects the interpolation strategy. This needs exclusive access, so a
    /// predictor already moved into a tracking engine can no longer be
    /// switched mid-pass.
    pub fn set_prediction_mode(&mut self, mode: PredictionMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> PredictionMode {
        self.mode
    }

    pub fn station(&self) -> &StationLocation {
        &self.station
    }

    pub fn ephemeris(&self) -> &Ephemeris {
        &self.ephemeris
    }

    /// True iff the bound ephemeris has enough samples, over a strictly
    /// positive span, to support the selected mode.
    pub fn is_ready(&self) -> bool {
        if self.ephemeris.len() < self.mode.required_samples() {
            return false;
        }
        let (start, end) = self.ephemeris.span();
        start < end
    }

    /// Interpolates the object state at `epoch` and derives the pointing
    /// angles seen from the bound station.
    pub fn predict(&self, epoch: MjdEpoch) -> Result<TopocentricPrediction, PredictionError> {
        let need = self.mode.required_samples();
        ensure!(
            self.ephemeris.len() >= need,
            NotEnoughSamplesSnafu {
                got: self.ephemeris.len(),
                need,
            }
        );
        ensure!(self.ephemeris.covers(epoch), NoCoverageSnafu { epoch });

        let with_velocity = self.ephemeris.has_velocities();
        let (position_m, velocity_m_s) = match self.mode {
            PredictionMode::Instant => self.interpolate_linear(epoch, with_velocity)?,
            PredictionMode::InterpolatedVector => self.interpolate_lagrange(epoch, with_velocity)?,
        };

        let topo = self
            .station
            .topocentric(position_m, velocity_m_s)
            .context(DegeneratePositionSnafu { epoch })?;

        Ok(TopocentricPrediction {
            epoch,
            sky: topo.sky,
            range_m: topo.range_m,
            range_rate_m_s: topo.range_rate_m_s,
            position_m,
        })
    }

    fn interpolate_linear(
        &self,
        epoch: MjdEpoch,
        with_velocity: bool,
    ) -> Result<(Vector3<f64>, Option<Vector3<f64>>), PredictionError> {
        match self.ephemeris.bracket(epoch) {
            Ok(idx) => {
                let rec = self.ephemeris.records()[idx];
                Ok((rec.position_m, rec.velocity_m_s.filter(|_| with_velocity)))
            }
            Err(idx) => {
                // Coverage was checked, so idx is strictly interior.
                let lo = self.ephemeris.records()[idx - 1];
                let hi = self.ephemeris.records()[idx];
                let x0 = 0.0;
                let x1 = (hi.epoch - lo.epoch).to_seconds();
                let x = (epoch - lo.epoch).to_seconds();
                let mut position_m = Vector3::zeros();
                for axis in 0..3 {
                    position_m[axis] =
                        linear_eval(x0, lo.position_m[axis], x1, hi.position_m[axis], x)?;
                }
                let velocity_m_s = if with_velocity {
                    let (vlo, vhi) = (lo.velocity_m_s.unwrap(), hi.velocity_m_s.unwrap());
                    let mut v = Vector3::zeros();
                    for axis in 0..3 {
                        v[axis] = linear_eval(x0, vlo[axis], x1, vhi[axis], x)?;
                    }
                    Some(v)
                } else {
                    None
                };
                Ok((position_m, velocity_m_s))
            }
        }
    }

    fn interpolate_lagrange(
        &self,
        epoch: MjdEpoch,
        with_velocity: bool,
    ) -> Result<(Vector3<f64>, Option<Vector3<f64>>), PredictionError> {
        let window = self.ephemeris.window(epoch, INTERPOLATION_SAMPLES);
        let origin = window[0].epoch;
        let xs: Vec<f64> = window
            .iter()
            .map(|rec| (rec.epoch - origin).to_seconds())
            .collect();
        let x = (epoch - origin).to_seconds();

        let component = |extract: &dyn Fn(&EphemerisRecord) -> f64| -> Result<f64, PredictionError> {
            let ys: Vec<f64> = window.iter().map(extract).collect();
            lagrange_eval(&xs, &ys, x)
        };

        let position_m = Vector3::new(
            component(&|rec| rec.position_m.x)?,
            component(&|rec| rec.position_m.y)?,
            component(&|rec| rec.position_m.z)?,
        );
        let velocity_m_s = if with_velocity {
            Some(Vector3::new(
                component(&|rec| rec.velocity_m_s.unwrap().x)?,
                component(&|rec| rec.velocity_m_s.unwrap().y)?,
                component(&|rec| rec.velocity_m_s.unwrap().z)?,
            ))
        } else {
            None
        };
        Ok((position_m, velocity_m_s))
    }
}

#[cfg(test)]
mod ut_predictor {
    use super::*;
    use crate::ephemeris::EphemerisRecord;
    use crate::station::{GeocentricPoint, GeodeticPoint};
    use approx::assert_abs_diff_eq;

    fn station() -> StationLocation {
        StationLocation::new(
            "SFEL".to_string(),
            GeodeticPoint {
                latitude_deg: 36.46525556,
                longitude_deg: -6.20530560,
                height_m: 98.177,
            },
            GeocentricPoint::new(5_105_473.885, -555_110.526, 3_769_892.958),
        )
    }

    /// A synthetic pass sweeping azimuth at constant elevation and range.
    fn sweep_ephemeris(n: usize, step_s: f64, with_velocity: bool) -> Ephemeris {
        let station = station();
        let records = (0..n)
            .map(|i| {
                let t = i as f64 * step_s;
                let epoch = MjdEpoch::new(60340, 56_000.0 + t);
                let sky = SkyPosition::new(120.0 + 0.05 * t, 35.0);
                let position_m = station.direction_to_ecef(sky, 1.2e6);
                let velocity_m_s = with_velocity.then(Vector3::zeros);
                EphemerisRecord {
                    epoch,
                    position_m,
                    velocity_m_s,
                }
            })
            .collect();
        Ephemeris::from_records(records).unwrap()
    }

    #[test]
    fn readiness_depends_on_mode() {
        let mut predictor = PositionPredictor::new(sweep_ephemeris(4, 30.0, false), station());
        assert_eq!(predictor.mode(), PredictionMode::InterpolatedVector);
        assert!(!predictor.is_ready());
        predictor.set_prediction_mode(PredictionMode::Instant);
        assert!(predictor.is_ready());

        let rich = PositionPredictor::new(sweep_ephemeris(20, 30.0, false), station());
        assert!(rich.is_ready());
    }

    #[test]
    fn rejects_epochs_outside_coverage() {
        let predictor = PositionPredictor::new(sweep_ephemeris(20, 30.0, false), station());
        let before = MjdEpoch::new(60340, 55_000.0);
        match predictor.predict(before) {
            Err(PredictionError::NoCoverage { epoch }) => assert_eq!(epoch, before),
            other => panic!("expected NoCoverage, got {other:?}"),
        }
    }

    #[test]
    fn interpolation_matches_the_synthetic_path() {
        let predictor = PositionPredictor::new(sweep_ephemeris(30, 30.0, false), station());
        // Halfway between two samples, the sweep azimuth is exact to well below
        // the mount pointing accuracy.
        let epoch = MjdEpoch::new(60340, 56_315.0);
        let prediction = predictor.predict(epoch).unwrap();
        assert_abs_diff_eq!(prediction.sky.azimuth_deg, 120.0 + 0.05 * 315.0, epsilon = 1e-4);
        assert_abs_diff_eq!(prediction.sky.elevation_deg, 35.0, epsilon = 1e-4);
        assert_abs_diff_eq!(prediction.range_m, 1.2e6, epsilon = 10.0);
        assert!(prediction.range_rate_m_s.is_none());
    }

    #[test]
    fn continuity_between_adjacent_epochs() {
        let predictor = PositionPredictor::new(sweep_ephemeris(30, 30.0, false), station());
        let mut prev: Option<TopocentricPrediction> = None;
        for i in 0..200 {
            let epoch = MjdEpoch::new(60340, 56_100.0 + i as f64 * 0.5);
            let prediction = predictor.predict(epoch).unwrap();
            if let Some(prev) = prev {
                let daz = (prediction.sky.azimuth_deg - prev.sky.azimuth_deg).abs();
                // 0.05 deg/s sweep: half a second should move ~0.025 deg.
                assert!(daz < 0.05, "azimuth jumped by {daz} deg at {epoch}");
            }
            prev = Some(prediction);
        }
    }

    #[test]
    fn instant_mode_agrees_with_lagrange_on_slow_arcs() {
        let eph = sweep_ephemeris(30, 30.0, false);
        let lagrange = PositionPredictor::new(eph.clone(), station());
        let mut instant = PositionPredictor::new(eph, station());
        instant.set_prediction_mode(PredictionMode::Instant);
        let epoch = MjdEpoch::new(60340, 56_207.0);
        let a = lagrange.predict(epoch).unwrap();
        let b = instant.predict(epoch).unwrap();
        assert_abs_diff_eq!(a.sky.azimuth_deg, b.sky.azimuth_deg, epsilon = 5e-3);
        assert_abs_diff_eq!(a.sky.elevation_deg, b.sky.elevation_deg, epsilon = 5e-3);
    }

    #[test]
    fn exact_sample_hit_returns_the_record() {
        let eph = sweep_ephemeris(20, 30.0, true);
        let rec = eph.records()[7];
        let mut predictor = PositionPredictor::new(eph, station());
        predictor.set_prediction_mode(PredictionMode::Instant);
        let prediction = predictor.predict(rec.epoch).unwrap();
        assert_abs_diff_eq!(
            (prediction.position_m - rec.position_m).norm(),
            0.0,
            epsilon = 1e-9
        );
        assert!(prediction.range_rate_m_s.is_some());
    }
}
