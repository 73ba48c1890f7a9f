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

use super::TrackingConfig;
use crate::errors::{
    HazardUnavailableSnafu, PredictionSnafu, SunBlockedSnafu, TrackingError,
};
use crate::linalg::Vector3;
use crate::predictor::PositionPredictor;
use crate::station::{angular_separation_deg, SkyPosition};
use crate::sun::SunPositionProvider;
use crate::timing::{MjdEpoch, MjdSeries};
use rayon::prelude::*;
use snafu::prelude::*;
use std::f64::consts::PI;

/// One contiguous interval where the object track crosses the sun security
/// sector, along with the geometry needed to route around it.
///
/// The entry and exit angles locate the crossing points on the security
/// circle, in the tangent basis at the sun centre; the avoidance path sweeps
/// linearly in time from one to the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunSector {
    pub entry: MjdEpoch,
    pub exit: MjdEpoch,
    /// radians on the security circle at entry
    entry_angle: f64,
    /// signed radians traversed from entry to exit
    sweep: f64,
}

impl SunSector {
    pub fn contains(&self, epoch: MjdEpoch) -> bool {
        epoch >= self.entry && epoch <= self.exit
    }

    /// The substitute pointing direction at `epoch`: a point on the security
    /// circle centred on the current sun position, so its separation from the
    /// sun equals the radius by construction.
    pub(crate) fn avoidance_position(
        &self,
        epoch: MjdEpoch,
        sun: SkyPosition,
        radius_deg: f64,
    ) -> SkyPosition {
        let total = (self.exit - self.entry).to_seconds();
        let fraction = if total > 0.0 {
            ((epoch - self.entry).to_seconds() / total).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let angle = self.entry_angle + fraction * self.sweep;
        circle_point(sun, angle, radius_deg)
    }
}

/// Tangent-plane basis at a sky position: unit vectors toward increasing
/// elevation and along the horizontal, both orthogonal to the direction.
fn tangent_basis(center: SkyPosition) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
    let s = center.unit_vector();
    let zenith = Vector3::new(0.0, 0.0, 1.0);
    // Undefined only if the centre sits exactly at the zenith.
    let e_el = (zenith - s * zenith.dot(&s)).normalize();
    let e_az = e_el.cross(&s);
    (s, e_az, e_el)
}

/// The angular position of `target` on the security circle around `center`.
fn circle_angle(center: SkyPosition, target: SkyPosition) -> f64 {
    let (s, e_az, e_el) = tangent_basis(center);
    let v = target.unit_vector();
    let tangential = v - s * v.dot(&s);
    tangential.dot(&e_el).atan2(tangential.dot(&e_az))
}

/// The sky position at `angle` on the circle of `radius_deg` around `center`.
fn circle_point(center: SkyPosition, angle: f64, radius_deg: f64) -> SkyPosition {
    let (s, e_az, e_el) = tangent_basis(center);
    let r = radius_deg.to_radians();
    let p = s * r.cos() + (e_az * angle.cos() + e_el * angle.sin()) * r.sin();
    SkyPosition::from_unit_vector(p)
}

fn wrap_to_pi(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Result of the one-shot sun overlap analysis over a validated window.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HazardAnalysis {
    /// Interior security sectors, in time order.
    pub sectors: Vec<SunSector>,
    /// The hazard touched the original window start.
    pub at_start: bool,
    /// The hazard touched the original window end.
    pub at_end: bool,
    /// Window start, moved past a start-touching hazard.
    pub start: MjdEpoch,
    /// Window end, moved before an end-touching hazard.
    pub end: MjdEpoch,
}

impl HazardAnalysis {
    pub fn is_overlapping(&self) -> bool {
        self.at_start || self.at_end || !self.sectors.is_empty()
    }

    /// The sector covering `epoch`, tolerating one scan step of slack at the
    /// refined boundaries.
    pub fn sector_containing(&self, epoch: MjdEpoch, slack: f64) -> Option<&SunSector> {
        self.sectors
            .iter()
            .find(|sector| sector.contains(epoch))
            .or_else(|| {
                self.sectors.iter().find(|sector| {
                    (epoch - sector.entry).to_seconds().abs() <= slack
                        || (epoch - sector.exit).to_seconds().abs() <= slack
                })
            })
    }
}

/// Scans `[start, end]` for sun overlap and refines every hazard boundary.
///
/// The scan grid is evaluated in parallel; the grouping into contiguous
/// sectors and the bisection refinements run sequentially afterwards.
pub(crate) fn analyze(
    predictor: &PositionPredictor,
    sun: &dyn SunPositionProvider,
    start: MjdEpoch,
    end: MjdEpoch,
    cfg: &TrackingConfig,
) -> Result<HazardAnalysis, TrackingError> {
    let radius = cfg.security_radius_deg;
    let separation_at = |epoch: MjdEpoch| -> Result<f64, TrackingError> {
        let object = predictor.predict(epoch).context(PredictionSnafu)?;
        let sun_sky = sun
            .sky_position(epoch)
            .context(HazardUnavailableSnafu { epoch })?;
        Ok(angular_separation_deg(object.sky, sun_sky))
    };
    let inside_at = |epoch: MjdEpoch| separation_at(epoch).map(|sep| sep < radius);

    let grid: Vec<MjdEpoch> = MjdSeries::inclusive(start, end, cfg.scan_step).collect();
    let flags: Vec<bool> = grid
        .par_iter()
        .map(|&epoch| inside_at(epoch))
        .collect::<Result<_, _>>()?;

    // Group contiguous inside-samples into index runs.
    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut open: Option<usize> = None;
    for (idx, &inside) in flags.iter().enumerate() {
        match (inside, open) {
            (true, None) => open = Some(idx),
            (false, Some(first)) => {
                runs.push((first, idx - 1));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(first) = open {
        runs.push((first, flags.len() - 1));
    }

    let last = flags.len() - 1;
    let mut analysis = HazardAnalysis {
        sectors: Vec::new(),
        at_start: false,
        at_end: false,
        start,
        end,
    };

    for &(first, last_inside) in &runs {
        ensure!(!(first == 0 && last_inside == last), SunBlockedSnafu);

        if first == 0 {
            // Hazard touches the window start: move the start to the first
            // instant safely outside.
            let crossing = refine_crossing(
                grid[last_inside],
                grid[last_inside + 1],
                cfg.refine_tolerance.to_seconds(),
                &inside_at,
            )?;
            debug!("sun sector at window start, tracking moved to {crossing}");
            analysis.at_start = true;
            analysis.start = crossing;
        } else if last_inside == last {
            // Hazard touches the window end: move the end before the entry.
            let crossing = refine_crossing(
                grid[first],
                grid[first - 1],
                cfg.refine_tolerance.to_seconds(),
                &inside_at,
            )?;
            debug!("sun sector at window end, tracking ends at {crossing}");
            analysis.at_end = true;
            analysis.end = crossing;
        } else {
            // Interior sector: keep the window, store the avoidance geometry.
            let entry = refine_crossing(
                grid[first],
                grid[first - 1],
                cfg.refine_tolerance.to_seconds(),
                &inside_at,
            )?;
            let exit = refine_crossing(
                grid[last_inside],
                grid[last_inside + 1],
                cfg.refine_tolerance.to_seconds(),
                &inside_at,
            )?;

            let sun_entry = sun
                .sky_position(entry)
                .context(HazardUnavailableSnafu { epoch: entry })?;
            let sun_exit = sun
                .sky_position(exit)
                .context(HazardUnavailableSnafu { epoch: exit })?;
            let object_entry = predictor.predict(entry).context(PredictionSnafu)?;
            let object_exit = predictor.predict(exit).context(PredictionSnafu)?;

            let entry_angle = circle_angle(sun_entry, object_entry.sky);
            let exit_angle = circle_angle(sun_exit, object_exit.sky);
            let mut sweep = wrap_to_pi(exit_angle - entry_angle);
            if sweep.abs() < 1e-3 {
                // The track aims straight through the centre: go around on the
                // elevation-increasing side.
                sweep = if entry_angle.cos() >= 0.0 { PI } else { -PI };
            }

            debug!(
                "interior sun sector from {entry} to {exit}, sweep {:.1} deg",
                sweep.to_degrees()
            );
            analysis.sectors.push(SunSector {
                entry,
                exit,
                entry_angle,
                sweep,
            });
        }
    }

    Ok(analysis)
}

/// Bisects a hazard boundary between an inside and an outside instant, down to
/// `tolerance_s`, and returns the crossing on the safe (outside) side.
fn refine_crossing<F>(
    inside: MjdEpoch,
    outside: MjdEpoch,
    tolerance_s: f64,
    inside_at: &F,
) -> Result<MjdEpoch, TrackingError>
where
    F: Fn(MjdEpoch) -> Result<bool, TrackingError>,
{
    let mut inside = inside;
    let mut outside = outside;
    // The bracket halves every pass; 64 iterations is far past any tolerance.
    for _ in 0..64 {
        if (outside - inside).to_seconds().abs() <= tolerance_s {
            break;
        }
        let mid = inside + (outside - inside) * 0.5;
        if inside_at(mid)? {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    Ok(outside)
}
