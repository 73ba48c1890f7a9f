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

use crate::errors::{
    ElevationMaskedSnafu, HazardUnavailableSnafu, InvalidWindowSnafu, NotValidatedSnafu,
    OutOfRangeSnafu, PredictionSnafu, PredictorNotReadySnafu, SunBlockedSnafu, TrackingError,
};
use crate::predictor::PositionPredictor;
use crate::station::angular_separation_deg;
use crate::sun::SunPositionProvider;
use crate::timing::{MjdEpoch, MjdSeries};
use snafu::prelude::*;
use std::sync::Arc;

mod config;
mod prediction;
mod sector;

pub use config::TrackingConfig;
pub use prediction::{TrackingPrediction, TrackingPredictions, TrackingStatus};
pub use sector::SunSector;

use sector::HazardAnalysis;

/// The authoritative window and hazard analysis of a validated tracking.
#[derive(Debug, Clone)]
struct ValidatedWindow {
    analysis: HazardAnalysis,
}

/// Terminal outcome of the validation state machine.
#[derive(Debug, Clone)]
enum SchedulerState {
    Valid(ValidatedWindow),
    Invalid(TrackingError),
}

/// The tracking engine: turns a position predictor into a validated,
/// sun-safe pointing schedule over a requested window.
///
/// The predictor is consumed by move so no other tracking can drive it, and
/// the whole engine is immutable after construction: the elevation clip and
/// the sun overlap analysis run once, eagerly, which makes `predict` a pure
/// read and the engine shareable across threads.
pub struct TrackingScheduler {
    predictor: PositionPredictor,
    sun: Arc<dyn SunPositionProvider>,
    cfg: TrackingConfig,
    requested_start: MjdEpoch,
    requested_end: MjdEpoch,
    state: SchedulerState,
}

impl TrackingScheduler {
    /// Validates a tracking over `[start, end]`.
    ///
    /// Construction always returns an engine; query [`Self::is_valid`] for
    /// the outcome. An invalid engine refuses every prediction.
    pub fn new(
        predictor: PositionPredictor,
        sun: Arc<dyn SunPositionProvider>,
        start: MjdEpoch,
        end: MjdEpoch,
        cfg: TrackingConfig,
    ) -> Self {
        let state = match Self::validate(&predictor, sun.as_ref(), start, end, &cfg) {
            Ok(window) => {
                info!(
                    "tracking validated from {} to {} (sun overlap: {})",
                    window.analysis.start,
                    window.analysis.end,
                    window.analysis.is_overlapping()
                );
                SchedulerState::Valid(window)
            }
            Err(err) => {
                warn!("tracking validation failed: {err}");
                SchedulerState::Invalid(err)
            }
        };
        Self {
            predictor,
            sun,
            cfg,
            requested_start: start,
            requested_end: end,
            state,
        }
    }

    fn validate(
        predictor: &PositionPredictor,
        sun: &dyn SunPositionProvider,
        start: MjdEpoch,
        end: MjdEpoch,
        cfg: &TrackingConfig,
    ) -> Result<ValidatedWindow, TrackingError> {
        cfg.validate()?;
        ensure!(predictor.is_ready(), PredictorNotReadySnafu);
        ensure!(start < end, InvalidWindowSnafu { start, end });

        // Clip the window by the elevation mask before any sun analysis: both
        // reductions only ever shrink the window.
        let (clip_start, clip_end) = Self::clip_by_elevation(predictor, start, end, cfg)?;
        if clip_start != start || clip_end != end {
            info!(
                "window clipped by the {} deg elevation mask to [{clip_start}, {clip_end}]",
                cfg.min_elevation_deg
            );
        }

        let analysis = sector::analyze(predictor, sun, clip_start, clip_end, cfg)?;
        ensure!(analysis.start < analysis.end, SunBlockedSnafu);
        Ok(ValidatedWindow { analysis })
    }

    /// First and last instants of the scan grid with a predictable position at
    /// or above the elevation mask.
    fn clip_by_elevation(
        predictor: &PositionPredictor,
        start: MjdEpoch,
        end: MjdEpoch,
        cfg: &TrackingConfig,
    ) -> Result<(MjdEpoch, MjdEpoch), TrackingError> {
        let mut clip_start = None;
        let mut clip_end = None;
        for epoch in MjdSeries::inclusive(start, end, cfg.scan_step) {
            // A grid instant without coverage counts as masked.
            let above = predictor
                .predict(epoch)
                .map(|p| p.sky.elevation_deg >= cfg.min_elevation_deg)
                .unwrap_or(false);
            if above {
                clip_start.get_or_insert(epoch);
                clip_end = Some(epoch);
            }
        }
        match (clip_start, clip_end) {
            (Some(s), Some(e)) if s < e => Ok((s, e)),
            _ => ElevationMaskedSnafu {
                mask_deg: cfg.min_elevation_deg,
            }
            .fail(),
        }
    }

    /// Whether the validation state machine ended in its VALID state.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, SchedulerState::Valid(_))
    }

    /// The reason validation failed, for an invalid engine.
    pub fn validation_error(&self) -> Option<&TrackingError> {
        match &self.state {
            SchedulerState::Invalid(err) => Some(err),
            SchedulerState::Valid(_) => None,
        }
    }

    fn window(&self) -> Result<&ValidatedWindow, TrackingError> {
        match &self.state {
            SchedulerState::Valid(window) => Ok(window),
            SchedulerState::Invalid(_) => NotValidatedSnafu.fail(),
        }
    }

    /// True iff any sun security sector intersects the validated window.
    pub fn is_sun_overlapping(&self) -> bool {
        self.window()
            .map(|w| w.analysis.is_overlapping())
            .unwrap_or(false)
    }

    /// True iff a sun sector touched the start boundary; the tracking start
    /// was moved past it.
    pub fn is_sun_at_start(&self) -> bool {
        self.window().map(|w| w.analysis.at_start).unwrap_or(false)
    }

    /// True iff a sun sector touched the end boundary; the tracking end was
    /// moved before it.
    pub fn is_sun_at_end(&self) -> bool {
        self.window().map(|w| w.analysis.at_end).unwrap_or(false)
    }

    /// The authoritative start of the predictable window: elevation-clipped
    /// and moved past any start-touching sun sector.
    pub fn tracking_start(&self) -> Result<MjdEpoch, TrackingError> {
        self.window().map(|w| w.analysis.start)
    }

    /// The authoritative end of the predictable window.
    pub fn tracking_end(&self) -> Result<MjdEpoch, TrackingError> {
        self.window().map(|w| w.analysis.end)
    }

    /// The interior sun sectors driving the avoidance branch, in time order.
    pub fn sectors(&self) -> &[SunSector] {
        match &self.state {
            SchedulerState::Valid(window) => &window.analysis.sectors,
            SchedulerState::Invalid(_) => &[],
        }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.cfg
    }

    pub fn predictor(&self) -> &PositionPredictor {
        &self.predictor
    }

    /// The window as originally requested, before any clipping.
    pub fn requested_window(&self) -> (MjdEpoch, MjdEpoch) {
        (self.requested_start, self.requested_end)
    }

    /// Computes the classified pointing solution at `epoch`.
    ///
    /// Per-call failures (`OutOfRange`, `HazardUnavailable`, `Prediction`)
    /// leave the engine state untouched; the caller may skip the timestamp or
    /// retry another one.
    pub fn predict(&self, epoch: MjdEpoch) -> Result<TrackingPrediction, TrackingError> {
        let window = self.window()?;
        let (start, end) = (window.analysis.start, window.analysis.end);
        ensure!(
            epoch >= start && epoch <= end,
            OutOfRangeSnafu { epoch, start, end }
        );

        let prediction = self.predictor.predict(epoch).context(PredictionSnafu)?;
        let sun_position = self
            .sun
            .sky_position(epoch)
            .context(HazardUnavailableSnafu { epoch })?;
        let separation = angular_separation_deg(prediction.sky, sun_position);

        let (status, tracking_position) = if separation >= self.cfg.security_radius_deg {
            (TrackingStatus::OutsideSun, prediction.sky)
        } else if !self.cfg.sun_avoidance {
            (TrackingStatus::InsideSun, prediction.sky)
        } else {
            match window
                .analysis
                .sector_containing(epoch, self.cfg.scan_step.to_seconds())
            {
                Some(sector) => (
                    TrackingStatus::AvoidingSun,
                    sector.avoidance_position(epoch, sun_position, self.cfg.security_radius_deg),
                ),
                None => {
                    // A dip below the radius the scan grid never sampled;
                    // report it like the avoidance-disabled case.
                    warn!("unscanned sun proximity at {epoch} ({separation:.3} deg)");
                    (TrackingStatus::InsideSun, prediction.sky)
                }
            }
        };

        Ok(TrackingPrediction {
            epoch,
            status,
            tracking_position,
            prediction,
            sun_position,
        })
    }
}
