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

//! Plans a sun-grazing pass over SFEL and exports the resulting schedule.
//!
//! The pass is synthetic: an azimuth sweep built to cross the sun security
//! sector around local noon, so the avoidance branch of the engine is
//! exercised end to end. Run with `cargo run --example track_pass`.

extern crate pretty_env_logger;
extern crate slr_tracking;

use slr_tracking::io::export;
use slr_tracking::prelude::*;
use slr_tracking::time::TimeUnits;

use std::error::Error;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let station = StationLocation::load("data/tests/config/station.yaml")?;
    let cfg = TrackingConfig::load("data/tests/config/tracking.yaml")?;
    println!("station: {station}");

    // A twenty minute window around noon UTC on 2024-01-31.
    let start = MjdEpoch::new(60340, 42_600.0);
    let end = MjdEpoch::new(60340, 43_800.0);
    let mid = MjdEpoch::new(60340, 43_200.0);

    let sun = AnalyticSun::new(station.geodetic);
    let sun_mid = sun.sky_position(mid)?;
    println!(
        "sun at mid-window: az {:.2} deg, el {:.2} deg",
        sun_mid.azimuth_deg, sun_mid.elevation_deg
    );

    // An azimuth sweep through the sun's position, sampled every 30 s with
    // five minutes of margin on both sides of the window.
    let records: Vec<EphemerisRecord> = (0..=60)
        .map(|i| {
            let epoch = start + (i as f64 * 30.0 - 300.0).seconds();
            let dt = (epoch - mid).to_seconds();
            let sky = SkyPosition::new(
                sun_mid.azimuth_deg + 0.05 * dt,
                sun_mid.elevation_deg.max(20.0),
            );
            EphemerisRecord {
                epoch,
                position_m: station.direction_to_ecef(sky, 1.2e6),
                velocity_m_s: None,
            }
        })
        .collect();
    let predictor = PositionPredictor::new(Ephemeris::from_records(records)?, station);

    let tracking = TrackingScheduler::new(predictor, Arc::new(sun), start, end, cfg);
    if !tracking.is_valid() {
        return Err(format!("tracking invalid: {:?}", tracking.validation_error()).into());
    }

    let (req_start, req_end) = tracking.requested_window();
    println!("requested window: {req_start} to {req_end}");
    println!(
        "tracking window:  {} to {}",
        tracking.tracking_start()?,
        tracking.tracking_end()?
    );
    println!(
        "sun overlap: {} (at start: {}, at end: {}, interior sectors: {})",
        tracking.is_sun_overlapping(),
        tracking.is_sun_at_start(),
        tracking.is_sun_at_end(),
        tracking.sectors().len()
    );

    let schedule: TrackingPredictions =
        MjdSeries::inclusive(tracking.tracking_start()?, tracking.tracking_end()?, 0.5.seconds())
            .map(|epoch| tracking.predict(epoch))
            .collect::<Result<_, _>>()?;

    let avoiding = schedule
        .iter()
        .filter(|p| p.status == TrackingStatus::AvoidingSun)
        .count();
    println!(
        "{} timestamps, {} on the avoidance path",
        schedule.len(),
        avoiding
    );

    export::write_predictions("track_pass.csv", &schedule)?;
    export::write_pointing("track_pass_pointing.csv", &schedule)?;
    export::write_sun("track_pass_sun.csv", &schedule)?;
    println!("schedule saved to track_pass.csv");

    Ok(())
}
