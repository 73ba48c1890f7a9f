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

use crate::tracking::TrackingPrediction;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write tracking output: {0}")]
    WriteError(#[from] io::Error),

    #[error("Failed to serialize tracking output: {0}")]
    CsvError(#[from] csv::Error),
}

/// Writes the full tracking schedule: one row per timestamp with the
/// classification, the commanded angles, the true object angles and the sun
/// position.
pub fn write_predictions<P: AsRef<Path>>(
    path: P,
    predictions: &[TrackingPrediction],
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    wtr.write_record([
        "mjd",
        "sod",
        "status",
        "track_az_deg",
        "track_el_deg",
        "object_az_deg",
        "object_el_deg",
        "sun_az_deg",
        "sun_el_deg",
    ])?;
    for p in predictions {
        wtr.write_record(&[
            p.epoch.day().to_string(),
            format!("{:.3}", p.epoch.seconds_of_day()),
            p.status.to_string(),
            format!("{:.6}", p.tracking_position.azimuth_deg),
            format!("{:.6}", p.tracking_position.elevation_deg),
            format!("{:.6}", p.prediction.sky.azimuth_deg),
            format!("{:.6}", p.prediction.sky.elevation_deg),
            format!("{:.6}", p.sun_position.azimuth_deg),
            format!("{:.6}", p.sun_position.elevation_deg),
        ])?;
    }
    wtr.flush()?;
    info!("Saved {} tracking rows to {:?}", predictions.len(), path.as_ref());
    Ok(())
}

/// Two-column azimuth/elevation listing of the commanded pointing, the format
/// plotting tools expect.
pub fn write_pointing<P: AsRef<Path>>(
    path: P,
    predictions: &[TrackingPrediction],
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for p in predictions {
        wtr.write_record(&[
            format!("{:.6}", p.tracking_position.azimuth_deg),
            format!("{:.6}", p.tracking_position.elevation_deg),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Two-column azimuth/elevation listing of the sun path alongside the pass.
pub fn write_sun<P: AsRef<Path>>(
    path: P,
    predictions: &[TrackingPrediction],
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for p in predictions {
        wtr.write_record(&[
            format!("{:.6}", p.sun_position.azimuth_deg),
            format!("{:.6}", p.sun_position.elevation_deg),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
