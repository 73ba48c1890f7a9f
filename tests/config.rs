extern crate slr_tracking;

use slr_tracking::prelude::*;
use slr_tracking::time::Unit;

use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "data", "tests", "config", name]
        .iter()
        .collect()
}

#[test]
fn load_tracking_config() {
    let cfg = TrackingConfig::load(fixture("tracking.yaml")).unwrap();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.min_elevation_deg, 8.0);
    assert!(cfg.sun_avoidance);
    assert_eq!(cfg.security_radius_deg, 15.0);
    // Keys absent from the file take their documented defaults.
    assert_eq!(cfg.scan_step, Unit::Second * 1);
    assert_eq!(cfg.refine_tolerance, Unit::Millisecond * 10);
}

#[test]
fn load_station() {
    let station = StationLocation::load(fixture("station.yaml")).unwrap();
    assert_eq!(station.name, "SFEL");
    assert_eq!(station.geodetic.latitude_deg, 36.46525556);
    assert_eq!(station.geocentric.z_m, 3_769_892.958);
}

#[test]
fn missing_file_is_a_read_error() {
    use slr_tracking::io::ConfigError;
    match TrackingConfig::load(fixture("no_such_file.yaml")) {
        Err(ConfigError::ReadError(_)) => {}
        other => panic!("expected ReadError, got {other:?}"),
    }
}
