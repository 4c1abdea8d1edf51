//! Proximity estimation for the plane overlay.
//!
//! Pure spherical-earth helpers: the initial bearing between two points,
//! forward dead reckoning from a last known fix, and the offset of a
//! bearing relative to the device heading.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Knots per meter-per-second, as used by the overlay.
const KNOTS_PER_MPS: f64 = 1.944;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Initial great-circle bearing from point 1 to point 2, in `[0, 360)`.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Project a fix forward along its heading.
///
/// `speed_mps * elapsed_s` is the distance covered along the great circle
/// starting at (`lat`, `lon`) with initial bearing `heading_deg`.
pub fn estimate_position(
    lat: f64,
    lon: f64,
    heading_deg: f64,
    speed_mps: f64,
    elapsed_s: f64,
) -> LatLon {
    let delta = speed_mps * elapsed_s / EARTH_RADIUS_M;
    let theta = heading_deg.to_radians();
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    LatLon {
        lat: phi2.to_degrees(),
        lon: lambda2.to_degrees(),
    }
}

/// Offset of `bearing_deg` from `heading_deg`, folded into `[-180, 180]`.
pub fn relative_bearing(bearing_deg: f64, heading_deg: f64) -> f64 {
    let mut angle = bearing_deg - heading_deg;
    if angle > 180.0 {
        angle -= 360.0;
    }
    if angle < -180.0 {
        angle += 360.0;
    }
    angle
}

pub fn knots_to_mps(knots: f64) -> f64 {
    knots / KNOTS_PER_MPS
}

fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
