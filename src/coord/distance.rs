//! Great-circle distance
//!
//! Haversine formula expressed on the Earth diameter rather than the radius.

use crate::constants::geo::EARTH_DIAMETER_KM;

/// Calculate the great-circle distance between two points, in kilometers
///
/// # Arguments
/// * `lat1`, `lon1` - First point, in degrees
/// * `lat2`, `lon2` - Second point, in degrees
///
/// # Algorithm
/// - a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)
/// - d = D · asin(√a), with D the Earth diameter
///
/// `a` can exceed 1 by a rounding epsilon for antipodal points, so it is
/// clamped to [0, 1] before taking the arc sine.
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let half_dphi = (phi2 - phi1) / 2.0;
    let half_dlambda = (lon2.to_radians() - lon1.to_radians()) / 2.0;

    let a = half_dphi.sin().powi(2) + phi1.cos() * phi2.cos() * half_dlambda.sin().powi(2);

    EARTH_DIAMETER_KM * a.clamp(0.0, 1.0).sqrt().asin()
}
