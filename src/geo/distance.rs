//! Distanzberechnung im projizierten (euklidisch) und geographischen Raum (Haversine).

use glam::DVec2;

use super::GeoPoint;

/// Mittlerer Erdradius (IUGG) in Metern.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Luftlinie zwischen zwei projizierten Koordinaten (Meter).
pub fn euclidean_distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Großkreisdistanz zwischen zwei geographischen Punkten (Meter).
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon * 0.5).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().min(1.0).asin()
}
