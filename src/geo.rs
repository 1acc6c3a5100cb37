//! Great-circle distance between two coordinates.
//!
//! The haversine result feeds a sort downstream, so the exact formula is
//! used rather than an equirectangular approximation.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two (lon, lat) pairs in degrees.
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lon1 = lon1.to_radians();
    let lat1 = lat1.to_radians();
    let lon2 = lon2.to_radians();
    let lat2 = lat2.to_radians();

    let dlon = lon2 - lon1;
    let dlat = lat2 - lat1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}
