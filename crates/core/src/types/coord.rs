//! Geographic coordinates and great-circle distance.
//!
//! Distances are computed with the haversine formula. Coordinates are
//! WGS-84 degrees; the only validation anywhere is the finite-value guard,
//! matching how the rest of the system treats positions.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite numbers.
    ///
    /// Geolocation callbacks and backend rows can carry NaN or missing
    /// values; callers short-circuit to "distance unavailable" when this
    /// returns false.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Great-circle distance to `other` in kilometers (haversine formula).
    ///
    /// Symmetric, zero for identical points, monotonic with angular
    /// separation.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(-29.7156, -52.4297),
            Coordinate::new(89.9, 179.9),
        ];
        for p in points {
            assert!((p.distance_km(&p)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(-29.7156, -52.4297);
        let b = Coordinate::new(-23.5505, -46.6333);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance() {
        // Santa Cruz do Sul -> São Paulo is roughly 890 km
        let santa_cruz = Coordinate::new(-29.7156, -52.4297);
        let sao_paulo = Coordinate::new(-23.5505, -46.6333);
        let km = santa_cruz.distance_km(&sao_paulo);
        assert!((km - 890.0).abs() < 20.0, "got {km} km");
    }

    #[test]
    fn test_colinear_monotonicity() {
        // Three points along the equator: A, B, C in order.
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);
        let c = Coordinate::new(0.0, 2.5);

        let tolerance = 1e-6;
        assert!(a.distance_km(&c) >= a.distance_km(&b) - tolerance);
        assert!(a.distance_km(&c) >= b.distance_km(&c) - tolerance);
    }

    #[test]
    fn test_nan_coordinate_is_invalid() {
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
        assert!(Coordinate::new(-29.7, -52.4).is_valid());
    }
}
