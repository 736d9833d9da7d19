use serde::{Deserialize, Serialize};

use crate::conversions::EARTH_RADIUS_NM;

use super::GridKey;

/// A position on the earth, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_ft: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_ft: None,
        }
    }

    pub fn with_altitude(mut self, altitude_ft: f64) -> Self {
        self.altitude_ft = Some(altitude_ft);
        self
    }

    /// Great circle distance using the haversine formula.
    pub fn distance_nm(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_NM * c
    }

    pub fn grid_key(&self) -> GridKey {
        GridKey::from_lat_lon(self.latitude, self.longitude)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Anything with a position that can be put into a [`super::GeoIndex`].
pub trait Located {
    fn location(&self) -> GeoPoint;
}

impl Located for GeoPoint {
    fn location(&self) -> GeoPoint {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero() {
        let p = GeoPoint::new(47.45, -122.31);
        assert!(p.distance_nm(&p).abs() < 1e-9);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(11.0, 20.0);
        assert!((a.distance_nm(&b) - 60.04).abs() < 0.1);
    }

    #[test]
    fn test_distance_symmetric() {
        let sea = GeoPoint::new(47.4490, -122.3093);
        let pdx = GeoPoint::new(45.5887, -122.5975);
        let d = sea.distance_nm(&pdx);
        assert!((d - pdx.distance_nm(&sea)).abs() < 1e-9);
        assert!((110.0..115.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_validity() {
        assert!(GeoPoint::new(0.0, 0.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
    }
}
