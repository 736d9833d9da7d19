use std::fmt;

/// A 1°×1° tile identified by the floor of latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridKey {
    /// Floor of the latitude (south edge of the tile).
    pub lat: i32,
    /// Floor of the longitude (west edge of the tile), in `-180..=179`.
    pub lon: i32,
}

impl GridKey {
    pub fn new(lat: i32, lon: i32) -> Self {
        Self {
            lat: lat.clamp(-90, 89),
            lon: wrap_lon(lon),
        }
    }

    pub fn from_lat_lon(lat: f64, lon: f64) -> Self {
        Self::new(lat.floor() as i32, lon.floor() as i32)
    }
}

/// Wraps a tile longitude into `-180..=179`.
pub(crate) fn wrap_lon(lon: i32) -> i32 {
    (lon + 180).rem_euclid(360) - 180
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+03}{:+04}", self.lat, self.lon)
    }
}
