pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;
pub const EARTH_RADIUS_NM: f64 = 3440.065;
/// One degree of latitude is sixty nautical miles.
pub const NAUTICAL_MILES_PER_DEGREE_LAT: f64 = 60.0;

pub fn meters_to_nautical_miles(meters: f64) -> f64 {
    meters / METERS_PER_NAUTICAL_MILE
}
