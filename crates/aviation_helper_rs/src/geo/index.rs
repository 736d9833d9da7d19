use std::collections::HashMap;

use crate::conversions::NAUTICAL_MILES_PER_DEGREE_LAT;

use super::{GeoPoint, GridKey, Located, grid::wrap_lon};

/// A record found by a radius query together with its distance.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a, T> {
    pub item: &'a T,
    pub distance_nm: f64,
}

/// Degree-tile spatial index over any [`Located`] record.
///
/// Records keep their insertion order; queries enumerate tiles south to
/// north, west to east, and records inside a tile in insertion order.
#[derive(Debug, Clone)]
pub struct GeoIndex<T> {
    items: Vec<T>,
    tiles: HashMap<GridKey, Vec<usize>>,
}

impl<T> Default for GeoIndex<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            tiles: HashMap::new(),
        }
    }
}

impl<T: Located> GeoIndex<T> {
    pub fn build(items: Vec<T>) -> Self {
        let mut tiles: HashMap<GridKey, Vec<usize>> = HashMap::new();
        for (idx, item) in items.iter().enumerate() {
            let location = item.location();
            if !location.is_valid() {
                continue;
            }
            tiles.entry(location.grid_key()).or_default().push(idx);
        }
        Self { items, tiles }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    /// All records within `radius_nm` of `center`, in enumeration order.
    pub fn within(&self, center: &GeoPoint, radius_nm: f64) -> Vec<Neighbor<'_, T>> {
        if self.tiles.is_empty() || !center.is_valid() || radius_nm.is_nan() || radius_nm < 0.0 {
            return Vec::new();
        }
        let mut found = Vec::new();
        for key in covering_tiles(center, radius_nm) {
            let Some(indices) = self.tiles.get(&key) else {
                continue;
            };
            for &idx in indices {
                let item = &self.items[idx];
                let distance_nm = center.distance_nm(&item.location());
                if distance_nm <= radius_nm {
                    found.push(Neighbor { item, distance_nm });
                }
            }
        }
        found
    }

    /// Records within `radius_nm` sorted by distance; equal distances keep
    /// enumeration order.
    pub fn nearest(&self, center: &GeoPoint, radius_nm: f64) -> Vec<Neighbor<'_, T>> {
        let mut found = self.within(center, radius_nm);
        found.sort_by(|a, b| a.distance_nm.total_cmp(&b.distance_nm));
        found
    }
}

/// Tiles that may hold a point within `radius_nm` of `center`.
fn covering_tiles(center: &GeoPoint, radius_nm: f64) -> Vec<GridKey> {
    let lat_span = radius_nm / NAUTICAL_MILES_PER_DEGREE_LAT;
    let south = (center.latitude - lat_span).max(-90.0);
    let north = (center.latitude + lat_span).min(90.0);

    // a circle touching a pole spans every meridian
    let lon_span = if north >= 90.0 || south <= -90.0 {
        f64::INFINITY
    } else {
        let widest_lat = south.abs().max(north.abs());
        radius_nm / (NAUTICAL_MILES_PER_DEGREE_LAT * widest_lat.to_radians().cos())
    };

    let lat_tiles = (south.floor() as i32).max(-90)..=(north.floor() as i32).min(89);
    let lon_tiles: Vec<i32> = if lon_span >= 180.0 {
        (-180..=179).collect()
    } else {
        let west = (center.longitude - lon_span).floor() as i32;
        let east = (center.longitude + lon_span).floor() as i32;
        let mut lons = Vec::new();
        for lon in west..=east {
            let lon = wrap_lon(lon);
            if !lons.contains(&lon) {
                lons.push(lon);
            }
        }
        lons
    };

    let mut keys = Vec::new();
    for lat in lat_tiles {
        for &lon in &lon_tiles {
            keys.push(GridKey { lat, lon });
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Named(&'static str, f64, f64);

    impl Located for Named {
        fn location(&self) -> GeoPoint {
            GeoPoint::new(self.1, self.2)
        }
    }

    fn names(found: &[Neighbor<'_, Named>]) -> Vec<&'static str> {
        found.iter().map(|n| n.item.0).collect()
    }

    #[test]
    fn test_empty_index() {
        let index: GeoIndex<Named> = GeoIndex::default();
        assert!(index.is_empty());
        assert!(index.within(&GeoPoint::new(0.0, 0.0), 100.0).is_empty());
    }

    #[test]
    fn test_within_crosses_tile_border() {
        let index = GeoIndex::build(vec![
            Named("NORTH", 48.05, -122.0),
            Named("SOUTH", 47.95, -122.0),
            Named("FAR", 50.0, -122.0),
        ]);
        let found = index.within(&GeoPoint::new(48.0, -122.0), 10.0);
        assert_eq!(names(&found), vec!["SOUTH", "NORTH"]);
    }

    #[test]
    fn test_nearest_sorts_by_distance() {
        let index = GeoIndex::build(vec![
            Named("B", 47.2, -122.0),
            Named("A", 47.05, -122.0),
            Named("C", 47.5, -122.0),
        ]);
        let found = index.nearest(&GeoPoint::new(47.0, -122.0), 40.0);
        assert_eq!(names(&found), vec!["A", "B", "C"]);
        assert!(found[0].distance_nm < found[1].distance_nm);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = GeoIndex::build(vec![
            Named("FIRST", 47.1, -122.0),
            Named("SECOND", 47.1, -122.0),
        ]);
        let found = index.nearest(&GeoPoint::new(47.0, -122.0), 20.0);
        assert_eq!(names(&found), vec!["FIRST", "SECOND"]);
    }

    #[test]
    fn test_antimeridian() {
        let index = GeoIndex::build(vec![
            Named("EAST", 0.0, 179.95),
            Named("WEST", 0.0, -179.95),
        ]);
        let found = index.within(&GeoPoint::new(0.0, 179.99), 10.0);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_polar_query_covers_all_longitudes() {
        let index = GeoIndex::build(vec![Named("POLE", 89.9, 100.0)]);
        let found = index.within(&GeoPoint::new(89.9, -80.0), 30.0);
        assert_eq!(names(&found), vec!["POLE"]);
    }

    #[test]
    fn test_invalid_locations_are_not_indexed() {
        let index = GeoIndex::build(vec![Named("BAD", f64::NAN, 0.0), Named("OK", 0.0, 0.0)]);
        assert_eq!(index.len(), 2);
        assert_eq!(names(&index.within(&GeoPoint::new(0.0, 0.0), 5.0)), vec!["OK"]);
    }
}
