//! Geo substrate shared by the reference store and the snapper.
//!
//! Points are bucketed into 1°×1° tiles keyed by [`GridKey`]; a radius query
//! visits the covering tiles in latitude-then-longitude order so the order of
//! results never depends on hash iteration.

mod grid;
mod index;
mod point;

pub use grid::GridKey;
pub use index::{GeoIndex, Neighbor};
pub use point::{GeoPoint, Located};
