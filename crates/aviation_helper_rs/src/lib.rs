//! Aviation value types, geo indexing and reference data shared by the
//! readback pipeline.

pub mod clearance;
pub mod conversions;
pub mod errors;
pub mod geo;
pub mod reference;
pub mod types;

pub use errors::Error;
