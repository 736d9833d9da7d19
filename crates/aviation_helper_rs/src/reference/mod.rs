//! Aviation reference data: airports, runways, fixes, navaids and the
//! tables around them.

mod de;
pub mod lookup;
pub mod manifest;
pub mod records;
pub mod store;

pub use lookup::{EntityType, ReferenceLookup};
pub use manifest::ReferenceManifest;
pub use store::{ReferenceStore, ReferenceTables};
