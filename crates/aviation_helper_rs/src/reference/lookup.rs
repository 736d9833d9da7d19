use serde::{Deserialize, Serialize};
use strum::Display;

use super::store::ReferenceStore;

/// What kind of reference record an identifier resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityType {
    Airport,
    Fix,
    Navaid,
    Airway,
    Procedure,
}

/// Existence checks for clearance limits and route tokens.
pub trait ReferenceLookup {
    fn resolve(&self, ident: &str) -> Option<EntityType>;

    fn contains(&self, ident: &str) -> bool {
        self.resolve(ident).is_some()
    }
}

impl ReferenceLookup for ReferenceStore {
    fn resolve(&self, ident: &str) -> Option<EntityType> {
        if self.airport(ident).is_some() {
            Some(EntityType::Airport)
        } else if self.fix(ident).is_some() {
            Some(EntityType::Fix)
        } else if self.navaid(ident).is_some() {
            Some(EntityType::Navaid)
        } else if self.airway(ident).is_some() {
            Some(EntityType::Airway)
        } else if self.procedure(ident).is_some() {
            Some(EntityType::Procedure)
        } else {
            None
        }
    }
}
