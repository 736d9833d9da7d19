//! Checks that a spoken runway exists at the airport the listener is at or
//! landing at.

use aviation_helper_rs::{
    clearance::intent::RunwayOperation,
    conversions::meters_to_nautical_miles,
    geo::{GeoPoint, Neighbor},
    reference::{ReferenceStore, records::Airport},
    types::runway::{RunwayDesignator, canonical_designator},
};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::config::{RadiusPolicy, ValidatorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum IndeterminateReason {
    NoAirportInRange,
    NoRunwayData,
    NotOnAirport,
}

/// Ternary verdict: an impossible runway is a definite error, an
/// indeterminate one only means there was not enough to go on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "verdict", rename_all = "camelCase")]
pub enum RunwayValidation {
    Confirmed { airport: String },
    NotFound { airport: String },
    Indeterminate { reason: IndeterminateReason },
}

impl RunwayValidation {
    pub fn as_option(&self) -> Option<bool> {
        match self {
            RunwayValidation::Confirmed { .. } => Some(true),
            RunwayValidation::NotFound { .. } => Some(false),
            RunwayValidation::Indeterminate { .. } => None,
        }
    }

    pub fn airport(&self) -> Option<&str> {
        match self {
            RunwayValidation::Confirmed { airport } | RunwayValidation::NotFound { airport } => {
                Some(airport.as_str())
            }
            RunwayValidation::Indeterminate { .. } => None,
        }
    }
}

/// Ground operations happen on the field the aircraft is at; landings may
/// be a few miles out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayContext {
    Ground,
    Landing,
}

impl From<RunwayOperation> for RunwayContext {
    fn from(operation: RunwayOperation) -> Self {
        if operation.is_ground() {
            RunwayContext::Ground
        } else {
            RunwayContext::Landing
        }
    }
}

fn known_accuracy(accuracy_m: Option<f64>) -> Option<f64> {
    accuracy_m.filter(|a| a.is_finite() && *a >= 0.0)
}

pub fn search_radius_nm(policy: &RadiusPolicy, accuracy_m: Option<f64>, config: &ValidatorConfig) -> f64 {
    let Some(accuracy) = known_accuracy(accuracy_m) else {
        return policy.cap_nm;
    };
    config
        .accuracy_steps
        .iter()
        .find(|step| accuracy <= step.max_accuracy_m)
        .map_or(policy.cap_nm, |step| {
            (policy.base_nm + step.extra_nm).min(policy.cap_nm)
        })
}

/// Farthest the nearest airport may be for the aircraft to count as on it.
pub fn ground_gate_nm(accuracy_m: Option<f64>, config: &ValidatorConfig) -> f64 {
    match known_accuracy(accuracy_m) {
        Some(accuracy) => config.ground_gate_max_nm.min(
            config.ground_gate_base_nm
                + meters_to_nautical_miles(accuracy) * config.ground_gate_accuracy_factor,
        ),
        None => config.ground_gate_max_nm,
    }
}

/// Whether `spoken` names one of `ends`. A designator spoken without a side
/// matches every end with that number.
pub fn designator_matches(spoken: &str, ends: &[RunwayDesignator]) -> bool {
    let canonical = canonical_designator(spoken);
    match canonical.parse::<RunwayDesignator>() {
        Ok(spoken) => ends.iter().any(|end| end.matches(&spoken)),
        Err(_) => ends
            .iter()
            .any(|end| canonical_designator(&end.to_string()) == canonical),
    }
}

fn verdict(airport: &Airport, spoken: &str, ends: &[RunwayDesignator]) -> RunwayValidation {
    let airport = airport.identifier.clone();
    if designator_matches(spoken, ends) {
        RunwayValidation::Confirmed { airport }
    } else {
        RunwayValidation::NotFound { airport }
    }
}

fn validate_ground(
    nearby: &[Neighbor<'_, Airport>],
    spoken: &str,
    accuracy_m: Option<f64>,
    store: &ReferenceStore,
    config: &ValidatorConfig,
) -> RunwayValidation {
    let Some(nearest) = nearby.first() else {
        return RunwayValidation::Indeterminate {
            reason: IndeterminateReason::NoAirportInRange,
        };
    };
    let gate = ground_gate_nm(accuracy_m, config);
    if nearest.distance_nm > gate {
        log::debug!(
            "Nearest airport {} is {:.2} nm away, gate {gate:.2} nm",
            nearest.item.identifier,
            nearest.distance_nm
        );
        return RunwayValidation::Indeterminate {
            reason: IndeterminateReason::NotOnAirport,
        };
    }
    let ends = store.usable_runway_ends(nearest.item);
    if ends.is_empty() {
        return RunwayValidation::Indeterminate {
            reason: IndeterminateReason::NoRunwayData,
        };
    }
    verdict(nearest.item, spoken, &ends)
}

fn validate_landing(
    nearby: &[Neighbor<'_, Airport>],
    spoken: &str,
    store: &ReferenceStore,
) -> RunwayValidation {
    if nearby.is_empty() {
        return RunwayValidation::Indeterminate {
            reason: IndeterminateReason::NoAirportInRange,
        };
    }
    // the nearest airport, or the next one if the nearest has no runways
    for neighbor in nearby.iter().take(2) {
        let ends = store.usable_runway_ends(neighbor.item);
        if !ends.is_empty() {
            return verdict(neighbor.item, spoken, &ends);
        }
    }
    RunwayValidation::Indeterminate {
        reason: IndeterminateReason::NoRunwayData,
    }
}

pub fn validate_runway(
    context: RunwayContext,
    spoken: &str,
    position: &GeoPoint,
    accuracy_m: Option<f64>,
    store: &ReferenceStore,
    config: &ValidatorConfig,
) -> RunwayValidation {
    let policy = match context {
        RunwayContext::Ground => &config.ground,
        RunwayContext::Landing => &config.landing,
    };
    let radius = search_radius_nm(policy, accuracy_m, config);
    let nearby = store.airports_near(position, radius);
    let validation = match context {
        RunwayContext::Ground => validate_ground(&nearby, spoken, accuracy_m, store, config),
        RunwayContext::Landing => validate_landing(&nearby, spoken, store),
    };
    log::debug!("Runway {spoken} ({context:?}, {radius:.1} nm): {validation:?}");
    validation
}
