//! Fixed additive confidence model.

use std::collections::{BTreeMap, BTreeSet};

use aviation_helper_rs::{
    clearance::intent::{IfrClearance, ParsedIntent},
    reference::ReferenceLookup,
};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{snapper::SnapEvent, validator::RunwayValidation};

pub const BASE: f32 = 0.5;
pub const NUMERIC_IN_RANGE: f32 = 0.15;
pub const SNAPPED: f32 = 0.20;
pub const INDEPENDENTLY_VALIDATED: f32 = 0.15;
pub const RUNWAY_OPERATION: f32 = 0.12;
pub const RUNWAY_CONFIRMED: f32 = 0.10;
pub const RUNWAY_INDETERMINATE: f32 = -0.10;
pub const RUNWAY_IMPOSSIBLE: f32 = -0.15;
pub const PER_UNCERTAIN_FIELD: f32 = -0.10;
pub const CONFLICT: f32 = -0.20;
pub const MAX_CONFIDENCE: f32 = 0.99;

/// Fields reported in the per-field confidence map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    Runway,
    Taxiway,
    Altitude,
    Frequency,
    ClearanceLimit,
    Route,
    Squawk,
    Identifiers,
}

pub struct ConfidenceInputs<'a> {
    pub intents: &'a [ParsedIntent],
    pub snap_events: &'a [SnapEvent],
    /// Verdict for the transmission's runway, only when one was named.
    pub runway_validation: Option<&'a RunwayValidation>,
    pub uncertain_fields: usize,
    pub lookup: &'a dyn ReferenceLookup,
}

fn clearances<'a>(intents: &'a [ParsedIntent]) -> impl Iterator<Item = &'a IfrClearance> {
    intents.iter().filter_map(|intent| match intent {
        ParsedIntent::PartialIfrClearance(clearance) => Some(clearance),
        _ => None,
    })
}

fn has_numeric_in_range(intents: &[ParsedIntent]) -> bool {
    intents.iter().any(|intent| match intent {
        ParsedIntent::AltitudeChange { .. } => true,
        ParsedIntent::FrequencyChange { frequency, .. } => frequency.is_vhf_comm(),
        ParsedIntent::PartialIfrClearance(clearance) => {
            clearance.initial_altitude.is_some()
                || clearance.squawk.is_some()
                || clearance
                    .departure_frequency
                    .is_some_and(|f| f.is_vhf_comm())
        }
        ParsedIntent::RunwayOperation { .. }
        | ParsedIntent::TaxiToRunway { .. }
        | ParsedIntent::CrossRunway { .. }
        | ParsedIntent::ContinueTaxi { .. }
        | ParsedIntent::ViaTaxiway { .. } => false,
    })
}

fn has_validated_content(intents: &[ParsedIntent], lookup: &dyn ReferenceLookup) -> bool {
    intents.iter().any(|intent| match intent {
        ParsedIntent::FrequencyChange { frequency, .. } => frequency.is_vhf_comm(),
        ParsedIntent::PartialIfrClearance(clearance) => {
            clearance
                .clearance_limit
                .as_deref()
                .is_some_and(|limit| lookup.contains(limit))
                || clearance.route.iter().any(|token| lookup.contains(token))
                || clearance
                    .departure_frequency
                    .is_some_and(|f| f.is_vhf_comm())
        }
        ParsedIntent::RunwayOperation { .. }
        | ParsedIntent::TaxiToRunway { .. }
        | ParsedIntent::CrossRunway { .. }
        | ParsedIntent::ContinueTaxi { .. }
        | ParsedIntent::ViaTaxiway { .. }
        | ParsedIntent::AltitudeChange { .. } => false,
    })
}

fn altitude_values(intents: &[ParsedIntent]) -> BTreeSet<u32> {
    intents
        .iter()
        .filter_map(|intent| match intent {
            ParsedIntent::AltitudeChange { altitude, .. } => Some(altitude.feet()),
            _ => None,
        })
        .collect()
}

fn frequency_values(intents: &[ParsedIntent]) -> BTreeSet<u32> {
    intents
        .iter()
        .filter_map(|intent| match intent {
            ParsedIntent::FrequencyChange { frequency, .. } => Some(frequency.khz()),
            _ => None,
        })
        .collect()
}

/// Two different altitudes, or two different frequencies.
pub fn has_conflict(intents: &[ParsedIntent]) -> bool {
    altitude_values(intents).len() > 1 || frequency_values(intents).len() > 1
}

pub fn score(inputs: &ConfidenceInputs<'_>) -> f32 {
    let intents = inputs.intents;
    let mut score = BASE;
    if has_numeric_in_range(intents) {
        score += NUMERIC_IN_RANGE;
    }
    if !inputs.snap_events.is_empty() {
        score += SNAPPED;
    }
    if has_validated_content(intents, inputs.lookup) {
        score += INDEPENDENTLY_VALIDATED;
    }
    if intents
        .iter()
        .any(|i| matches!(i, ParsedIntent::RunwayOperation { .. }))
    {
        score += RUNWAY_OPERATION;
    }
    score += match inputs.runway_validation.map(RunwayValidation::as_option) {
        Some(Some(true)) => RUNWAY_CONFIRMED,
        Some(Some(false)) => RUNWAY_IMPOSSIBLE,
        Some(None) => RUNWAY_INDETERMINATE,
        None => 0.0,
    };
    score += PER_UNCERTAIN_FIELD * inputs.uncertain_fields as f32;
    if has_conflict(intents) {
        score += CONFLICT;
    }
    score.clamp(0.0, MAX_CONFIDENCE)
}

/// Confidence of each field the transmission actually carried.
pub fn field_confidence(inputs: &ConfidenceInputs<'_>) -> BTreeMap<Field, f32> {
    let intents = inputs.intents;
    let mut fields = BTreeMap::new();

    if intents.iter().any(|i| !i.runways().is_empty()) {
        let runway = match inputs.runway_validation.map(RunwayValidation::as_option) {
            Some(Some(true)) => 0.9,
            Some(Some(false)) => 0.3,
            Some(None) | None => 0.6,
        };
        fields.insert(Field::Runway, runway);
    }
    if intents.iter().any(|i| {
        matches!(
            i,
            ParsedIntent::ViaTaxiway { .. } | ParsedIntent::ContinueTaxi { taxiway: Some(_) }
        )
    }) {
        fields.insert(Field::Taxiway, 0.8);
    }

    let conflict_or = |values: usize, clean: f32| if values > 1 { 0.5 } else { clean };
    let altitudes = altitude_values(intents).len();
    let clearance_altitude = clearances(intents).any(|c| c.initial_altitude.is_some());
    if altitudes > 0 || clearance_altitude {
        fields.insert(Field::Altitude, conflict_or(altitudes, 0.9));
    }
    let frequencies = frequency_values(intents).len();
    let clearance_frequency = clearances(intents).any(|c| c.departure_frequency.is_some());
    if frequencies > 0 || clearance_frequency {
        fields.insert(Field::Frequency, conflict_or(frequencies, 0.9));
    }

    for clearance in clearances(intents) {
        if let Some(limit) = &clearance.clearance_limit {
            let known = inputs.lookup.contains(limit);
            fields.insert(Field::ClearanceLimit, if known { 0.9 } else { 0.6 });
        }
        if !clearance.route.is_empty() {
            let known = clearance
                .route
                .iter()
                .filter(|token| inputs.lookup.contains(token))
                .count();
            let share = known as f32 / clearance.route.len() as f32;
            fields.insert(Field::Route, 0.5 + 0.4 * share);
        }
        if clearance.squawk.is_some() {
            fields.insert(Field::Squawk, 0.9);
        }
    }

    if !inputs.snap_events.is_empty() || inputs.uncertain_fields > 0 {
        let total = inputs.snap_events.len() + inputs.uncertain_fields;
        let snapped: f32 = inputs.snap_events.iter().map(|e| e.confidence).sum();
        fields.insert(Field::Identifiers, snapped / total as f32);
    }
    fields
}
