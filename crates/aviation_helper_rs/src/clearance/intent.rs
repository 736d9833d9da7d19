use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{
    altitude::{Altitude, AltitudeVerb},
    frequency::{FacilityType, Frequency},
    squawk::Squawk,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum RunwayOperation {
    LineUpAndWait,
    ClearedTakeoff,
    HoldShort,
    ClearedLand,
}

impl RunwayOperation {
    /// Operations performed on the airport surface rather than on approach.
    pub fn is_ground(&self) -> bool {
        !matches!(self, RunwayOperation::ClearedLand)
    }
}

/// The CRAFT parts of an IFR clearance that could be read from a transmission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IfrClearance {
    pub clearance_limit: Option<String>,
    #[serde(default)]
    pub route: Vec<String>,
    pub initial_altitude: Option<Altitude>,
    pub squawk: Option<Squawk>,
    pub departure_frequency: Option<Frequency>,
}

impl IfrClearance {
    pub fn is_empty(&self) -> bool {
        self.clearance_limit.is_none()
            && self.route.is_empty()
            && self.initial_altitude.is_none()
            && self.squawk.is_none()
            && self.departure_frequency.is_none()
    }
}

/// One instruction read from a transmission.
///
/// Runway designators are kept as the two-digit text that was spoken
/// (`"09"`, `"27L"`, even an impossible `"99"`), validation happens later.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParsedIntent {
    RunwayOperation {
        operation: RunwayOperation,
        runway: Option<String>,
    },
    TaxiToRunway {
        runway: Option<String>,
        validated: Option<bool>,
    },
    CrossRunway {
        runways: Vec<String>,
        #[serde(default)]
        validated: BTreeMap<String, Option<bool>>,
    },
    ContinueTaxi {
        taxiway: Option<char>,
    },
    ViaTaxiway {
        taxiway: char,
    },
    AltitudeChange {
        verb: AltitudeVerb,
        altitude: Altitude,
    },
    FrequencyChange {
        facility: Option<FacilityType>,
        frequency: Frequency,
    },
    PartialIfrClearance(IfrClearance),
}

impl ParsedIntent {
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedIntent::RunwayOperation { .. } => "runwayOperation",
            ParsedIntent::TaxiToRunway { .. } => "taxiToRunway",
            ParsedIntent::CrossRunway { .. } => "crossRunway",
            ParsedIntent::ContinueTaxi { .. } => "continueTaxi",
            ParsedIntent::ViaTaxiway { .. } => "viaTaxiway",
            ParsedIntent::AltitudeChange { .. } => "altitudeChange",
            ParsedIntent::FrequencyChange { .. } => "frequencyChange",
            ParsedIntent::PartialIfrClearance(_) => "partialIfrClearance",
        }
    }

    /// Every runway designator the intent names, in spoken order.
    pub fn runways(&self) -> Vec<&str> {
        match self {
            ParsedIntent::RunwayOperation { runway, .. } | ParsedIntent::TaxiToRunway { runway, .. } => {
                runway.as_deref().into_iter().collect()
            }
            ParsedIntent::CrossRunway { runways, .. } => runways.iter().map(String::as_str).collect(),
            ParsedIntent::ContinueTaxi { .. }
            | ParsedIntent::ViaTaxiway { .. }
            | ParsedIntent::AltitudeChange { .. }
            | ParsedIntent::FrequencyChange { .. }
            | ParsedIntent::PartialIfrClearance(_) => Vec::new(),
        }
    }
}
