use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, Located};

use super::de;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Airport {
    #[serde(alias = "id", deserialize_with = "de::ident")]
    pub identifier: String,
    #[serde(
        default,
        alias = "icao",
        alias = "icao_id",
        deserialize_with = "de::option_ident"
    )]
    pub icao_identifier: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "de::f64_required")]
    pub latitude: f64,
    #[serde(deserialize_with = "de::f64_required")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub elevation_ft: Option<f64>,
    /// Runway pair ids such as `14/32`.
    #[serde(default)]
    pub runways: Vec<String>,
    /// Facility type (`tower`, `ground`, ...) to MHz strings.
    #[serde(default)]
    pub frequencies: BTreeMap<String, Vec<String>>,
}

impl Located for Airport {
    fn location(&self) -> GeoPoint {
        let point = GeoPoint::new(self.latitude, self.longitude);
        match self.elevation_ft {
            Some(elevation) => point.with_altitude(elevation),
            None => point,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RunwayEnd {
    /// Blank in the source data for some ends; the record is kept anyway.
    #[serde(default, deserialize_with = "de::option_ident")]
    pub end_id: Option<String>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub elevation_ft: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub true_alignment: Option<f64>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub ils_type: Option<String>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub displaced_threshold_ft: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub tdz_elev_ft: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Runway {
    #[serde(deserialize_with = "de::ident")]
    pub airport_identifier: String,
    #[serde(deserialize_with = "de::ident")]
    pub runway_id: String,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub length_ft: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub width_ft: Option<f64>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub surface: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub lighting: Option<String>,
    #[serde(default)]
    pub ends: Vec<RunwayEnd>,
}

/// A localizer with its glideslope, DME and markers, by airport and the
/// runway end it serves.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IlsRecord {
    #[serde(deserialize_with = "de::ident")]
    pub airport_identifier: String,
    #[serde(deserialize_with = "de::ident")]
    pub runway_id: String,
    #[serde(default, deserialize_with = "de::option_ident")]
    pub ident: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Fix {
    #[serde(alias = "id", deserialize_with = "de::ident")]
    pub identifier: String,
    #[serde(deserialize_with = "de::f64_required")]
    pub latitude: f64,
    #[serde(deserialize_with = "de::f64_required")]
    pub longitude: f64,
}

impl Located for Fix {
    fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Navaid {
    #[serde(alias = "id", deserialize_with = "de::ident")]
    pub identifier: String,
    #[serde(default, rename = "type", deserialize_with = "de::option_string")]
    pub navaid_type: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub country: Option<String>,
    #[serde(deserialize_with = "de::f64_required")]
    pub latitude: f64,
    #[serde(deserialize_with = "de::f64_required")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub elevation_ft: Option<f64>,
    #[serde(
        default,
        rename = "frequency_khz_or_mhz",
        alias = "frequency",
        deserialize_with = "de::option_string"
    )]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub status: Option<String>,
}

impl Located for Navaid {
    fn location(&self) -> GeoPoint {
        let point = GeoPoint::new(self.latitude, self.longitude);
        match self.elevation_ft {
            Some(elevation) => point.with_altitude(elevation),
            None => point,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FrequencyRecord {
    #[serde(deserialize_with = "de::ident")]
    pub facility_id: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub facility_type: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub freq_type: Option<String>,
    #[serde(deserialize_with = "de::option_string")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub units: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub service: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub callsign: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub sector_name: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub comm_location: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommOutlet {
    #[serde(deserialize_with = "de::ident")]
    pub outlet_id: String,
    #[serde(default, deserialize_with = "de::option_string")]
    pub name: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "de::option_string")]
    pub outlet_type: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "de::option_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "de::option_ident")]
    pub artcc_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProcedureAirport {
    #[serde(deserialize_with = "de::ident")]
    pub airport_identifier: String,
    #[serde(default, deserialize_with = "de::option_ident")]
    pub runway: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteSegment {
    #[serde(default, deserialize_with = "de::option_u32")]
    pub seq: Option<u32>,
    #[serde(default, deserialize_with = "de::option_ident")]
    pub fix_id: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub fix_type: Option<String>,
    #[serde(default, deserialize_with = "de::option_ident")]
    pub nav_id: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub nav_type: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub transition: Option<String>,
}

/// A departure or arrival procedure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Procedure {
    #[serde(deserialize_with = "de::ident")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "de::option_string")]
    pub procedure_type: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub airports: Vec<ProcedureAirport>,
    #[serde(default)]
    pub route: Vec<RouteSegment>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AirwaySegment {
    #[serde(default, deserialize_with = "de::option_u32")]
    pub seq: Option<u32>,
    #[serde(default, deserialize_with = "de::option_ident")]
    pub fix_id: Option<String>,
    #[serde(default, deserialize_with = "de::option_ident")]
    pub nav_id: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub mea: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub moca: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Airway {
    #[serde(deserialize_with = "de::ident")]
    pub airway_id: String,
    #[serde(default, rename = "type", deserialize_with = "de::option_string")]
    pub airway_type: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "de::option_string")]
    pub status: Option<String>,
    #[serde(default)]
    pub segments: Vec<AirwaySegment>,
}
