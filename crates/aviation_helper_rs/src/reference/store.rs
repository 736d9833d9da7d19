//! In-memory reference tables with spatial and key indexes.

use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::BufReader,
    path::Path,
};

use serde::de::DeserializeOwned;

use crate::{
    errors::Error,
    geo::{GeoIndex, GeoPoint, Neighbor},
    types::runway::{RunwayDesignator, canonical_designator, split_runway_pair},
};

use super::{
    manifest::ReferenceManifest,
    records::{
        Airport, Airway, CommOutlet, Fix, FrequencyRecord, IlsRecord, Navaid, Procedure, Runway,
    },
};

pub const AIRPORTS_FILE: &str = "airports.json";
pub const RUNWAYS_FILE: &str = "runways.json";
pub const FIXES_FILE: &str = "fixes.json";
pub const NAVAIDS_FILE: &str = "navaids.json";
pub const FREQUENCIES_FILE: &str = "frequencies.json";
pub const COMMS_FILE: &str = "comms.json";
pub const DEPARTURES_FILE: &str = "departures.json";
pub const ARRIVALS_FILE: &str = "arrivals.json";
pub const AIRWAYS_FILE: &str = "airways.json";
pub const ILS_FILE: &str = "ils.json";
pub const MANIFEST_FILE: &str = "aviation_manifest.json";

/// Raw tables as read from a data directory, before indexing.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub airports: Vec<Airport>,
    pub runways: Vec<Runway>,
    pub fixes: Vec<Fix>,
    pub navaids: Vec<Navaid>,
    pub frequencies: Vec<FrequencyRecord>,
    pub comms: Vec<CommOutlet>,
    pub departures: Vec<Procedure>,
    pub arrivals: Vec<Procedure>,
    pub airways: Vec<Airway>,
    pub ils: Vec<IlsRecord>,
    pub manifest: Option<ReferenceManifest>,
}

impl ReferenceTables {
    /// Reads every table it can find; a missing or malformed file leaves
    /// that table empty.
    pub fn load_from_dir(dir: &Path) -> Self {
        let manifest = match ReferenceManifest::load_from_file(&dir.join(MANIFEST_FILE)) {
            Ok(manifest) => Some(manifest),
            Err(err) => {
                log::debug!("No usable {MANIFEST_FILE} in {}: {err:?}", dir.display());
                None
            }
        };
        Self {
            airports: load_table(dir, AIRPORTS_FILE, true),
            runways: load_table(dir, RUNWAYS_FILE, true),
            fixes: load_table(dir, FIXES_FILE, true),
            navaids: load_table(dir, NAVAIDS_FILE, true),
            frequencies: load_table(dir, FREQUENCIES_FILE, true),
            comms: load_table(dir, COMMS_FILE, false),
            departures: load_table(dir, DEPARTURES_FILE, false),
            arrivals: load_table(dir, ARRIVALS_FILE, false),
            airways: load_table(dir, AIRWAYS_FILE, false),
            ils: load_table(dir, ILS_FILE, false),
            manifest,
        }
    }
}

fn load_table<T: DeserializeOwned>(dir: &Path, file: &str, required: bool) -> Vec<T> {
    let path = dir.join(file);
    match read_table(&path) {
        Ok((records, skipped)) => {
            if skipped > 0 {
                log::warn!("Skipped {skipped} malformed records in {file}");
            }
            records
        }
        Err(Error::StdIo(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            if required {
                log::warn!("{} not found, table is empty", path.display());
            } else {
                log::debug!("{} not found, table is empty", path.display());
            }
            Vec::new()
        }
        Err(err) => {
            log::warn!("Could not load {}, table is empty: {err:?}", path.display());
            Vec::new()
        }
    }
}

/// Parses a JSON array record by record so one bad row does not cost the
/// whole table.
fn read_table<T: DeserializeOwned>(path: &Path) -> Result<(Vec<T>, usize), Error> {
    let file = File::open(path)?;
    let rows: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))?;
    let mut skipped = 0;
    let records = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(err) => {
                log::debug!("Skipping record in {}: {err}", path.display());
                skipped += 1;
                None
            }
        })
        .collect();
    Ok((records, skipped))
}

/// Sets `ils_type` on the runway end an ILS serves, unless the runway table
/// already names one.
fn mark_ils_end(runways: &mut HashMap<String, Vec<Runway>>, ils: &IlsRecord) {
    let Some(runways) = runways.get_mut(&ils.airport_identifier) else {
        return;
    };
    let served = canonical_designator(&ils.runway_id);
    let end = runways
        .iter_mut()
        .flat_map(|runway| runway.ends.iter_mut())
        .find(|end| {
            end.end_id
                .as_deref()
                .is_some_and(|id| canonical_designator(id) == served)
        });
    if let Some(end) = end {
        end.ils_type.get_or_insert_with(|| "ILS".to_owned());
    }
}

/// Immutable aviation reference data, safe to share across threads.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    airports: GeoIndex<Airport>,
    airport_keys: HashMap<String, usize>,
    fixes: GeoIndex<Fix>,
    fix_keys: HashMap<String, usize>,
    navaids: GeoIndex<Navaid>,
    navaid_keys: HashMap<String, usize>,
    runways: HashMap<String, Vec<Runway>>,
    frequencies: HashMap<String, Vec<FrequencyRecord>>,
    comms: Vec<CommOutlet>,
    departures: Vec<Procedure>,
    arrivals: Vec<Procedure>,
    procedure_keys: HashMap<String, (ProcedureTable, usize)>,
    airways: Vec<Airway>,
    airway_keys: HashMap<String, usize>,
    ils_count: usize,
    manifest: Option<ReferenceManifest>,
}

#[derive(Debug, Clone, Copy)]
enum ProcedureTable {
    Departure,
    Arrival,
}

/// First record wins when a key repeats.
fn key_index<'a>(keys: impl Iterator<Item = (usize, &'a str)>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (idx, key) in keys {
        index.entry(key.to_uppercase()).or_insert(idx);
    }
    index
}

impl ReferenceStore {
    /// A store with no data: every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load_from_dir(dir: &Path) -> Self {
        let store = Self::from_tables(ReferenceTables::load_from_dir(dir));
        log::info!(
            "Loaded reference data from {}: {:?}",
            dir.display(),
            store.counts()
        );
        store
    }

    pub fn from_tables(tables: ReferenceTables) -> Self {
        let mut airport_keys = HashMap::new();
        for (idx, airport) in tables.airports.iter().enumerate() {
            airport_keys
                .entry(airport.identifier.clone())
                .or_insert(idx);
            if let Some(icao) = &airport.icao_identifier {
                airport_keys.entry(icao.clone()).or_insert(idx);
            }
        }
        let fix_keys = key_index(
            tables
                .fixes
                .iter()
                .enumerate()
                .map(|(idx, fix)| (idx, fix.identifier.as_str())),
        );
        let navaid_keys = key_index(
            tables
                .navaids
                .iter()
                .enumerate()
                .map(|(idx, navaid)| (idx, navaid.identifier.as_str())),
        );
        let airway_keys = key_index(
            tables
                .airways
                .iter()
                .enumerate()
                .map(|(idx, airway)| (idx, airway.airway_id.as_str())),
        );

        let mut procedure_keys = HashMap::new();
        for (table, procedures) in [
            (ProcedureTable::Departure, &tables.departures),
            (ProcedureTable::Arrival, &tables.arrivals),
        ] {
            for (idx, procedure) in procedures.iter().enumerate() {
                procedure_keys
                    .entry(procedure.id.clone())
                    .or_insert((table, idx));
                if !procedure.name.is_empty() {
                    procedure_keys
                        .entry(procedure.name.to_uppercase())
                        .or_insert((table, idx));
                }
            }
        }

        let mut runways: HashMap<String, Vec<Runway>> = HashMap::new();
        for runway in tables.runways {
            runways
                .entry(runway.airport_identifier.clone())
                .or_default()
                .push(runway);
        }
        for ils in &tables.ils {
            mark_ils_end(&mut runways, ils);
        }
        let mut frequencies: HashMap<String, Vec<FrequencyRecord>> = HashMap::new();
        for frequency in tables.frequencies {
            frequencies
                .entry(frequency.facility_id.clone())
                .or_default()
                .push(frequency);
        }

        Self {
            airports: GeoIndex::build(tables.airports),
            airport_keys,
            fixes: GeoIndex::build(tables.fixes),
            fix_keys,
            navaids: GeoIndex::build(tables.navaids),
            navaid_keys,
            runways,
            frequencies,
            comms: tables.comms,
            departures: tables.departures,
            arrivals: tables.arrivals,
            procedure_keys,
            airways: tables.airways,
            airway_keys,
            ils_count: tables.ils.len(),
            manifest: tables.manifest,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty() && self.fixes.is_empty() && self.navaids.is_empty()
    }

    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        BTreeMap::from([
            ("airports", self.airports.len()),
            ("runways", self.runways.values().map(Vec::len).sum()),
            ("fixes", self.fixes.len()),
            ("navaids", self.navaids.len()),
            ("frequencies", self.frequencies.values().map(Vec::len).sum()),
            ("comms", self.comms.len()),
            ("departures", self.departures.len()),
            ("arrivals", self.arrivals.len()),
            ("airways", self.airways.len()),
            ("ils", self.ils_count),
        ])
    }

    pub fn manifest(&self) -> Option<&ReferenceManifest> {
        self.manifest.as_ref()
    }

    /// Looks up an airport by FAA or ICAO identifier, case-insensitive.
    pub fn airport(&self, ident: &str) -> Option<&Airport> {
        self.airport_keys
            .get(&ident.trim().to_uppercase())
            .and_then(|&idx| self.airports.get(idx))
    }

    pub fn fix(&self, ident: &str) -> Option<&Fix> {
        self.fix_keys
            .get(&ident.trim().to_uppercase())
            .and_then(|&idx| self.fixes.get(idx))
    }

    pub fn navaid(&self, ident: &str) -> Option<&Navaid> {
        self.navaid_keys
            .get(&ident.trim().to_uppercase())
            .and_then(|&idx| self.navaids.get(idx))
    }

    pub fn airway(&self, ident: &str) -> Option<&Airway> {
        self.airway_keys
            .get(&ident.trim().to_uppercase())
            .and_then(|&idx| self.airways.get(idx))
    }

    /// Looks up a departure or arrival by id or name.
    pub fn procedure(&self, ident: &str) -> Option<&Procedure> {
        let &(table, idx) = self.procedure_keys.get(&ident.trim().to_uppercase())?;
        match table {
            ProcedureTable::Departure => self.departures.get(idx),
            ProcedureTable::Arrival => self.arrivals.get(idx),
        }
    }

    pub fn runways_for(&self, airport: &Airport) -> &[Runway] {
        self.runways
            .get(&airport.identifier)
            .or_else(|| {
                airport
                    .icao_identifier
                    .as_ref()
                    .and_then(|icao| self.runways.get(icao))
            })
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every runway end that can be named at `airport`, first seen first.
    ///
    /// Ends come from the airport's own pair list, then the pair id of each
    /// runway record, then each record's `end_id`. Halves that are not a
    /// valid designator are dropped.
    pub fn usable_runway_ends(&self, airport: &Airport) -> Vec<RunwayDesignator> {
        let runways = self.runways_for(airport);
        let candidates = airport
            .runways
            .iter()
            .flat_map(|pair| split_runway_pair(pair))
            .chain(runways.iter().flat_map(|r| split_runway_pair(&r.runway_id)))
            .chain(
                runways
                    .iter()
                    .flat_map(|r| r.ends.iter())
                    .filter_map(|end| end.end_id.as_deref()?.parse::<RunwayDesignator>().ok()),
            );

        let mut ends = Vec::new();
        for end in candidates {
            if !ends.contains(&end) {
                ends.push(end);
            }
        }
        ends
    }

    pub fn airports_within(&self, center: &GeoPoint, radius_nm: f64) -> Vec<Neighbor<'_, Airport>> {
        self.airports.within(center, radius_nm)
    }

    /// Airports within `radius_nm`, nearest first.
    pub fn airports_near(&self, center: &GeoPoint, radius_nm: f64) -> Vec<Neighbor<'_, Airport>> {
        self.airports.nearest(center, radius_nm)
    }

    pub fn fixes_within(&self, center: &GeoPoint, radius_nm: f64) -> Vec<Neighbor<'_, Fix>> {
        self.fixes.within(center, radius_nm)
    }

    pub fn navaids_within(&self, center: &GeoPoint, radius_nm: f64) -> Vec<Neighbor<'_, Navaid>> {
        self.navaids.within(center, radius_nm)
    }
}
