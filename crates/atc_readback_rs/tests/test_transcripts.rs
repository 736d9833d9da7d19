//! End-to-end runs of the engine over a small reference data directory.
//!
//! Cases live in the RON index next to the crate resources; each names the
//! transcript, where it was heard, and what the engine should make of it.

use std::{
    collections::HashMap,
    fs,
    sync::{Arc, LazyLock},
    thread,
};

use atc_readback_rs::{
    Engine, Position, RunwayValidation, SharedEngine,
    confidence::Field,
    normalizer::normalize,
    observer::{PipelineEvent, RecordingObserver},
};
use aviation_helper_rs::{
    clearance::intent::ParsedIntent,
    reference::{EntityType, ReferenceStore},
};
use proptest::prelude::*;
use serde::Deserialize;
use serde_json::json;

static STORE: LazyLock<Arc<ReferenceStore>> = LazyLock::new(|| Arc::new(load_store()));

static ENGINE: LazyLock<Engine> = LazyLock::new(|| Engine::new(STORE.clone()));

static TEST_TRANSCRIPTS_INDEX: LazyLock<TestTranscriptsIndex> =
    LazyLock::new(TestTranscriptsIndex::load_from_file);

fn load_store() -> ReferenceStore {
    let dir = tempfile::tempdir().expect("Failed to create data dir");
    let airports = json!([
        {
            "id": "KTST",
            "icao": "KTST",
            "name": "Test Regional",
            "latitude": 45.0,
            "longitude": -120.0,
            "elevation_ft": 420,
            "runways": ["06L/24R", "06R/24L"],
            "frequencies": { "tower": ["118.300"], "ground": ["121.900"] }
        },
        {
            "id": "2S9",
            "name": "Grass Strip",
            "latitude": 45.3,
            "longitude": -120.2
        }
    ]);
    let fixes = json!([
        { "id": "GEPPE", "latitude": 45.05, "longitude": -119.95 },
        { "id": "BTG", "latitude": 45.4, "longitude": -120.5 },
        { "id": "", "latitude": 45.0, "longitude": -120.0 }
    ]);
    fs::write(dir.path().join("airports.json"), airports.to_string())
        .expect("Failed to write airports");
    fs::write(dir.path().join("fixes.json"), fixes.to_string()).expect("Failed to write fixes");
    ReferenceStore::load_from_dir(dir.path())
}

#[derive(Debug, Deserialize)]
struct TestTranscript {
    text: String,
    lat: f64,
    lon: f64,
    accuracy_m: Option<f64>,
    runway_validated: Option<bool>,
    intents: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TestTranscriptsIndex {
    entries: HashMap<String, TestTranscript>,
}

impl TestTranscriptsIndex {
    fn load_from_file() -> Self {
        let content = std::fs::read_to_string(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/test-transcripts/index.ron"
        ))
        .expect("Failed to read test transcripts index");

        ron::from_str(&content).expect("Failed to parse test transcripts index")
    }
}

fn run(name: &str) -> atc_readback_rs::ReadbackResult {
    let entry = &TEST_TRANSCRIPTS_INDEX.entries[name];
    let result = ENGINE.process(
        &entry.text,
        &Position::new(entry.lat, entry.lon),
        entry.accuracy_m,
    );
    println!("{name}: {}", serde_json::to_string(&result).unwrap());

    assert_eq!(result.runway_validated(), entry.runway_validated, "{name}");
    let kinds: Vec<&str> = result.intents.iter().map(ParsedIntent::kind).collect();
    for expected in &entry.intents {
        assert!(kinds.contains(&expected.as_str()), "{name}: missing {expected} in {kinds:?}");
    }
    result
}

#[test]
fn test_store_skips_bad_rows() {
    let counts = STORE.counts();
    assert_eq!(counts["airports"], 2);
    assert_eq!(counts["fixes"], 2);
}

#[test]
fn test_every_indexed_transcript() {
    let mut names: Vec<_> = TEST_TRANSCRIPTS_INDEX.entries.keys().collect();
    names.sort();
    for name in names {
        let result = run(name);
        assert!((0.0..=0.99).contains(&result.overall_confidence), "{name}");
    }
}

#[test]
fn test_impossible_runway_is_flagged() {
    let result = run("landing_impossible");
    assert_eq!(
        result.runway_validation,
        Some(RunwayValidation::NotFound {
            airport: "KTST".to_owned()
        })
    );
    assert_eq!(
        result.intents[0].runways(),
        vec!["99"],
        "the designator is kept as spoken"
    );
    let confirmed = run("landing_confirmed");
    assert!(result.overall_confidence < confirmed.overall_confidence);
    assert!(result.field_confidence[&Field::Runway] < confirmed.field_confidence[&Field::Runway]);
}

#[test]
fn test_far_from_airports_is_indeterminate() {
    let result = run("landing_far");
    assert!(matches!(
        result.runway_validation,
        Some(RunwayValidation::Indeterminate { .. })
    ));
}

#[test]
fn test_taxi_crossing_carries_verdicts() {
    let result = run("taxi_and_cross");
    let crossing = result
        .intents
        .iter()
        .find_map(|intent| match intent {
            ParsedIntent::CrossRunway { validated, .. } => Some(validated.clone()),
            _ => None,
        })
        .expect("No crossing read");
    assert_eq!(crossing.get("06R"), Some(&Some(true)));
    assert!(result.intents.iter().any(|intent| matches!(
        intent,
        ParsedIntent::TaxiToRunway {
            validated: Some(true),
            ..
        }
    )));
}

#[test]
fn test_clearance_snaps_route_fix() {
    let result = run("clearance_delivery");
    let snap = result
        .snap_events
        .iter()
        .find(|event| event.original == "GEPPI")
        .expect("GEPPI was not snapped");
    assert_eq!(snap.replacement, "GEPPE");
    assert_eq!(snap.entity_type, EntityType::Fix);
    assert!(snap.confidence < 1.0);

    let clearance = result
        .intents
        .iter()
        .find_map(|intent| match intent {
            ParsedIntent::PartialIfrClearance(clearance) => Some(clearance),
            _ => None,
        })
        .expect("No clearance read");
    assert_eq!(clearance.clearance_limit.as_deref(), Some("KTST"));
    assert_eq!(clearance.route, vec!["GEPPE"]);
    assert_eq!(clearance.squawk.map(|s| s.to_string()).as_deref(), Some("4321"));
    assert!(result.normalized_text.contains("GEPPE"));
}

#[test]
fn test_observer_sees_pipeline() {
    let observer = RecordingObserver::new();
    let engine = Engine::new(STORE.clone()).with_observer(Arc::new(observer.clone()));
    let entry = &TEST_TRANSCRIPTS_INDEX.entries["clearance_delivery"];
    engine.process(&entry.text, &Position::new(entry.lat, entry.lon), entry.accuracy_m);
    let events = observer.take();
    assert!(
        events
            .iter()
            .any(|e| matches!(e, PipelineEvent::Snap(snap) if snap.replacement == "GEPPE"))
    );
}

#[test]
fn test_shared_engine_across_threads() {
    let shared = Arc::new(SharedEngine::new(Engine::new(STORE.clone())));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                shared
                    .process(
                        "cleared to land runway two four left",
                        &Position::new(45.0, -120.0),
                        Some(10.0),
                    )
                    .runway_validated()
            })
        })
        .collect();
    shared.reload(ReferenceStore::empty());
    for handle in handles {
        let verdict = handle.join().unwrap();
        assert!(verdict == Some(true) || verdict.is_none());
    }
    let after = shared.process(
        "cleared to land runway two four left",
        &Position::new(45.0, -120.0),
        Some(10.0),
    );
    assert_eq!(after.runway_validated(), None);
}

#[test]
fn test_normalize_keeps_designators() {
    let normalized = normalize("Runway two seven left, cleared to land");
    assert_eq!(normalized.normalized_text, "RUNWAY 27L CLEARED TO LAND");
    assert_eq!(normalized.tokens.len(), 7);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_process_is_deterministic(
        words in prop::collection::vec(
            prop::sample::select(vec![
                "cleared", "to", "land", "runway", "two", "four", "left", "niner", "taxi",
                "via", "alpha", "cross", "hold", "short", "contact", "tower", "one", "point",
                "squawk", "climb", "maintain", "thousand", "GEPPI", "KTST", "roger",
            ]),
            0..16,
        ),
        lat in 44.5f64..45.5,
        lon in -120.5f64..-119.5,
    ) {
        let text = words.join(" ");
        let position = Position::new(lat, lon);
        let first = ENGINE.process(&text, &position, Some(25.0));
        let second = ENGINE.process(&text, &position, Some(25.0));
        prop_assert_eq!(&first, &second);
        prop_assert!((0.0..=0.99).contains(&first.overall_confidence));
        for confidence in first.field_confidence.values() {
            prop_assert!((0.0..=0.99).contains(confidence));
        }
    }
}
