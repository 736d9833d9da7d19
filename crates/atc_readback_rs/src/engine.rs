//! Runs a transmission through the whole pipeline.

use std::{collections::BTreeMap, sync::Arc};

use aviation_helper_rs::{
    clearance::intent::ParsedIntent,
    geo::GeoPoint,
    reference::ReferenceStore,
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{
    config::EngineConfig,
    confidence::{self, ConfidenceInputs, Field},
    errors::Error,
    intents::extract_intents,
    normalizer::{Span, normalize},
    observer::{LogObserver, PipelineObserver},
    repair::{AsrSplitter, RepairKind, repair_landing_clearance, repair_taxiway_via},
    snapper::{SnapEvent, snap},
    validator::{RunwayContext, RunwayValidation, validate_runway},
};

/// Where the listener is when the transmission is heard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub altitude_ft: Option<f64>,
    pub track_deg: Option<f64>,
    pub ground_speed_kt: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            ..Default::default()
        }
    }

    pub fn geo_point(&self) -> GeoPoint {
        let point = GeoPoint::new(self.lat, self.lon);
        match self.altitude_ft {
            Some(altitude) => point.with_altitude(altitude),
            None => point,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadbackResult {
    pub normalized_text: String,
    pub repairs: Vec<RepairKind>,
    pub snap_events: Vec<SnapEvent>,
    pub intents: Vec<ParsedIntent>,
    pub overall_confidence: f32,
    pub field_confidence: BTreeMap<Field, f32>,
    pub uncertain_spans: Vec<Span>,
    pub runway_validation: Option<RunwayValidation>,
}

impl ReadbackResult {
    /// `Some(true)` confirmed, `Some(false)` impossible, `None` unknown.
    pub fn runway_validated(&self) -> Option<bool> {
        self.runway_validation
            .as_ref()
            .and_then(RunwayValidation::as_option)
    }
}

/// The readback pipeline bound to one reference store.
#[derive(Clone)]
pub struct Engine {
    store: Arc<ReferenceStore>,
    config: EngineConfig,
    splitter: AsrSplitter,
    observer: Arc<dyn PipelineObserver>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("store", &self.store.counts())
            .field("config", &self.config)
            .finish()
    }
}

impl Engine {
    pub fn new(store: Arc<ReferenceStore>) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
            splitter: AsrSplitter::default(),
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_config(store: Arc<ReferenceStore>, config: EngineConfig) -> Result<Self, Error> {
        let splitter = AsrSplitter::new(&config.asr_splits)?;
        Ok(Self {
            store,
            config,
            splitter,
            observer: Arc::new(LogObserver),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Same configuration and observer over another store.
    pub fn with_store(&self, store: Arc<ReferenceStore>) -> Self {
        Self {
            store,
            ..self.clone()
        }
    }

    pub fn store(&self) -> &ReferenceStore {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn repair(&self, text: String) -> (String, Vec<RepairKind>) {
        let mut text = text;
        let mut applied = Vec::new();
        for kind in [
            RepairKind::LandingClearance,
            RepairKind::TaxiwayVia,
            RepairKind::MergedNumber,
        ] {
            let repaired = match kind {
                RepairKind::LandingClearance => repair_landing_clearance(&text),
                RepairKind::TaxiwayVia => repair_taxiway_via(&text),
                RepairKind::MergedNumber => self.splitter.repair(&text),
            };
            if let Some(repaired) = repaired {
                self.observer.repair_applied(kind, &text, &repaired);
                applied.push(kind);
                text = repaired;
            }
        }
        (text, applied)
    }

    fn validate(
        &self,
        context: RunwayContext,
        runway: &str,
        position: &GeoPoint,
        accuracy_m: Option<f64>,
    ) -> RunwayValidation {
        let validation = validate_runway(
            context,
            runway,
            position,
            accuracy_m,
            &self.store,
            &self.config.validator,
        );
        self.observer.runway_validated(runway, &validation);
        validation
    }

    /// Validates every named runway. Taxi and crossing intents carry their
    /// own verdicts; the first verdict is the transmission's.
    fn validate_runways(
        &self,
        intents: &mut [ParsedIntent],
        position: &GeoPoint,
        accuracy_m: Option<f64>,
    ) -> Option<RunwayValidation> {
        let mut first = None;
        for intent in intents.iter_mut() {
            match intent {
                ParsedIntent::RunwayOperation {
                    operation,
                    runway: Some(runway),
                } => {
                    let validation = self.validate((*operation).into(), runway, position, accuracy_m);
                    first.get_or_insert(validation);
                }
                ParsedIntent::TaxiToRunway {
                    runway: Some(runway),
                    validated,
                } => {
                    let validation = self.validate(RunwayContext::Ground, runway, position, accuracy_m);
                    *validated = validation.as_option();
                    first.get_or_insert(validation);
                }
                ParsedIntent::CrossRunway { runways, validated } => {
                    for runway in runways.iter() {
                        let validation = self.validate(RunwayContext::Ground, runway, position, accuracy_m);
                        validated.insert(runway.clone(), validation.as_option());
                        first.get_or_insert(validation);
                    }
                }
                ParsedIntent::RunwayOperation { runway: None, .. }
                | ParsedIntent::TaxiToRunway { runway: None, .. }
                | ParsedIntent::ContinueTaxi { .. }
                | ParsedIntent::ViaTaxiway { .. }
                | ParsedIntent::AltitudeChange { .. }
                | ParsedIntent::FrequencyChange { .. }
                | ParsedIntent::PartialIfrClearance(_) => {}
            }
        }
        first
    }

    /// Never fails: missing data only lowers confidence.
    pub fn process(&self, transcript: &str, position: &Position, accuracy_m: Option<f64>) -> ReadbackResult {
        let point = position.geo_point();
        let normalized = normalize(transcript);
        let (repaired, repairs) = self.repair(normalized.normalized_text.clone());

        let outcome = snap(&normalized.folded, &self.store, &point, &self.config.snapper);
        for event in &outcome.events {
            self.observer.token_snapped(event);
        }
        let text = apply_snaps(&repaired, &outcome.events);

        let mut intents = extract_intents(&text);
        let runway_validation = self.validate_runways(&mut intents, &point, accuracy_m);

        let inputs = ConfidenceInputs {
            intents: &intents,
            snap_events: &outcome.events,
            runway_validation: runway_validation.as_ref(),
            uncertain_fields: outcome.uncertain.len(),
            lookup: self.store.as_ref(),
        };
        let overall_confidence = confidence::score(&inputs);
        let field_confidence = confidence::field_confidence(&inputs);
        log::debug!(
            "Processed {transcript:?}: {} intents, confidence {overall_confidence:.2}",
            intents.len()
        );

        ReadbackResult {
            normalized_text: text,
            repairs,
            snap_events: outcome.events,
            intents,
            overall_confidence,
            field_confidence,
            uncertain_spans: outcome.uncertain,
            runway_validation,
        }
    }
}

/// Replaces every whole word a snap event resolved.
fn apply_snaps(text: &str, events: &[SnapEvent]) -> String {
    if events.is_empty() {
        return text.to_owned();
    }
    text.split_whitespace()
        .map(|word| {
            events
                .iter()
                .find(|e| e.original == word)
                .map_or(word, |e| e.replacement.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The current engine, replaced wholesale when reference data is reloaded.
///
/// Callers hold the `Arc<Engine>` they got for the duration of a call, so a
/// reload never changes the store under a running `process`.
#[derive(Debug)]
pub struct SharedEngine {
    current: RwLock<Arc<Engine>>,
}

impl SharedEngine {
    pub fn new(engine: Engine) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
        }
    }

    pub fn current(&self) -> Arc<Engine> {
        self.current.read().clone()
    }

    /// Publishes an engine over `store`. The store must be fully built.
    pub fn reload(&self, store: ReferenceStore) {
        let next = Arc::new(self.current().with_store(Arc::new(store)));
        log::info!("Reference store reloaded: {:?}", next.store().counts());
        *self.current.write() = next;
    }

    pub fn process(&self, transcript: &str, position: &Position, accuracy_m: Option<f64>) -> ReadbackResult {
        self.current().process(transcript, position, accuracy_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{PipelineEvent, RecordingObserver};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_shareable() {
        assert_send_sync::<Engine>();
        assert_send_sync::<SharedEngine>();
        assert_send_sync::<ReferenceStore>();
    }

    #[test]
    fn test_empty_store() {
        let engine = Engine::new(Arc::new(ReferenceStore::empty()));
        let result = engine.process(
            "cleared to land runway two seven left",
            &Position::new(47.0, -122.0),
            None,
        );
        assert_eq!(result.normalized_text, "CLEARED TO LAND RUNWAY 27L");
        assert_eq!(result.intents.len(), 1);
        assert_eq!(result.runway_validated(), None);
        assert!(result.snap_events.is_empty());
        // runway operation, then the unknown verdict
        assert!((result.overall_confidence - 0.52).abs() < 1e-5);
    }

    #[test]
    fn test_empty_transcript() {
        let engine = Engine::new(Arc::new(ReferenceStore::empty()));
        let result = engine.process("", &Position::default(), Some(5.0));
        assert_eq!(result.normalized_text, "");
        assert!(result.intents.is_empty());
        assert_eq!(result.overall_confidence, 0.5);
        assert!(result.runway_validation.is_none());
    }

    #[test]
    fn test_repairs_are_reported() {
        let observer = RecordingObserver::new();
        let engine =
            Engine::new(Arc::new(ReferenceStore::empty())).with_observer(Arc::new(observer.clone()));
        let result = engine.process(
            "taxi to runway one six left of the bravo",
            &Position::default(),
            None,
        );
        assert_eq!(result.repairs, vec![RepairKind::TaxiwayVia]);
        assert_eq!(result.normalized_text, "TAXI TO RUNWAY 16L VIA B");
        let events = observer.take();
        assert!(matches!(
            &events[0],
            PipelineEvent::Repair {
                kind: RepairKind::TaxiwayVia,
                ..
            }
        ));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, PipelineEvent::Runway { runway, .. } if runway == "16L"))
        );
    }

    #[test]
    fn test_bad_split_rule_fails_construction() {
        let mut config = EngineConfig::default();
        config.asr_splits[0].token_pattern = "(".to_owned();
        assert!(Engine::with_config(Arc::new(ReferenceStore::empty()), config).is_err());
    }

    #[test]
    fn test_apply_snaps() {
        let event = SnapEvent {
            original: "GEPPZ".to_owned(),
            replacement: "GEPPS".to_owned(),
            entity_type: aviation_helper_rs::reference::EntityType::Fix,
            confidence: 0.8,
            span: Span::new(0, 5),
        };
        assert_eq!(apply_snaps("DIRECT GEPPZ", &[event]), "DIRECT GEPPS");
        assert_eq!(apply_snaps("DIRECT GEPPZ", &[]), "DIRECT GEPPZ");
    }

    #[test]
    fn test_shared_engine_reload_keeps_in_flight_engine() {
        let shared = SharedEngine::new(Engine::new(Arc::new(ReferenceStore::empty())));
        let before = shared.current();
        shared.reload(ReferenceStore::empty());
        let after = shared.current();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.config(), after.config());
    }
}
