//! Pipeline events, delivered to an observer injected into the engine.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::{repair::RepairKind, snapper::SnapEvent, validator::RunwayValidation};

/// Receives what the engine did to a transmission.
///
/// Implementations must be `Send + Sync`; one observer is shared by every
/// call on an engine.
pub trait PipelineObserver: Send + Sync {
    fn repair_applied(&self, kind: RepairKind, before: &str, after: &str);

    fn token_snapped(&self, event: &SnapEvent);

    fn runway_validated(&self, runway: &str, validation: &RunwayValidation);
}

/// Forwards every event to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn repair_applied(&self, kind: RepairKind, before: &str, after: &str) {
        log::debug!("Repair {kind}: {before:?} -> {after:?}");
    }

    fn token_snapped(&self, event: &SnapEvent) {
        log::debug!(
            "Snapped {} -> {} ({}, {:.2})",
            event.original,
            event.replacement,
            event.entity_type,
            event.confidence
        );
    }

    fn runway_validated(&self, runway: &str, validation: &RunwayValidation) {
        log::debug!("Runway {runway}: {validation:?}");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl PipelineObserver for NoOpObserver {
    fn repair_applied(&self, _kind: RepairKind, _before: &str, _after: &str) {}

    fn token_snapped(&self, _event: &SnapEvent) {}

    fn runway_validated(&self, _runway: &str, _validation: &RunwayValidation) {}
}

/// One recorded pipeline event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum PipelineEvent {
    Repair {
        kind: RepairKind,
        before: String,
        after: String,
    },
    Snap(SnapEvent),
    Runway {
        runway: String,
        validation: RunwayValidation,
    },
}

/// Keeps every event in memory, for tests and the CLI's verbose output.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<PipelineEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl PipelineObserver for RecordingObserver {
    fn repair_applied(&self, kind: RepairKind, before: &str, after: &str) {
        self.events.lock().push(PipelineEvent::Repair {
            kind,
            before: before.to_owned(),
            after: after.to_owned(),
        });
    }

    fn token_snapped(&self, event: &SnapEvent) {
        self.events.lock().push(PipelineEvent::Snap(event.clone()));
    }

    fn runway_validated(&self, runway: &str, validation: &RunwayValidation) {
        self.events.lock().push(PipelineEvent::Runway {
            runway: runway.to_owned(),
            validation: validation.clone(),
        });
    }
}
