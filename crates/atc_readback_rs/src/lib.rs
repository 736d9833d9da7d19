//! Turns ATC transcripts into structured, validated instructions.
//!
//! ```no_run
//! use std::{path::Path, sync::Arc};
//!
//! use atc_readback_rs::{Engine, Position};
//! use aviation_helper_rs::reference::ReferenceStore;
//!
//! let store = ReferenceStore::load_from_dir(Path::new("data"));
//! let engine = Engine::new(Arc::new(store));
//! let result = engine.process(
//!     "N641CC cleared to land runway two seven left",
//!     &Position::new(45.59, -122.6),
//!     Some(8.0),
//! );
//! println!("{:?} {}", result.runway_validated(), result.overall_confidence);
//! ```

pub mod confidence;
pub mod config;
pub mod engine;
pub mod errors;
pub mod intents;
pub mod normalizer;
pub mod observer;
pub mod repair;
pub mod snapper;
pub mod validator;
pub mod vocabulary;

pub use config::EngineConfig;
pub use engine::{Engine, Position, ReadbackResult, SharedEngine};
pub use errors::Error;
pub use observer::{LogObserver, NoOpObserver, PipelineObserver};
pub use validator::RunwayValidation;
