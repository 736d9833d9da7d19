use std::{
    io::{self, BufRead},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context;
use atc_readback_rs::{
    Engine, EngineConfig, Position,
    observer::{PipelineObserver, RecordingObserver},
};
use aviation_helper_rs::reference::ReferenceStore;
use chrono::Utc;
use clap::Parser;

/// Reads ATC transcripts into structured, validated instructions.
///
/// Each transcript is printed back as one JSON result. Without a transcript
/// argument, every line of stdin is processed.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Transcript to process
    transcript: Option<String>,

    /// Listener latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Listener longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Horizontal GPS accuracy in meters
    #[arg(long, value_name = "METERS")]
    accuracy: Option<f64>,

    /// Listener altitude in feet
    #[arg(long, value_name = "FEET")]
    altitude: Option<f64>,

    /// Directory holding the reference JSON tables
    #[arg(long, env = "ATC_DATA_DIR", value_name = "PATH")]
    data_dir: PathBuf,

    /// Engine configuration in RON, defaults to the built-in tuning
    #[arg(long, env = "ATC_ENGINE_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Also print every repair, snap and runway check
    #[arg(short, long)]
    verbose: bool,
}

fn load_engine(args: &Args) -> anyhow::Result<(Engine, Option<RecordingObserver>)> {
    let store = ReferenceStore::load_from_dir(&args.data_dir);
    if store.is_empty() {
        log::warn!("No airports, fixes or navaids loaded, nothing will be validated");
    }
    if let Some(manifest) = store.manifest() {
        let today = Utc::now().date_naive();
        if !manifest.is_current(today) {
            log::warn!(
                "Reference data cycle {} is {} days old",
                manifest.faa_cycle,
                manifest.cycle_age_days(today)
            );
        }
    }

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let engine = Engine::with_config(Arc::new(store), config).context("Invalid engine config")?;
    if args.verbose {
        let observer = RecordingObserver::new();
        let shared: Arc<dyn PipelineObserver> = Arc::new(observer.clone());
        return Ok((engine.with_observer(shared), Some(observer)));
    }
    Ok((engine, None))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let (engine, recorder) = load_engine(&args)?;
    let position = Position {
        altitude_ft: args.altitude,
        timestamp: Some(Utc::now()),
        ..Position::new(args.lat, args.lon)
    };

    let process = |transcript: &str| -> anyhow::Result<()> {
        let result = engine.process(transcript, &position, args.accuracy);
        if let Some(recorder) = &recorder {
            for event in recorder.take() {
                print_json(&event, args.pretty)?;
            }
        }
        print_json(&result, args.pretty)
    };

    match &args.transcript {
        Some(transcript) => process(transcript)?,
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("Failed to read stdin")?;
                if !line.trim().is_empty() {
                    process(&line)?;
                }
            }
        }
    }
    Ok(())
}
