//! Engine tuning, loadable from RON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapperConfig {
    pub airport_radius_nm: f64,
    pub fix_radius_nm: f64,
    pub navaid_radius_nm: f64,
    /// Weighted score a candidate needs to be snapped.
    pub min_confidence: f32,
    /// Flat bonus when one identifier is a prefix of the other.
    pub prefix_bonus: f32,
    /// Distance weight at the edge of the search radius.
    pub distance_weight_floor: f32,
    pub min_token_len: usize,
    pub max_token_len: usize,
}

impl Default for SnapperConfig {
    fn default() -> Self {
        Self {
            airport_radius_nm: 80.0,
            fix_radius_nm: 150.0,
            navaid_radius_nm: 150.0,
            min_confidence: 0.6,
            prefix_bonus: 0.1,
            distance_weight_floor: 0.5,
            min_token_len: 2,
            max_token_len: 5,
        }
    }
}

/// Search radius around the listener, widened as GPS accuracy degrades.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct RadiusPolicy {
    pub base_nm: f64,
    pub cap_nm: f64,
}

/// Accuracy no worse than `max_accuracy_m` widens the base radius by `extra_nm`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct AccuracyStep {
    pub max_accuracy_m: f64,
    pub extra_nm: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub ground: RadiusPolicy,
    pub landing: RadiusPolicy,
    /// Checked in order; accuracy worse than the last step uses the cap.
    pub accuracy_steps: Vec<AccuracyStep>,
    pub ground_gate_max_nm: f64,
    pub ground_gate_base_nm: f64,
    pub ground_gate_accuracy_factor: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            ground: RadiusPolicy {
                base_nm: 3.0,
                cap_nm: 8.0,
            },
            landing: RadiusPolicy {
                base_nm: 10.0,
                cap_nm: 20.0,
            },
            accuracy_steps: vec![
                AccuracyStep {
                    max_accuracy_m: 20.0,
                    extra_nm: 0.0,
                },
                AccuracyStep {
                    max_accuracy_m: 100.0,
                    extra_nm: 2.0,
                },
                AccuracyStep {
                    max_accuracy_m: 500.0,
                    extra_nm: 5.0,
                },
            ],
            ground_gate_max_nm: 2.0,
            ground_gate_base_nm: 0.5,
            ground_gate_accuracy_factor: 2.0,
        }
    }
}

/// Splits a token the recognizer glued together, e.g. `80010 MINUTES`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AsrSplitRule {
    /// Regex matched against a whole token.
    pub token_pattern: String,
    /// Only split when the next token equals this word.
    #[serde(default)]
    pub followed_by: Option<String>,
    /// Replacement with `$n` capture references.
    pub replacement: String,
}

pub fn default_asr_splits() -> Vec<AsrSplitRule> {
    vec![AsrSplitRule {
        token_pattern: r"^([1-9]000)([1-9][0-9]?)$".to_owned(),
        followed_by: Some("MINUTES".to_owned()),
        replacement: "$1 $2".to_owned(),
    }]
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub snapper: SnapperConfig,
    pub validator: ValidatorConfig,
    pub asr_splits: Vec<AsrSplitRule>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snapper: SnapperConfig::default(),
            validator: ValidatorConfig::default(),
            asr_splits: default_asr_splits(),
        }
    }
}

impl EngineConfig {
    /// Load engine configuration from a RON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: EngineConfig = ron::from_str(&contents)?;
        Ok(config)
    }

    /// Load the configuration shipped with the crate
    pub fn load_default() -> Result<Self, Error> {
        Self::load_from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/resources/engine_config.ron"
        ))
    }
}
