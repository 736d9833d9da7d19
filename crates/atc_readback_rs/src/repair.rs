//! Narrow rewrites applied to normalized text before intent extraction.
//!
//! Every pass is gated on context, touches as little as possible and returns
//! `Some` only when it changed the text. Running a pass on its own output is
//! a no-op.

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    config::{AsrSplitRule, default_asr_splits},
    errors::Error,
    vocabulary::{is_designator_token, taxiway_letter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "snake_case")]
pub enum RepairKind {
    LandingClearance,
    TaxiwayVia,
    MergedNumber,
}

/// Tokens after the first `TAXI` that the via pass looks at.
const TAXI_WINDOW: usize = 12;

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// `CLEAR FOR LAND RUNWAY 27L` -> `CLEARED TO LAND RUNWAY 27L`.
///
/// Only the first landing phrase is considered; the designator keyword is
/// kept exactly as spoken, or left out when it was.
pub fn repair_landing_clearance(text: &str) -> Option<String> {
    let tokens = words(text);
    let has = |w: &str| tokens.contains(&w);
    if !has("LAND") || !(has("RUNWAY") || has("RWY")) || !(has("CLEAR") || has("CLEARED")) {
        return None;
    }

    let (start, end, keyword, designator) = (0..tokens.len()).find_map(|start| {
        if !matches!(tokens[start], "CLEAR" | "CLEARED") {
            return None;
        }
        let mut idx = start + 1;
        if tokens
            .get(idx)
            .is_some_and(|w| matches!(*w, "YOUR" | "TO" | "FOR"))
        {
            idx += 1;
        }
        if tokens.get(idx) != Some(&"LAND") {
            return None;
        }
        idx += 1;
        let keyword = tokens
            .get(idx)
            .copied()
            .filter(|w| matches!(*w, "RUNWAY" | "RWY"));
        if keyword.is_some() {
            idx += 1;
        }
        let designator = tokens.get(idx).copied().filter(|w| is_designator_token(w))?;
        Some((start, idx + 1, keyword, designator))
    })?;

    let mut canonical = vec!["CLEARED", "TO", "LAND"];
    canonical.extend(keyword);
    canonical.push(designator);
    if tokens[start..end] == canonical[..] {
        return None;
    }

    let mut out: Vec<&str> = tokens[..start].to_vec();
    out.extend(canonical);
    out.extend(&tokens[end..]);
    Some(out.join(" "))
}

/// `TAXI ... OF THE BRAVO` -> `TAXI ... VIA B`.
///
/// Looks at the twelve tokens after the first `TAXI`, or at the rest of the
/// transmission when it contains `TAXI TO`. The window is counted on the
/// rewritten tokens so a second run sees the same window.
pub fn repair_taxiway_via(text: &str) -> Option<String> {
    let tokens = words(text);
    let taxi = tokens.iter().position(|w| *w == "TAXI")?;
    let unbounded = tokens.windows(2).any(|w| w == ["TAXI", "TO"]);

    let mut out: Vec<String> = tokens[..=taxi].iter().map(|w| w.to_string()).collect();
    let mut changed = false;
    let mut seen = 0;
    let mut idx = taxi + 1;
    while idx < tokens.len() {
        if !unbounded && seen >= TAXI_WINDOW {
            out.extend(tokens[idx..].iter().map(|w| w.to_string()));
            break;
        }
        let rest = &tokens[idx..];
        let matched = match rest {
            ["OF", "THE", tw, ..] | ["VIA", "THE", tw, ..] => taxiway_letter(tw).map(|l| (3, l)),
            ["VEE", "AH", tw, ..] => taxiway_letter(tw).map(|l| (3, l)),
            ["THE", tw, ..] => taxiway_letter(tw).map(|l| (2, l)),
            // only a spoken letter needs rewriting after VIA
            ["VIA", tw, ..] if tw.len() > 1 => taxiway_letter(tw).map(|l| (2, l)),
            _ => None,
        };
        match matched {
            Some((consumed, letter)) => {
                out.push("VIA".to_owned());
                out.push(letter.to_string());
                idx += consumed;
                seen += 2;
                changed = true;
            }
            None => {
                out.push(rest[0].to_owned());
                idx += 1;
                seen += 1;
            }
        }
    }

    changed.then(|| out.join(" "))
}

#[derive(Clone)]
struct CompiledSplitRule {
    pattern: Regex,
    followed_by: Option<String>,
    replacement: String,
}

/// Table of ASR merge splits such as `80010 MINUTES` -> `8000 10 MINUTES`.
#[derive(Clone)]
pub struct AsrSplitter {
    rules: Vec<CompiledSplitRule>,
}

impl AsrSplitter {
    pub fn new(rules: &[AsrSplitRule]) -> Result<Self, Error> {
        let rules = rules
            .iter()
            .map(|rule| {
                Ok(CompiledSplitRule {
                    pattern: Regex::new(&rule.token_pattern)?,
                    followed_by: rule.followed_by.as_ref().map(|w| w.to_uppercase()),
                    replacement: rule.replacement.clone(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self { rules })
    }

    pub fn repair(&self, text: &str) -> Option<String> {
        let tokens = words(text);
        let mut changed = false;
        let out: Vec<String> = tokens
            .iter()
            .enumerate()
            .map(|(idx, token)| {
                let next = tokens.get(idx + 1).copied();
                let rule = self.rules.iter().find(|rule| {
                    rule.pattern.is_match(token)
                        && rule.followed_by.as_deref().is_none_or(|w| Some(w) == next)
                });
                match rule {
                    Some(rule) => {
                        let split = rule.pattern.replace(token, rule.replacement.as_str());
                        if split != *token {
                            changed = true;
                        }
                        split.into_owned()
                    }
                    None => token.to_string(),
                }
            })
            .collect();
        changed.then(|| out.join(" "))
    }
}

impl Default for AsrSplitter {
    fn default() -> Self {
        // built-in patterns are literals
        Self::new(&default_asr_splits()).unwrap()
    }
}

impl std::fmt::Debug for AsrSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsrSplitter")
            .field("rules", &self.rules.len())
            .finish()
    }
}
