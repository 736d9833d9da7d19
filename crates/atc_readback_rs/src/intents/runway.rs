use aviation_helper_rs::{
    clearance::intent::{ParsedIntent, RunwayOperation},
    types::runway::pad_designator,
};

use super::{Positioned, phrase_at};
use crate::vocabulary::{is_designator_token, is_numeric, side_letter};

pub(crate) const RUNWAY_PHRASES: &[(&[&str], RunwayOperation)] = &[
    (&["LINE", "UP", "AND", "WAIT"], RunwayOperation::LineUpAndWait),
    (&["LINEUP", "AND", "WAIT"], RunwayOperation::LineUpAndWait),
    (&["CLEARED", "FOR", "TAKEOFF"], RunwayOperation::ClearedTakeoff),
    (&["CLEARED", "FOR", "TAKE", "OFF"], RunwayOperation::ClearedTakeoff),
    (&["CLEARED", "TAKEOFF"], RunwayOperation::ClearedTakeoff),
    (&["HOLD", "SHORT"], RunwayOperation::HoldShort),
    (&["HOLD", "RUNWAY"], RunwayOperation::HoldShort),
    (&["CLEARED", "TO", "LAND"], RunwayOperation::ClearedLand),
    (&["CLEARED", "LAND"], RunwayOperation::ClearedLand),
];

/// Words tolerated between a phrase and its designator.
fn is_filler(word: &str) -> bool {
    matches!(
        word,
        "OR" | "ROOM" | "ONLY" | "UH" | "UM" | "THE" | "AND" | "OF" | "RUNWAY" | "RUNWAYS" | "RWY"
    )
}

/// Assembles a designator starting at `start`.
///
/// Leading fillers are skipped, then up to two digits are collected across
/// tokens (`9 9` is `99`, `0 9` is `09`), then an optional side. The result
/// is padded to two digits but not range checked. Returns the designator and
/// the index after its last token.
pub(crate) fn read_designator(tokens: &[String], start: usize) -> Option<(String, usize)> {
    let mut idx = start;
    while tokens.get(idx).is_some_and(|t| is_filler(t)) {
        idx += 1;
    }

    let mut digits = String::new();
    let mut side = None;
    while let Some(tok) = tokens.get(idx) {
        if is_numeric(tok) && digits.len() + tok.len() <= 2 {
            digits.push_str(tok);
            idx += 1;
            continue;
        }
        // a folded designator such as 27L ends the run
        if is_designator_token(tok) && !is_numeric(tok) {
            let number = &tok[..tok.len() - 1];
            if digits.len() + number.len() <= 2 {
                digits.push_str(number);
                side = tok.chars().last();
                idx += 1;
            }
        }
        break;
    }
    if digits.is_empty() {
        return None;
    }

    if side.is_none() {
        if let Some(letter) = tokens.get(idx).and_then(|t| side_letter(t)) {
            side = Some(letter);
            idx += 1;
        }
    }
    if let Some(side) = side {
        digits.push(side);
    }
    Some((pad_designator(&digits), idx))
}

pub fn extract_runway_operations(tokens: &[String]) -> Vec<Positioned> {
    let mut out = Vec::new();
    let mut idx = 0;
    while idx < tokens.len() {
        let phrase = RUNWAY_PHRASES
            .iter()
            .find(|(phrase, _)| phrase_at(tokens, idx, phrase));
        if let Some((phrase, operation)) = phrase {
            let after = idx + phrase.len();
            let designator = read_designator(tokens, after);
            out.push((
                idx,
                ParsedIntent::RunwayOperation {
                    operation: *operation,
                    runway: designator.as_ref().map(|(d, _)| d.clone()),
                },
            ));
            idx = designator.map_or(after, |(_, end)| end);
            continue;
        }

        // HOLD 27L, but HOLD AT <fix> is an IFR hold
        if tokens[idx] == "HOLD" && tokens.get(idx + 1).is_some_and(|t| t != "AT") {
            if let Some((designator, end)) = read_designator(tokens, idx + 1) {
                out.push((
                    idx,
                    ParsedIntent::RunwayOperation {
                        operation: RunwayOperation::HoldShort,
                        runway: Some(designator),
                    },
                ));
                idx = end;
                continue;
            }
        }
        idx += 1;
    }
    out
}

/// Whether the transmission carries any tower runway phrase.
pub(crate) fn has_runway_phrase(tokens: &[String]) -> bool {
    !extract_runway_operations(tokens).is_empty()
}
