//! Partial IFR clearances (CRAFT) read from a delivery or squawk transmission.

use aviation_helper_rs::{
    clearance::intent::{IfrClearance, ParsedIntent},
    types::{altitude::Altitude, frequency::Frequency, squawk::Squawk},
};

use super::{
    Positioned, altitude::read_altitude, contains_phrase, frequency::read_frequency, phrase_at,
    runway::has_runway_phrase,
};
use crate::vocabulary::{is_decimal_number, is_vocabulary, read_number};

/// Words that end a route.
fn is_clause_keyword(word: &str) -> bool {
    matches!(
        word,
        "CLIMB"
            | "DESCEND"
            | "MAINTAIN"
            | "EXPECT"
            | "SQUAWK"
            | "DEPARTURE"
            | "CONTACT"
            | "FREQUENCY"
            | "CLEARED"
            | "TO"
    )
}

fn position_of(tokens: &[String], word: &str) -> Option<usize> {
    tokens.iter().position(|t| t == word)
}

/// `CLEARED TO <dest>` where the destination is not `LAND`.
fn has_cleared_to_destination(tokens: &[String]) -> bool {
    (0..tokens.len()).any(|idx| {
        phrase_at(tokens, idx, &["CLEARED", "TO"])
            && tokens
                .get(idx + 2)
                .is_some_and(|dest| dest != "LAND" && !is_vocabulary(dest))
    })
}

/// The token after the first bare `TO` that can name a place.
fn read_clearance_limit(tokens: &[String]) -> Option<String> {
    tokens.iter().enumerate().find_map(|(idx, tok)| {
        if tok != "TO" {
            return None;
        }
        let mut next = idx + 1;
        if tokens.get(next).is_some_and(|t| t == "THE") {
            next += 1;
        }
        let limit = tokens.get(next)?;
        let is_place = !is_vocabulary(limit) && !is_decimal_number(limit);
        is_place.then(|| limit.clone())
    })
}

fn read_route(tokens: &[String]) -> Vec<String> {
    let Some(via) = position_of(tokens, "VIA") else {
        return Vec::new();
    };
    let mut route = Vec::new();
    for tok in &tokens[via + 1..] {
        if matches!(tok.as_str(), "THEN" | "AND" | "THE") {
            continue;
        }
        if is_decimal_number(tok) || is_clause_keyword(tok) {
            break;
        }
        route.push(tok.clone());
    }
    route
}

fn read_squawk(tokens: &[String]) -> Option<Squawk> {
    tokens.iter().enumerate().find_map(|(idx, tok)| {
        if tok != "SQUAWK" {
            return None;
        }
        let (code, _) = read_number(tokens, idx + 1)?;
        code.parse().ok()
    })
}

fn read_initial_altitude(tokens: &[String]) -> Option<Altitude> {
    tokens.iter().enumerate().find_map(|(idx, tok)| {
        if !matches!(tok.as_str(), "CLIMB" | "MAINTAIN") {
            return None;
        }
        let mut start = idx + 1;
        while tokens
            .get(start)
            .is_some_and(|t| matches!(t.as_str(), "AND" | "MAINTAIN" | "TO"))
        {
            start += 1;
        }
        read_altitude(tokens, start).map(|(altitude, _)| altitude)
    })
}

/// `DEPARTURE [FREQUENCY|ON] <freq>`
fn read_departure_frequency(tokens: &[String]) -> Option<Frequency> {
    tokens.iter().enumerate().find_map(|(idx, tok)| {
        if tok != "DEPARTURE" {
            return None;
        }
        let mut next = idx + 1;
        if tokens
            .get(next)
            .is_some_and(|t| matches!(t.as_str(), "FREQUENCY" | "ON"))
        {
            next += 1;
        }
        read_frequency(tokens, next).map(|(frequency, _)| frequency)
    })
}

pub fn extract_clearance(tokens: &[String]) -> Vec<Positioned> {
    let cleared = position_of(tokens, "CLEARED");
    let clearance = position_of(tokens, "CLEARANCE");
    let trigger = match (cleared, clearance) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) | (None, Some(a)) => a,
        (None, None) => match position_of(tokens, "SQUAWK") {
            Some(squawk) => squawk,
            None => return Vec::new(),
        },
    };

    let squawk = read_squawk(tokens);
    let tower_phrase = has_runway_phrase(tokens) || contains_phrase(tokens, &["LINE", "UP"]);
    if tower_phrase && !(squawk.is_some() && has_cleared_to_destination(tokens)) {
        log::debug!("Tower phrase present, no clearance extracted");
        return Vec::new();
    }

    let clearance = IfrClearance {
        clearance_limit: read_clearance_limit(tokens),
        route: read_route(tokens),
        initial_altitude: read_initial_altitude(tokens),
        squawk,
        departure_frequency: read_departure_frequency(tokens),
    };
    if clearance.is_empty() {
        return Vec::new();
    }
    vec![(trigger, ParsedIntent::PartialIfrClearance(clearance))]
}
