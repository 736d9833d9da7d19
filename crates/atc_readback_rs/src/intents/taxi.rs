use std::collections::BTreeMap;

use aviation_helper_rs::clearance::intent::ParsedIntent;

use super::{Positioned, phrase_at, runway::read_designator};
use crate::vocabulary::taxiway_letter;

/// Words that end the designator list of a crossing clearance.
fn is_cross_stop(word: &str) -> bool {
    matches!(
        word,
        "CONTINUE" | "HOLD" | "VIA" | "THEN" | "TAXI" | "TO" | "SHORT" | "CONTACT" | "MONITOR"
    )
}

/// A taxiway named by exactly one letter.
fn single_letter(word: Option<&String>) -> Option<char> {
    word.and_then(|w| taxiway_letter(w))
}

fn is_ground_context(tokens: &[String]) -> bool {
    tokens
        .iter()
        .any(|t| matches!(t.as_str(), "TAXI" | "CROSS" | "CONTINUE"))
}

fn read_crossings(tokens: &[String], start: usize) -> (Vec<String>, usize) {
    let mut runways = Vec::new();
    let mut idx = start;
    while let Some(tok) = tokens.get(idx) {
        if is_cross_stop(tok) {
            break;
        }
        if matches!(tok.as_str(), "AND" | "RUNWAY" | "RUNWAYS" | "RWY") {
            idx += 1;
            continue;
        }
        match read_designator(tokens, idx) {
            Some((designator, end)) => {
                if !runways.contains(&designator) {
                    runways.push(designator);
                }
                idx = end;
            }
            None => break,
        }
    }
    (runways, idx)
}

pub fn extract_taxi(tokens: &[String]) -> Vec<Positioned> {
    let ground = is_ground_context(tokens);
    let mut out = Vec::new();
    let mut idx = 0;
    while idx < tokens.len() {
        if phrase_at(tokens, idx, &["TAXI", "TO", "RUNWAY"]) {
            let designator = read_designator(tokens, idx + 3);
            out.push((
                idx,
                ParsedIntent::TaxiToRunway {
                    runway: designator.as_ref().map(|(d, _)| d.clone()),
                    validated: None,
                },
            ));
            idx = designator.map_or(idx + 3, |(_, end)| end);
            continue;
        }

        if phrase_at(tokens, idx, &["CROSS", "RUNWAY"]) || phrase_at(tokens, idx, &["CROSS", "RUNWAYS"]) {
            let (runways, end) = read_crossings(tokens, idx + 2);
            if !runways.is_empty() {
                out.push((
                    idx,
                    ParsedIntent::CrossRunway {
                        runways,
                        validated: BTreeMap::new(),
                    },
                ));
            }
            idx = end.max(idx + 2);
            continue;
        }

        if phrase_at(tokens, idx, &["CONTINUE", "ON"]) || phrase_at(tokens, idx, &["PROCEED", "ON"]) {
            if let Some(letter) = single_letter(tokens.get(idx + 2)) {
                out.push((
                    idx,
                    ParsedIntent::ContinueTaxi {
                        taxiway: Some(letter),
                    },
                ));
                idx += 3;
                continue;
            }
        }

        if phrase_at(tokens, idx, &["CONTINUE", "TAXI"]) {
            out.push((idx, ParsedIntent::ContinueTaxi { taxiway: None }));
            idx += 2;
            continue;
        }

        if ground && tokens[idx] == "VIA" {
            if let Some(letter) = single_letter(tokens.get(idx + 1)) {
                out.push((idx, ParsedIntent::ViaTaxiway { taxiway: letter }));
                idx += 2;
                continue;
            }
        }
        idx += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::scan_tokens;

    fn taxi(text: &str) -> Vec<ParsedIntent> {
        extract_taxi(&scan_tokens(text))
            .into_iter()
            .map(|(_, intent)| intent)
            .collect()
    }

    #[test]
    fn test_taxi_to_runway_via() {
        assert_eq!(
            taxi("TAXI TO RUNWAY 16L VIA B"),
            vec![
                ParsedIntent::TaxiToRunway {
                    runway: Some("16L".to_owned()),
                    validated: None,
                },
                ParsedIntent::ViaTaxiway { taxiway: 'B' },
            ]
        );
    }

    #[test]
    fn test_cross_runways() {
        let intents = taxi("cross runways one six left and one six center, continue on bravo");
        assert_eq!(
            intents,
            vec![
                ParsedIntent::CrossRunway {
                    runways: vec!["16L".to_owned(), "16C".to_owned()],
                    validated: BTreeMap::new(),
                },
                ParsedIntent::ContinueTaxi {
                    taxiway: Some('B')
                },
            ]
        );
    }

    #[test]
    fn test_cross_stops_at_stop_word() {
        assert_eq!(
            taxi("CROSS RUNWAY 27 & 9 HOLD SHORT 4"),
            vec![ParsedIntent::CrossRunway {
                runways: vec!["27".to_owned(), "09".to_owned()],
                validated: BTreeMap::new(),
            }]
        );
        assert!(taxi("CROSS RUNWAY THEN TAXI").is_empty());
    }

    #[test]
    fn test_continue_taxi() {
        assert_eq!(
            taxi("CONTINUE TAXI"),
            vec![ParsedIntent::ContinueTaxi { taxiway: None }]
        );
        assert_eq!(
            taxi("PROCEED ON C"),
            vec![ParsedIntent::ContinueTaxi {
                taxiway: Some('C')
            }]
        );
        assert!(taxi("CONTINUE ON GEP").is_empty());
    }

    #[test]
    fn test_via_needs_ground_context() {
        assert!(taxi("CLEARED TO KPDX VIA V").is_empty());
        assert!(taxi("TAXI RAMP VIA B2").is_empty());
    }
}
