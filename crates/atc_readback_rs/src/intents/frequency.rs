use std::str::FromStr;

use aviation_helper_rs::{
    clearance::intent::ParsedIntent,
    types::frequency::{FacilityType, Frequency},
};

use super::Positioned;
use crate::vocabulary::read_number;

/// Tokens after a trigger that may hold the frequency.
const FREQUENCY_WINDOW: usize = 8;

fn is_trigger(word: &str) -> bool {
    matches!(
        word,
        "CONTACT" | "CHANGE" | "MONITOR" | "SWITCH" | "TRY" | "ON" | "TO"
    )
}

/// A VHF comm frequency starting at `idx`. A spoken fraction is required so
/// headings and altitudes in the same range are not read as frequencies.
pub(crate) fn read_frequency(tokens: &[String], idx: usize) -> Option<(Frequency, usize)> {
    let (number, used) = read_number(tokens, idx)?;
    if !number.contains('.') {
        return None;
    }
    let frequency = Frequency::vhf_comm(&number).ok()?;
    Some((frequency, idx + used))
}

pub fn extract_frequencies(tokens: &[String]) -> Vec<Positioned> {
    let mut out: Vec<Positioned> = Vec::new();
    let mut seen: Vec<Frequency> = Vec::new();
    for (idx, tok) in tokens.iter().enumerate() {
        if !is_trigger(tok) {
            continue;
        }
        let mut facility = None;
        let end = (idx + 1 + FREQUENCY_WINDOW).min(tokens.len());
        for j in idx + 1..end {
            if let Ok(found) = FacilityType::from_str(&tokens[j]) {
                facility = Some(found);
                continue;
            }
            let Some((frequency, _)) = read_frequency(tokens, j) else {
                continue;
            };
            if !seen.contains(&frequency) {
                seen.push(frequency);
                out.push((
                    idx,
                    ParsedIntent::FrequencyChange {
                        facility,
                        frequency,
                    },
                ));
            }
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::scan_tokens;

    fn frequencies(text: &str) -> Vec<(Option<FacilityType>, String)> {
        extract_frequencies(&scan_tokens(text))
            .into_iter()
            .map(|(_, intent)| match intent {
                ParsedIntent::FrequencyChange {
                    facility,
                    frequency,
                } => (facility, frequency.to_string()),
                other => panic!("unexpected intent {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_contact_tower() {
        assert_eq!(
            frequencies("contact tower one one eight point three"),
            vec![(Some(FacilityType::Tower), "118.300".to_owned())]
        );
    }

    #[test]
    fn test_one_intent_per_value() {
        assert_eq!(
            frequencies("contact seattle approach on 125.35"),
            vec![(Some(FacilityType::Approach), "125.350".to_owned())]
        );
    }

    #[test]
    fn test_delivery_is_clearance() {
        assert_eq!(
            frequencies("monitor delivery 1 2 1 decimal 8 5"),
            vec![(Some(FacilityType::Clearance), "121.850".to_owned())]
        );
    }

    #[test]
    fn test_out_of_band_and_headings() {
        assert!(frequencies("contact center 150.5").is_empty());
        assert!(frequencies("turn left to 1 3 0").is_empty());
        assert!(frequencies("climb to 5000").is_empty());
    }

    #[test]
    fn test_two_frequencies() {
        assert_eq!(
            frequencies("contact tower 118.3 if no contact try 119.1"),
            vec![
                (Some(FacilityType::Tower), "118.300".to_owned()),
                (None, "119.100".to_owned())
            ]
        );
    }
}
