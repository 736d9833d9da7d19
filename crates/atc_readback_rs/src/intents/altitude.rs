use std::str::FromStr;

use aviation_helper_rs::{
    clearance::intent::ParsedIntent,
    types::altitude::{Altitude, AltitudeVerb},
};

use super::{Positioned, phrase_at};
use crate::vocabulary::{is_numeric, read_number};

fn is_altitude_filler(word: &str) -> bool {
    matches!(word, "AND" | "MAINTAIN" | "TO")
}

/// Units that mark a number as something other than an altitude.
fn is_foreign_unit(word: Option<&String>) -> bool {
    word.is_some_and(|w| matches!(w.as_str(), "KNOTS" | "DEGREES"))
}

fn whole_number(tokens: &[String], idx: usize) -> Option<(u32, usize)> {
    let (number, used) = read_number(tokens, idx)?;
    let value = number.parse::<u32>().ok()?;
    Some((value, idx + used))
}

/// Reads an altitude at `idx`: plain feet, `<n> THOUSAND [<m> HUNDRED]`,
/// `<n> HUNDRED`, `<n> 000` or `FLIGHT LEVEL <n>`.
pub(crate) fn read_altitude(tokens: &[String], idx: usize) -> Option<(Altitude, usize)> {
    if phrase_at(tokens, idx, &["FLIGHT", "LEVEL"]) {
        let (level, end) = whole_number(tokens, idx + 2)?;
        if is_foreign_unit(tokens.get(end)) {
            return None;
        }
        return Altitude::from_flight_level(level).ok().map(|a| (a, end));
    }
    if let Some(level) = tokens.get(idx).and_then(|t| t.strip_prefix("FL")) {
        if is_numeric(level) {
            let level = level.parse::<u32>().ok()?;
            return Altitude::from_flight_level(level).ok().map(|a| (a, idx + 1));
        }
    }

    let (value, mut end) = whole_number(tokens, idx)?;
    let feet = match tokens.get(end).map(String::as_str) {
        Some("THOUSAND") => {
            end += 1;
            let mut feet = value.checked_mul(1000)?;
            if let Some((hundreds, after)) = whole_number(tokens, end) {
                if tokens.get(after).is_some_and(|t| t == "HUNDRED") {
                    feet = feet.checked_add(hundreds.checked_mul(100)?)?;
                    end = after + 1;
                }
            }
            feet
        }
        Some("HUNDRED") => {
            end += 1;
            value.checked_mul(100)?
        }
        Some("000") => {
            end += 1;
            value.checked_mul(1000)?
        }
        _ => value,
    };
    if is_foreign_unit(tokens.get(end)) {
        return None;
    }
    Altitude::from_feet(feet).ok().map(|a| (a, end))
}

pub fn extract_altitudes(tokens: &[String]) -> Vec<Positioned> {
    let mut out = Vec::new();
    let mut idx = 0;
    while idx < tokens.len() {
        let Ok(verb) = AltitudeVerb::from_str(&tokens[idx]) else {
            idx += 1;
            continue;
        };
        // CLIMB AND MAINTAIN consumes the MAINTAIN as filler
        let mut start = idx + 1;
        while tokens.get(start).is_some_and(|t| is_altitude_filler(t)) {
            start += 1;
        }
        match read_altitude(tokens, start) {
            Some((altitude, end)) => {
                out.push((idx, ParsedIntent::AltitudeChange { verb, altitude }));
                idx = end;
            }
            None => idx = start.max(idx + 1),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::scan_tokens;

    fn altitudes(text: &str) -> Vec<(AltitudeVerb, u32)> {
        extract_altitudes(&scan_tokens(text))
            .into_iter()
            .map(|(_, intent)| match intent {
                ParsedIntent::AltitudeChange { verb, altitude } => (verb, altitude.feet()),
                other => panic!("unexpected intent {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_climb_and_maintain() {
        assert_eq!(
            altitudes("climb and maintain five thousand"),
            vec![(AltitudeVerb::Climb, 5000)]
        );
        assert_eq!(
            altitudes("descend and maintain one one thousand five hundred"),
            vec![(AltitudeVerb::Descend, 11_500)]
        );
    }

    #[test]
    fn test_shorthand_and_flight_levels() {
        assert_eq!(altitudes("maintain 3 000"), vec![(AltitudeVerb::Maintain, 3000)]);
        assert_eq!(altitudes("maintain 4500"), vec![(AltitudeVerb::Maintain, 4500)]);
        assert_eq!(
            altitudes("climb to flight level three five zero"),
            vec![(AltitudeVerb::Climb, 35_000)]
        );
        assert_eq!(altitudes("descend FL240"), vec![(AltitudeVerb::Descend, 24_000)]);
        assert_eq!(altitudes("descend to 8 hundred"), vec![(AltitudeVerb::Descend, 800)]);
    }

    #[test]
    fn test_rejects_out_of_range_and_units() {
        assert!(altitudes("climb 60000").is_empty());
        assert!(altitudes("maintain 250 knots").is_empty());
        assert!(altitudes("maintain two seven zero degrees").is_empty());
        assert!(altitudes("maintain visual separation").is_empty());
        assert!(altitudes("climb").is_empty());
    }

    #[test]
    fn test_two_instructions() {
        assert_eq!(
            altitudes("climb 5000 then maintain 7000"),
            vec![(AltitudeVerb::Climb, 5000), (AltitudeVerb::Maintain, 7000)]
        );
    }
}
