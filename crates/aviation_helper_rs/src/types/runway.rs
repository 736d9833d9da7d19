use std::{fmt::Display, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::errors::Error;

static DESIGNATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})([LRC])?$").unwrap());

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Deserialize,
    Serialize,
    StrumDisplay,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
pub enum RunwaySide {
    #[strum(to_string = "L", serialize = "LEFT")]
    Left,
    #[strum(to_string = "R", serialize = "RIGHT")]
    Right,
    #[strum(to_string = "C", serialize = "CENTER", serialize = "CENTRE")]
    Center,
}

/// A runway end as painted on the threshold: `01`..`36` plus optional side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunwayDesignator {
    number: u8,
    side: Option<RunwaySide>,
}

impl RunwayDesignator {
    pub fn new(number: u8, side: Option<RunwaySide>) -> Result<Self, Error> {
        match number {
            1..=36 => Ok(Self { number, side }),
            _ => Err(Error::InvalidRunway(format!("{number}"))),
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn side(&self) -> Option<RunwaySide> {
        self.side
    }

    /// A designator spoken without a side matches every end with that number.
    pub fn matches(&self, spoken: &RunwayDesignator) -> bool {
        self.number == spoken.number && (spoken.side.is_none() || self.side == spoken.side)
    }
}

impl FromStr for RunwayDesignator {
    type Err = Error;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        let trimmed = val.trim().to_uppercase();
        let captures = DESIGNATOR
            .captures(&trimmed)
            .ok_or_else(|| Error::InvalidRunway(val.to_owned()))?;
        let number: u8 = captures[1]
            .parse()
            .map_err(|_| Error::InvalidRunway(val.to_owned()))?;
        let side = match captures.get(2) {
            Some(side) => Some(
                side.as_str()
                    .parse::<RunwaySide>()
                    .map_err(|_| Error::InvalidRunway(val.to_owned()))?,
            ),
            None => None,
        };
        Self::new(number, side).map_err(|_| Error::InvalidRunway(val.to_owned()))
    }
}

impl TryFrom<String> for RunwayDesignator {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RunwayDesignator> for String {
    fn from(value: RunwayDesignator) -> Self {
        value.to_string()
    }
}

impl Display for RunwayDesignator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.side {
            Some(side) => write!(f, "{:02}{}", self.number, side),
            None => write!(f, "{:02}", self.number),
        }
    }
}

/// Strips the leading zero of a two-digit runway number: `06L` -> `6L`.
///
/// Anything that is not digits followed by an optional suffix is returned
/// uppercased but otherwise untouched, so the function is idempotent on any
/// input.
pub fn canonical_designator(designator: &str) -> String {
    let upper = designator.trim().to_uppercase();
    let digits = upper.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 2 && upper.starts_with('0') {
        upper[1..].to_owned()
    } else {
        upper
    }
}

/// Pads a one-digit designator to two digits: `6L` -> `06L`.
pub fn pad_designator(designator: &str) -> String {
    let upper = designator.trim().to_uppercase();
    let digits = upper.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 1 {
        format!("0{upper}")
    } else {
        upper
    }
}

/// Splits a stored runway pair such as `06L/24R` into its valid halves.
pub fn split_runway_pair(pair: &str) -> Vec<RunwayDesignator> {
    pair.split('/')
        .filter_map(|half| half.parse::<RunwayDesignator>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_designator() {
        let designator: RunwayDesignator = "06L".parse().unwrap();
        assert_eq!(designator.number(), 6);
        assert_eq!(designator.side(), Some(RunwaySide::Left));
        assert_eq!(designator.to_string(), "06L");
        assert_eq!("9".parse::<RunwayDesignator>().unwrap().to_string(), "09");
        assert_eq!("36c".parse::<RunwayDesignator>().unwrap().to_string(), "36C");
    }

    #[test]
    fn test_reject_invalid_designator() {
        assert!("00".parse::<RunwayDesignator>().is_err());
        assert!("37".parse::<RunwayDesignator>().is_err());
        assert!("99".parse::<RunwayDesignator>().is_err());
        assert!("6X".parse::<RunwayDesignator>().is_err());
        assert!("123".parse::<RunwayDesignator>().is_err());
        assert!("".parse::<RunwayDesignator>().is_err());
    }

    #[test]
    fn test_bare_number_matches_any_side() {
        let end: RunwayDesignator = "24L".parse().unwrap();
        assert!(end.matches(&"24".parse().unwrap()));
        assert!(end.matches(&"24L".parse().unwrap()));
        assert!(!end.matches(&"24R".parse().unwrap()));
        assert!(!end.matches(&"06".parse().unwrap()));
    }

    #[test]
    fn test_canonical_designator() {
        assert_eq!(canonical_designator("06L"), canonical_designator("6L"));
        assert_eq!(canonical_designator("09"), "9");
        assert_eq!(canonical_designator("27r"), "27R");
        assert_eq!(canonical_designator("0"), "0");
    }

    #[test]
    fn test_pad_designator() {
        assert_eq!(pad_designator("6"), "06");
        assert_eq!(pad_designator("6L"), "06L");
        assert_eq!(pad_designator("99"), "99");
    }

    #[test]
    fn test_split_runway_pair() {
        let halves: Vec<String> = split_runway_pair("06L/24R")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(halves, vec!["06L", "24R"]);
        assert_eq!(split_runway_pair("H1").len(), 0);
        assert_eq!(split_runway_pair("14/XX").len(), 1);
    }

    proptest! {
        #[test]
        fn canonical_is_idempotent(s in "[0-9]{0,3}[LRC]?") {
            let once = canonical_designator(&s);
            prop_assert_eq!(canonical_designator(&once), once);
        }

        #[test]
        fn padded_and_canonical_agree(number in 1u8..=36, side in proptest::option::of(prop_oneof![Just("L"), Just("R"), Just("C")])) {
            let raw = format!("{number}{}", side.unwrap_or(""));
            prop_assert_eq!(canonical_designator(&pad_designator(&raw)), canonical_designator(&raw));
        }
    }
}
