use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::errors::Error;

/// Lowest VHF air-band communication frequency, in kHz.
pub const VHF_COMM_MIN_KHZ: u32 = 118_000;
/// Highest VHF air-band communication frequency, in kHz.
pub const VHF_COMM_MAX_KHZ: u32 = 136_975;

/// A radio frequency stored in kHz so comparisons stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Frequency {
    khz: u32,
}

impl Frequency {
    pub fn from_khz(khz: u32) -> Self {
        Self { khz }
    }

    pub fn from_mhz(mhz: f64) -> Result<Self, Error> {
        let khz = (mhz * 1000.0).round();
        if !khz.is_finite() || khz < 0.0 || khz > u32::MAX as f64 {
            return Err(Error::InvalidFrequency(mhz.to_string()));
        }
        Ok(Self { khz: khz as u32 })
    }

    /// Parses a MHz value and requires it to be inside the VHF comm band.
    pub fn vhf_comm(val: &str) -> Result<Self, Error> {
        let frequency: Frequency = val.parse()?;
        if frequency.is_vhf_comm() {
            Ok(frequency)
        } else {
            Err(Error::InvalidFrequency(val.to_owned()))
        }
    }

    pub fn khz(&self) -> u32 {
        self.khz
    }

    pub fn mhz(&self) -> f64 {
        self.khz as f64 / 1000.0
    }

    pub fn is_vhf_comm(&self) -> bool {
        (VHF_COMM_MIN_KHZ..=VHF_COMM_MAX_KHZ).contains(&self.khz)
    }
}

impl FromStr for Frequency {
    type Err = Error;
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidFrequency(val.to_owned());
        let mut split = val.trim().split('.');
        match (split.next(), split.next(), split.next()) {
            (Some(num), dec, None) if !num.is_empty() => {
                if !num.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let num: u32 = num.parse().map_err(|_| invalid())?;
                let dec = match dec {
                    None => 0,
                    Some(d) if (1..=3).contains(&d.len()) && d.chars().all(|c| c.is_ascii_digit()) => {
                        // "7" means 700 kHz, "25" means 250 kHz
                        format!("{d:0<3}").parse::<u32>().map_err(|_| invalid())?
                    }
                    Some(_) => return Err(invalid()),
                };
                let khz = num
                    .checked_mul(1000)
                    .and_then(|k| k.checked_add(dec))
                    .ok_or_else(invalid)?;
                Ok(Self { khz })
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.to_string()
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:03}", self.khz / 1000, self.khz % 1000)
    }
}

/// The kind of ATC facility a frequency belongs to.
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
#[strum(serialize_all = "UPPERCASE")]
pub enum FacilityType {
    Tower,
    Ground,
    Departure,
    Approach,
    Center,
    #[strum(to_string = "CLEARANCE", serialize = "DELIVERY")]
    Clearance,
    Atis,
    Unicom,
    Ctaf,
    Ramp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frequency() {
        assert_eq!("128.7".parse::<Frequency>().unwrap().khz(), 128_700);
        assert_eq!("121.25".parse::<Frequency>().unwrap().khz(), 121_250);
        assert_eq!("118.975".parse::<Frequency>().unwrap().khz(), 118_975);
        assert_eq!("121".parse::<Frequency>().unwrap().khz(), 121_000);
    }

    #[test]
    fn test_reject_malformed_frequency() {
        assert!("".parse::<Frequency>().is_err());
        assert!("12a.5".parse::<Frequency>().is_err());
        assert!("121.1234".parse::<Frequency>().is_err());
        assert!("1.2.3".parse::<Frequency>().is_err());
        assert!(".5".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_vhf_comm_band() {
        assert!(Frequency::vhf_comm("118.000").is_ok());
        assert!(Frequency::vhf_comm("136.975").is_ok());
        assert!(Frequency::vhf_comm("117.95").is_err());
        assert!(Frequency::vhf_comm("137.0").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Frequency::from_khz(128_700).to_string(), "128.700");
        assert!((Frequency::from_khz(128_700).mhz() - 128.7).abs() < 1e-9);
        assert_eq!(Frequency::from_mhz(121.9).unwrap().khz(), 121_900);
        assert!(Frequency::from_mhz(f64::NAN).is_err());
    }

    #[test]
    fn test_facility_type_from_word() {
        assert_eq!("TOWER".parse::<FacilityType>().unwrap(), FacilityType::Tower);
        assert_eq!("DELIVERY".parse::<FacilityType>().unwrap(), FacilityType::Clearance);
        assert!("RUNWAY".parse::<FacilityType>().is_err());
    }
}
