use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

use crate::errors::Error;

/// Highest altitude accepted from a transmission, in feet.
pub const MAX_ALTITUDE_FT: u32 = 50_000;

/// Transition altitude above which altitudes are displayed as flight levels.
const TRANSITION_ALTITUDE_FT: u32 = 18_000;

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
pub enum AltitudeVerb {
    Climb,
    Descend,
    Maintain,
}

/// An altitude in feet, bounded to `0..=MAX_ALTITUDE_FT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Altitude(u32);

impl Altitude {
    pub fn from_feet(feet: u32) -> Result<Self, Error> {
        match feet {
            0..=MAX_ALTITUDE_FT => Ok(Self(feet)),
            _ => Err(Error::InvalidAltitude(feet)),
        }
    }

    pub fn from_flight_level(level: u32) -> Result<Self, Error> {
        let feet = level
            .checked_mul(100)
            .ok_or(Error::InvalidAltitude(level))?;
        Self::from_feet(feet)
    }

    pub fn feet(self) -> u32 {
        self.0
    }

    pub fn flight_level(self) -> u32 {
        self.0 / 100
    }
}

impl TryFrom<u32> for Altitude {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_feet(value)
    }
}

impl From<Altitude> for u32 {
    fn from(value: Altitude) -> Self {
        value.0
    }
}

impl Display for Altitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 >= TRANSITION_ALTITUDE_FT {
            write!(f, "FL{:03}", self.flight_level())
        } else {
            write!(f, "{} FT", self.0)
        }
    }
}
