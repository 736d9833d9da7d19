use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Transponder code, four octal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Squawk(u16);

impl Squawk {
    pub fn code(&self) -> u16 {
        self.0
    }
}

impl FromStr for Squawk {
    type Err = Error;

    fn from_str(val: &str) -> Result<Self, Self::Err> {
        let val = val.trim();
        if val.len() != 4 || !val.chars().all(|c| ('0'..='7').contains(&c)) {
            return Err(Error::InvalidSquawk(val.to_owned()));
        }
        u16::from_str_radix(val, 8)
            .map(Squawk)
            .map_err(|_| Error::InvalidSquawk(val.to_owned()))
    }
}

impl TryFrom<String> for Squawk {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Squawk> for String {
    fn from(value: Squawk) -> Self {
        value.to_string()
    }
}

impl Display for Squawk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}
