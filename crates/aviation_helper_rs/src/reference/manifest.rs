use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Length of an FAA NASR publication cycle.
pub const CYCLE_LENGTH_DAYS: u64 = 28;

/// `aviation_manifest.json`: which data cycle the tables were built from.
///
/// Only used to show freshness, never to decide anything in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReferenceManifest {
    pub faa_cycle: NaiveDate,
    pub build_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub counts: BTreeMap<String, u64>,
}

impl ReferenceManifest {
    pub fn load<R>(reader: R) -> Result<Self, Error>
    where
        R: std::io::Read,
    {
        let res = serde_json::from_reader(reader)?;
        Ok(res)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        Self::load(BufReader::new(file))
    }

    /// Days since the cycle became effective; negative for a future cycle.
    pub fn cycle_age_days(&self, today: NaiveDate) -> i64 {
        (today - self.faa_cycle).num_days()
    }

    /// Effective date of the cycle that supersedes this one.
    pub fn next_cycle(&self) -> Option<NaiveDate> {
        self.faa_cycle.checked_add_days(Days::new(CYCLE_LENGTH_DAYS))
    }

    pub fn is_current(&self, today: NaiveDate) -> bool {
        let age = self.cycle_age_days(today);
        (0..CYCLE_LENGTH_DAYS as i64).contains(&age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> ReferenceManifest {
        ReferenceManifest::load(
            r#"{"faa_cycle":"2026-02-19","build_timestamp":"2026-02-20T04:11:09Z",
                "counts":{"airports":5210,"fixes":70012}}"#
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = manifest();
        assert_eq!(manifest.faa_cycle, NaiveDate::from_ymd_opt(2026, 2, 19).unwrap());
        assert_eq!(manifest.counts["airports"], 5210);
    }

    #[test]
    fn test_cycle_age() {
        let manifest = manifest();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(manifest.cycle_age_days(today), 10);
        assert!(manifest.is_current(today));
    }

    #[test]
    fn test_cycle_expires_after_28_days() {
        let manifest = manifest();
        let next = manifest.next_cycle().unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 3, 19).unwrap());
        assert!(!manifest.is_current(next));
        assert!(!manifest.is_current(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
    }

    #[test]
    fn test_reject_bad_cycle_date() {
        let res = ReferenceManifest::load(
            r#"{"faa_cycle":"19-02-2026","build_timestamp":"2026-02-20T04:11:09Z"}"#.as_bytes(),
        );
        assert!(matches!(res, Err(Error::SerdeDeserialize(_))));
    }
}
