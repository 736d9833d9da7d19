//! Lenient field deserializers for the reference tables.
//!
//! The tables come out of an offline build over FAA CSV exports, so numbers
//! are sometimes quoted, blanks are sometimes `""` and identifiers are not
//! always uppercased.

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

pub(crate) fn ident<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(d)?;
    let res = s.trim().to_uppercase();
    if res.is_empty() {
        return Err(de::Error::invalid_value(
            de::Unexpected::Str(&s),
            &"a non-empty identifier",
        ));
    }
    Ok(res)
}

pub(crate) fn option_ident<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = option_string(d)?;
    Ok(s.map(|s| s.to_uppercase()))
}

/// Empty strings and `null` both become `None`; numbers are kept as text.
pub(crate) fn option_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<Scalar> = Deserialize::deserialize(d)?;
    let res = match s {
        Some(Scalar::Text(s)) => Some(s.trim().to_owned()),
        Some(Scalar::Number(n)) => Some(n.to_string()),
        Some(Scalar::Flag(b)) => Some(b.to_string()),
        None => None,
    };
    Ok(res.filter(|s| !s.is_empty()))
}

pub(crate) fn option_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<Scalar> = Deserialize::deserialize(d)?;
    let res = match s {
        Some(Scalar::Number(n)) => n.as_f64(),
        Some(Scalar::Text(s)) if s.trim().is_empty() => None,
        Some(Scalar::Text(s)) => Some(s.trim().parse::<f64>().map_err(|err| {
            de::Error::custom(format!("Could not parse f64: {s}, Err: {err:?}"))
        })?),
        Some(Scalar::Flag(b)) => {
            return Err(de::Error::invalid_type(de::Unexpected::Bool(b), &"a number"));
        }
        None => None,
    };
    Ok(res)
}

pub(crate) fn f64_required<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    option_f64(d)?.ok_or_else(|| de::Error::custom("missing coordinate"))
}

pub(crate) fn option_u32<'de, D>(d: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let res = option_f64(d)?;
    Ok(res
        .filter(|v| v.is_finite() && *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v.round() as u32))
}
