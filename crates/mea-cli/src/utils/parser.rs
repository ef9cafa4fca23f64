use serde::Deserialize;
use serde::de::IntoDeserializer;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE (e.g., 'prediction.gamma=2.0').")]
    MissingSeparator(String),

    #[error("Key cannot be empty in assignment '{0}'.")]
    EmptyKey(String),

    #[error("Unknown configuration key for --set: '{0}'.")]
    UnknownKey(String),

    #[error("Invalid numeric value for '{key}': '{value}'.")]
    InvalidNumber { key: String, value: String },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidVariant { key: String, reason: String },
}

/// Splits a `KEY=VALUE` assignment at the first `=`, trimming both sides.
pub fn parse_assignment(assignment: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| ParseError::MissingSeparator(assignment.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::EmptyKey(assignment.to_string()));
    }
    Ok((key, value.trim()))
}

pub fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parses a unit enum variant by its serde name, e.g. `strict` for `HairpinRule::Strict`.
pub fn parse_variant<T>(key: &str, value: &str) -> Result<T, ParseError>
where
    T: for<'de> Deserialize<'de>,
{
    let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        value.into_deserializer();
    T::deserialize(deserializer).map_err(|e| ParseError::InvalidVariant {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
