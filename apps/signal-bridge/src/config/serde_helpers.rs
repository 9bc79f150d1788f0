//! Deserializers for values that arrive through environment interpolation.
//!
//! An unset variable interpolates to an empty string, so "empty" has to mean
//! "not configured" rather than a parse error.

use serde::{Deserialize, Deserializer};

/// Treat empty or whitespace-only strings as `None`.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// A flag that stays enabled unless explicitly switched off.
///
/// Only `false`, `0`, `no` and `off` (any case) disable it. Empty or unknown
/// values keep it on.
pub(crate) fn enabled_unless_off<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        Some(Flag::Text(s)) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        ),
        None => true,
    })
}
