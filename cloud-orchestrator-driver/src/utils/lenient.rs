//! Lenient numeric deserializers.
//!
//! Alibaba returns some sizes as strings (`"SourceDiskSize": "40"`) and
//! Tencent reports memory as floats on a few APIs.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyNumber {
    U64(u64),
    F64(f64),
    String(String),
}

/// Deserialize a `u64` from a number, a float (truncated) or a numeric string.
/// `null` and empty strings become `0`.
pub fn u64_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<AnyNumber>::deserialize(deserializer)? {
        None => Ok(0),
        Some(AnyNumber::U64(n)) => Ok(n),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(AnyNumber::F64(f)) if f >= 0.0 => Ok(f as u64),
        Some(AnyNumber::F64(f)) => Err(Error::custom(format!("negative number: {f}"))),
        Some(AnyNumber::String(s)) if s.trim().is_empty() => Ok(0),
        Some(AnyNumber::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| Error::custom(format!("invalid number '{s}': {e}"))),
    }
}

/// Deserialize an id that may be numeric (`DNSPod`) into its string form.
pub fn string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AnyId {
        U64(u64),
        String(String),
    }

    Ok(match Option::<AnyId>::deserialize(deserializer)? {
        None => String::new(),
        Some(AnyId::U64(n)) => n.to_string(),
        Some(AnyId::String(s)) => s,
    })
}

/// Treat an explicit `null` like a missing field (Tencent sends `null` for
/// empty lists and unset strings).
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
