//! Timestamp helpers for vendor payloads.
//!
//! - serialize: `Option<DateTime<Utc>>` -> RFC3339 string
//! - deserialize: RFC3339 string or Unix timestamp (seconds / milliseconds)
//! - [`parse_vendor_time`]: the textual formats the supported APIs emit

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Offset used by `DNSPod` for naive `YYYY-MM-DD HH:MM:SS` timestamps (UTC+8).
const CHINA_STANDARD_OFFSET_SECS: i32 = 8 * 3600;

pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OptionalTimestamp {
        String(String),
        I64(i64),
    }

    match Option::<OptionalTimestamp>::deserialize(deserializer)? {
        Some(OptionalTimestamp::String(s)) => parse_vendor_time(&s)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("Invalid timestamp: {s}"))),
        Some(OptionalTimestamp::I64(ts)) => parse_unix_timestamp(ts)
            .map(Some)
            .ok_or_else(|| Error::custom("Invalid Unix timestamp")),
        None => Ok(None),
    }
}

/// Seconds or milliseconds, detected by magnitude (Alibaba uses milliseconds).
pub fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

/// Parses the timestamp strings returned by the supported APIs.
///
/// Accepts RFC3339, Alibaba's minute precision `2019-01-30T05:48Z` and
/// `DNSPod`'s naive `2021-05-21 11:07:16` (interpreted as UTC+8).
pub fn parse_vendor_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()?;
    FixedOffset::east_opt(CHINA_STANDARD_OFFSET_SECS)?
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339() {
        let dt = parse_vendor_time("2024-01-15T08:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_705_305_600);
    }

    #[test]
    fn alibaba_minute_precision() {
        let dt = parse_vendor_time("2024-01-15T08:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_705_305_600);
    }

    #[test]
    fn dnspod_naive_is_utc_plus_8() {
        let dt = parse_vendor_time("2024-01-15 16:00:00").unwrap();
        assert_eq!(dt.timestamp(), 1_705_305_600);
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_vendor_time("").is_none());
        assert!(parse_vendor_time("yesterday").is_none());
    }

    #[test]
    fn millis_and_seconds() {
        assert_eq!(
            parse_unix_timestamp(1_705_305_600_000).unwrap().timestamp(),
            1_705_305_600
        );
        assert_eq!(
            parse_unix_timestamp(1_705_305_600).unwrap().timestamp(),
            1_705_305_600
        );
    }
}
