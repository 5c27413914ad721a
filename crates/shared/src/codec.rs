//! JSON codec helpers with a tolerant multi-format date parser.
//!
//! The backend (and the recommendation service behind it) are not perfectly
//! consistent about date formatting, so decoding walks a fixed list of
//! formats. The order is normative: a bare date must never be consumed by a
//! datetime pattern, so the datetime formats are tried first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Wire format used for all encoded dates.
pub const DATE_FORMAT_OUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.3fZ", "%Y-%m-%dT%H:%M:%SZ"];
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Encode a value as JSON bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Decode a value from JSON bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Convert a typed value into a loose JSON dictionary, for the few endpoints
/// that accept free-form payloads.
pub fn to_dictionary<T: Serialize>(value: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Convert a loose JSON dictionary back into a typed value.
pub fn from_dictionary<T: DeserializeOwned>(
    map: Map<String, Value>,
) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(map))
}

/// Parse a date string, trying each accepted format in order:
/// ISO-8601 with fractional seconds, ISO-8601 without, then the fixed
/// UTC-pinned formats, then a bare date (midnight UTC).
pub fn parse_flexible_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT) {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Format a date the way the backend expects it.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format(DATE_FORMAT_OUT).to_string()
}

/// Serde adapter for `DateTime<Utc>` fields using the flexible parser.
pub mod flexi_date {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format_date(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        parse_flexible_date(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognized date string {raw:?}"))
        })
    }
}

/// Serde adapter for `Option<DateTime<Utc>>` fields using the flexible parser.
pub mod flexi_date_opt {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime<Utc>>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match dt {
            Some(dt) => ser.serialize_some(&format_date(dt)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = Option::<String>::deserialize(de)?;
        match raw {
            None => Ok(None),
            Some(raw) => parse_flexible_date(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("unrecognized date string {raw:?}"))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_fractional_iso8601() {
        let dt = parse_flexible_date("2024-01-01T00:00:00.000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_plain_iso8601() {
        let dt = parse_flexible_date("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let dt = parse_flexible_date("2024-01-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_flexible_date("2024-13-40").is_none());
        assert!(parse_flexible_date("").is_none());
        assert!(parse_flexible_date("not a date").is_none());
    }

    #[test]
    fn decode_failure_names_the_offending_string() {
        #[derive(Debug, serde::Deserialize)]
        struct Holder {
            #[serde(with = "flexi_date")]
            #[allow(dead_code)]
            at: DateTime<Utc>,
        }
        let err = serde_json::from_str::<Holder>(r#"{"at":"2024-13-40"}"#).unwrap_err();
        assert!(err.to_string().contains("2024-13-40"));
    }

    #[test]
    fn encode_emits_iso8601_with_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap();
        assert_eq!(format_date(&dt), "2024-06-15T12:30:45.000Z");
    }

    #[test]
    fn dictionary_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Small {
            name: String,
            count: u32,
        }
        let value = Small { name: "x".into(), count: 3 };
        let map = to_dictionary(&value).unwrap();
        assert_eq!(map.get("name").and_then(Value::as_str), Some("x"));
        let back: Small = from_dictionary(map).unwrap();
        assert_eq!(back, value);
    }
}
