//! Field-level coercion helpers shared by every normalizer.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use num_traits::{clamp, ToPrimitive};
use serde_json::{Map, Value};

/// Upper bound of the AQI scale.
pub const AQI_MAX: u16 = 500;

/// Returns the value as a JSON object, if it is one.
pub fn as_object(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()
}

/// Looks up `key` in `value` when `value` is an object.
pub fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    as_object(value).and_then(|map| map.get(key))
}

/// Accepts finite JSON numbers and strings holding a finite number (`"42.5"`).
///
/// Blank strings, `"NaN"`, `"inf"`, booleans and nulls are treated as absent.
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        },
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Accepts only non-blank strings, returned untrimmed.
pub fn as_text(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.trim().is_empty())
}

/// Collects the string entries of an array, skipping anything else.
pub fn as_string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// Parses a backend timestamp into an instant.
///
/// RFC 3339 is the normal form. Date-times without an offset and bare dates are read as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Rounds to the nearest integer and clamps into the AQI scale.
pub fn clamp_aqi(value: f64) -> u16 {
    let bounded = clamp(value.round(), 0.0, f64::from(AQI_MAX));
    bounded.to_u16().unwrap_or(0)
}

/// Clamps a confidence score into `[0, 1]`; a missing score counts as 0.
pub fn clamp_confidence(value: Option<f64>) -> f64 {
    clamp(value.unwrap_or(0.0), 0.0, 1.0)
}

/// Rounds a pollutant concentration and floors it at zero.
pub fn clamp_pollutant(value: f64) -> u32 {
    value.round().max(0.0).to_u32().unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(42.5), Some(42.5))]
    #[case(json!("42.5"), Some(42.5))]
    #[case(json!(" 17 "), Some(17.0))]
    #[case(json!(-3), Some(-3.0))]
    #[case(json!("abc"), None)]
    #[case(json!(""), None)]
    #[case(json!("NaN"), None)]
    #[case(json!("inf"), None)]
    #[case(json!(true), None)]
    #[case(json!(null), None)]
    #[case(json!([1]), None)]
    fn test_as_number(#[case] input: Value, #[case] expected: Option<f64>) {
        assert_eq!(as_number(&input), expected);
    }

    #[rstest]
    #[case(json!("Paris"), Some("Paris"))]
    #[case(json!(" padded "), Some(" padded "))]
    #[case(json!(""), None)]
    #[case(json!("   "), None)]
    #[case(json!(12), None)]
    #[case(json!(null), None)]
    fn test_as_text(#[case] input: Value, #[case] expected: Option<&str>) {
        assert_eq!(as_text(&input), expected);
    }

    #[test]
    fn test_string_list_skips_non_strings() {
        let list = as_string_list(Some(&json!(["pm25", 3, null, "o3"])));
        assert_eq!(list, vec!["pm25".to_string(), "o3".to_string()]);
        assert!(as_string_list(Some(&json!("pm25"))).is_empty());
        assert!(as_string_list(None).is_empty());
    }

    #[test]
    fn test_parse_instant_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_instant("2024-01-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_instant("2024-01-01T11:00:00+01:00"), Some(expected));
        assert_eq!(parse_instant("2024-01-01T10:00:00"), Some(expected));
        assert_eq!(parse_instant("2024-01-01T10:00"), Some(expected));
        assert_eq!(
            parse_instant("2024-01-01"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_instant("not-a-date"), None);
        assert_eq!(parse_instant(""), None);
        assert_eq!(parse_instant("2024-13-45T10:00:00Z"), None);
    }

    #[rstest]
    #[case(617.4, 500)]
    #[case(499.5, 500)]
    #[case(42.4, 42)]
    #[case(42.5, 43)]
    #[case(-12.0, 0)]
    #[case(0.0, 0)]
    fn test_clamp_aqi(#[case] input: f64, #[case] expected: u16) {
        assert_eq!(clamp_aqi(input), expected);
    }

    #[rstest]
    #[case(Some(-0.2), 0.0)]
    #[case(Some(1.8), 1.0)]
    #[case(Some(0.75), 0.75)]
    #[case(None, 0.0)]
    fn test_clamp_confidence(#[case] input: Option<f64>, #[case] expected: f64) {
        assert_eq!(clamp_confidence(input), expected);
    }

    #[test]
    fn test_clamp_pollutant_floors_at_zero() {
        assert_eq!(clamp_pollutant(-4.2), 0);
        assert_eq!(clamp_pollutant(25.6), 26);
    }
}
