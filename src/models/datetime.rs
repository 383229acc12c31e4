//! Сервер отдаёт даты в разных видах: с зоной, без зоны, иногда просто дату.
//! Храним NaiveDateTime, принимаем всё перечисленное.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serializer};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Формат для multipart-формы (как у поля datetime-local).
pub const FORM_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_server_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(19, 30, 0).unwrap();
        assert_eq!(parse("2025-03-14T19:30:00Z"), Some(expected));
        assert_eq!(parse("2025-03-14T19:30:00"), Some(expected));
        assert_eq!(parse("2025-03-14T19:30"), Some(expected));
        assert_eq!(parse("2025-03-14T19:30:00.000"), Some(expected));
        assert_eq!(
            parse("2025-03-14"),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse("tomorrow"), None);
        assert_eq!(parse(""), None);
    }
}
