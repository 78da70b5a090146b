use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Formats a timestamp the way the backend and UI exchange dates:
/// ISO-8601 with millisecond precision and the `Z` designator.
pub fn format_iso(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a string shaped like an ISO-8601 timestamp.
///
/// Accepts an explicit offset or `Z`, and the bare `YYYY-MM-DDTHH:MM:SS[.fff]`
/// form without a zone, which is treated as UTC. Anything else is not a date
/// and yields `None`; this is the receive-side reviver for all wire dates.
pub fn parse_iso(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    value
        .parse::<NaiveDateTime>()
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for `DateTime<Utc>` fields carried as ISO-8601 strings.
pub mod iso {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_iso(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("not an ISO-8601 timestamp: {raw}")))
    }
}

/// Same adapter for optional timestamp fields.
pub mod iso_opt {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&super::format_iso(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(raw) => super::parse_iso(&raw)
                .map(Some)
                .ok_or_else(|| {
                    serde::de::Error::custom(format!("not an ISO-8601 timestamp: {raw}"))
                }),
        }
    }
}
