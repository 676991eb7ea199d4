use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a calendar date in the UTC reference zone.
///
/// Accepts `YYYY-MM-DD` as well as RFC 3339 timestamps, which are truncated to
/// their UTC date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|date| date.with_timezone(&Utc).date_naive())
    })
}

/// A note's start date as it sits in storage.
///
/// Rows written by the service always hold `YYYY-MM-DD`, but the raw text is
/// kept so a record that does not parse can still be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StoredDate(String);

impl StoredDate {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<NaiveDate> for StoredDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.format(DATE_FORMAT).to_string())
    }
}

impl ToSql for StoredDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(ValueRef::Text(self.0.as_bytes())))
    }
}

impl FromSql for StoredDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = match value {
            ValueRef::Text(text) | ValueRef::Blob(text) => String::from_utf8_lossy(text).into_owned(),
            ValueRef::Integer(value) => value.to_string(),
            ValueRef::Real(value) => value.to_string(),
            ValueRef::Null => String::new(),
        };
        Ok(Self(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap()
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_date("2024-03-10"), Some(date("2024-03-10")));
        assert_eq!(parse_date(" 2024-03-10 "), Some(date("2024-03-10")));
    }

    #[test]
    fn truncates_timestamps_to_utc_date() {
        assert_eq!(parse_date("2024-03-10T00:00:00.000Z"), Some(date("2024-03-10")));
        assert_eq!(parse_date("2024-03-10T23:30:00-02:00"), Some(date("2024-03-11")));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn stored_date_keeps_raw_text() {
        let stored: StoredDate = serde_json::from_str("\"garbage\"").unwrap();
        assert_eq!(stored.as_str(), "garbage");
        assert_eq!(stored.date(), None);

        let stored = StoredDate::from(date("2024-01-05"));
        assert_eq!(serde_json::to_string(&stored).unwrap(), "\"2024-01-05\"");
    }
}
