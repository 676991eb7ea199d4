use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// How often a note repeats after its anchor date.
///
/// Values that are not one of the four known modes are kept verbatim in
/// [`Recurrence::Unrecognized`] so a corrupt row can still be listed, but such a
/// note never matches a query date.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Recurrence {
    OneTime,
    Daily,
    Weekly,
    Monthly,
    Unrecognized(String),
}

impl Recurrence {
    pub const KNOWN: [&'static str; 4] = ["one-time", "daily", "weekly", "monthly"];

    pub fn as_str(&self) -> &str {
        match self {
            Self::OneTime => "one-time",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Unrecognized(value) => value,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<&str> for Recurrence {
    fn from(value: &str) -> Self {
        match value {
            "one-time" => Self::OneTime,
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            other => Self::Unrecognized(other.to_owned()),
        }
    }
}

impl Serialize for Recurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Recurrence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value.as_str()))
    }
}

impl JsonSchema for Recurrence {
    fn schema_name() -> String {
        String::from("Recurrence")
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            enum_values: Some(Self::KNOWN.iter().map(|v| Value::from(*v)).collect()),
            ..Default::default()
        }
        .into()
    }
}

impl ToSql for Recurrence {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(ValueRef::Text(self.as_str().as_bytes())))
    }
}

impl FromSql for Recurrence {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Text(text) => Self::from(String::from_utf8_lossy(text).as_ref()),
            other => Self::Unrecognized(format!("{:?}", other.data_type()).to_lowercase()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes() {
        assert_eq!(Recurrence::from("one-time"), Recurrence::OneTime);
        assert_eq!(Recurrence::from("daily"), Recurrence::Daily);
        assert_eq!(Recurrence::from("weekly"), Recurrence::Weekly);
        assert_eq!(Recurrence::from("monthly"), Recurrence::Monthly);
    }

    #[test]
    fn keeps_unknown_values() {
        let recurrence = Recurrence::from("yearly");
        assert_eq!(recurrence, Recurrence::Unrecognized("yearly".into()));
        assert!(!recurrence.is_recognized());
        assert_eq!(serde_json::to_value(&recurrence).unwrap(), "yearly");
    }

    #[test]
    fn modes_are_case_sensitive() {
        assert!(!Recurrence::from("Daily").is_recognized());
    }

    #[test]
    fn json_uses_wire_names() {
        let recurrence: Recurrence = serde_json::from_str("\"one-time\"").unwrap();
        assert_eq!(recurrence, Recurrence::OneTime);
        assert_eq!(serde_json::to_string(&Recurrence::Monthly).unwrap(), "\"monthly\"");
    }
}
