use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    recurrence::{parse_date, Recurrence, Schedule, StoredDate},
    users::UserId,
};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Note {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    /// `YYYY-MM-DD`
    pub start_date: StoredDate,
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Schedule for Note {
    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date.date()
    }

    fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }
}

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            start_date: row.get(4)?,
            recurrence: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateNote {
    pub title: Option<String>,
    pub content: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub start_date: String,
    pub recurrence: Recurrence,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub start_date: Option<String>,
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FindNotesQuery {
    /// Only notes active on this date. Ignored when it does not parse.
    pub date: Option<String>,
}

impl FindNotesQuery {
    pub fn date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CalendarQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindNotesResponse {
    pub results: Vec<Note>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CalendarResponse {
    pub dates: Vec<NaiveDate>,
}
