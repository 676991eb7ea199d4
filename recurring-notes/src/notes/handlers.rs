use chrono::{NaiveDate, Utc};
use rusqlite::params;
use sea_query::{Alias, Expr, Iden, Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;
use uuid::Uuid;

use crate::{
    config::config,
    ctx::BaseParams,
    db,
    recurrence::{active_dates_between, active_notes_on, parse_date, Recurrence, StoredDate},
    users::UserId,
    Error, Result,
};

use super::{CalendarResponse, CreateNote, FindNotesResponse, Note, UpdateNote};

/// Longest range the calendar endpoint will walk, in days.
pub const MAX_CALENDAR_DAYS: i64 = 366;

const NOT_FOUND: &str = "Note not found";

#[derive(Iden)]
pub enum Notes {
    Table,
    Id,
    UserId,
    Title,
    Content,
    StartDate,
    Recurrence,
    CreatedAt,
    UpdatedAt,
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::Validation("Content must not be empty".into()));
    }
    Ok(())
}

fn validate_start_date(start_date: &str) -> Result<StoredDate> {
    parse_date(start_date)
        .map(StoredDate::from)
        .ok_or_else(|| Error::Validation(format!("Invalid start_date: {start_date:?}")))
}

fn validate_recurrence(recurrence: &Recurrence) -> Result<()> {
    if !recurrence.is_recognized() {
        return Err(Error::Validation(format!(
            "Invalid recurrence {:?}, expected one of {}",
            recurrence.as_str(),
            Recurrence::KNOWN.join(", ")
        )));
    }
    Ok(())
}

async fn select_notes(db: db::DB, user_id: UserId) -> Result<Vec<Note>> {
    db.call(move |conn| {
        let (sql, values) = Query::select()
            .columns([
                Notes::Id,
                Notes::UserId,
                Notes::Title,
                Notes::Content,
                Notes::StartDate,
                Notes::Recurrence,
                Notes::CreatedAt,
                Notes::UpdatedAt,
            ])
            .from(Notes::Table)
            .and_where(Expr::col(Notes::UserId).eq(user_id))
            .order_by(Alias::new("rowid"), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let notes = conn
            .prepare(&sql)?
            .query_map(&*values.as_params(), |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn find_notes(date: Option<NaiveDate>, BaseParams { db, ctx }: BaseParams) -> Result<FindNotesResponse> {
    let user_id = ctx.require_user_id()?;
    let notes = select_notes(db, user_id).await?;

    Ok(FindNotesResponse {
        results: active_notes_on(notes, date, config().anchor_policy),
    })
}

pub async fn find_active_dates(from: NaiveDate, to: NaiveDate, BaseParams { db, ctx }: BaseParams) -> Result<CalendarResponse> {
    let user_id = ctx.require_user_id()?;

    if to < from {
        return Err(Error::Validation("from must not be after to".into()));
    }
    if (to - from).num_days() >= MAX_CALENDAR_DAYS {
        return Err(Error::Validation(format!(
            "Range must not exceed {MAX_CALENDAR_DAYS} days"
        )));
    }

    let notes = select_notes(db, user_id).await?;

    Ok(CalendarResponse {
        dates: active_dates_between(&notes, from, to, config().anchor_policy),
    })
}

pub async fn create_note(
    CreateNote {
        title,
        content,
        start_date,
        recurrence,
    }: CreateNote,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Note> {
    let user_id = ctx.require_user_id()?;
    validate_content(&content)?;
    let start_date = validate_start_date(&start_date)?;
    validate_recurrence(&recurrence)?;

    let note = db
        .call(move |conn| {
            conn.query_row(
                r#"INSERT INTO notes (user_id, title, content, start_date, recurrence) VALUES (?, ?, ?, ?, ?)
                RETURNING id, user_id, title, content, start_date, recurrence, created_at, updated_at"#,
                params![user_id, title.unwrap_or_default(), content, start_date, recurrence],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(Error::from)?;

    tracing::info!("note {} created", note.id);
    Ok(note)
}

pub async fn get_note(note_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user_id = ctx.require_user_id()?;

    db.call(move |conn| {
        let note = conn.query_row(
            r#"SELECT id, user_id, title, content, start_date, recurrence, created_at, updated_at
            FROM notes WHERE id = ? AND user_id = ?"#,
            params![note_id, user_id],
            |row| Note::try_from(row),
        )?;
        Ok(note)
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| db::Error::not_found_message(e, NOT_FOUND))
    .map_err(Error::from)
}

pub async fn update_note(
    note_id: Uuid,
    UpdateNote {
        title,
        content,
        start_date,
        recurrence,
    }: UpdateNote,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Note> {
    let user_id = ctx.require_user_id()?;
    if let Some(content) = &content {
        validate_content(content)?;
    }
    let start_date = start_date.as_deref().map(validate_start_date).transpose()?;
    if let Some(recurrence) = &recurrence {
        validate_recurrence(recurrence)?;
    }

    db.call(move |conn| {
        conn.query_row(
            r#"UPDATE notes SET
                title = coalesce(?, title),
                content = coalesce(?, content),
                start_date = coalesce(?, start_date),
                recurrence = coalesce(?, recurrence),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            RETURNING id, user_id, title, content, start_date, recurrence, created_at, updated_at"#,
            params![title, content, start_date, recurrence, Utc::now(), note_id, user_id],
            |row| Note::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| db::Error::not_found_message(e, NOT_FOUND))
    .map_err(Error::from)
}

pub async fn delete_note(note_id: Uuid, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    let user_id = ctx.require_user_id()?;

    let note = db
        .call(move |conn| {
            conn.query_row(
                r#"DELETE FROM notes
                WHERE id = ? AND user_id = ?
                RETURNING id, user_id, title, content, start_date, recurrence, created_at, updated_at"#,
                params![note_id, user_id],
                |row| Note::try_from(row),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| db::Error::not_found_message(e, NOT_FOUND))
        .map_err(Error::from)?;

    tracing::info!("note {} deleted", note.id);
    Ok(note)
}
