use chrono::{DateTime, Utc};
use rusqlite::{named_params, OptionalExtension};

use crate::db::{self, DB};

use super::{User, UserId};

#[derive(Debug, Clone)]
pub struct CreateSessionParameters {
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn create(db: DB, args: CreateSessionParameters) -> db::Result<()> {
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, expires_at) VALUES (:token_hash, :user_id, :expires_at)",
            named_params! {
                ":token_hash": args.token_hash,
                ":user_id": args.user_id,
                ":expires_at": args.expires_at,
            },
        )?;
        Ok(())
    })
    .await?;

    Ok(())
}

/// The owner of an unexpired session, if any.
pub async fn find_user(db: DB, token_hash: String, now: DateTime<Utc>) -> db::Result<Option<User>> {
    let user = db
        .call(move |conn| {
            conn.query_row(
                r#"SELECT u.id, u.email, u.password_hash, u.created_at, u.updated_at
                    FROM sessions s JOIN users u ON u.id = s.user_id
                    WHERE s.token_hash = :token_hash AND s.expires_at > :now"#,
                named_params! {
                    ":token_hash": token_hash,
                    ":now": now,
                },
                |r| User::try_from(r),
            )
            .optional()
            .map_err(|e| e.into())
        })
        .await?;

    Ok(user)
}

pub async fn delete(db: DB, token_hash: String) -> db::Result<bool> {
    let deleted = db
        .call(move |conn| {
            let count = conn.execute("DELETE FROM sessions WHERE token_hash = ?", [token_hash])?;
            Ok(count > 0)
        })
        .await?;

    Ok(deleted)
}

pub async fn delete_expired(db: DB, now: DateTime<Utc>) -> db::Result<usize> {
    let count = db
        .call(move |conn| {
            let count = conn.execute("DELETE FROM sessions WHERE expires_at <= ?", [now])?;
            Ok(count)
        })
        .await?;

    Ok(count)
}
