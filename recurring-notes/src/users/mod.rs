use rusqlite::{named_params, Row};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{self, DB};

pub mod sessions;

pub type UserId = Uuid;

#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

impl<'a> TryFrom<&Row<'a>> for User {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone)]
pub struct CreateUserParameters {
    pub user_email: String,
    pub password_hash: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserByEmailParameters {
    pub user_email: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GetUserByIdParameters {
    pub user_id: UserId,
}

pub async fn create(db: DB, args: CreateUserParameters) -> db::Result<User> {
    let user = db
        .call(move |conn| {
            conn.query_row(
                r#"INSERT INTO users (email, password_hash) VALUES (:email, :password_hash)
                    RETURNING id, email, password_hash, created_at, updated_at"#,
                named_params! {
                    ":email": normalize_email(&args.user_email),
                    ":password_hash": args.password_hash,
                },
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await?;

    Ok(user)
}

pub async fn find_one_by_id(db: DB, args: GetUserByIdParameters) -> db::Result<User> {
    let user_id = args.user_id;
    let user = db
        .call(move |conn| {
            conn.query_row(
                "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = ?",
                [args.user_id],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(format!("User '{}' not found", user_id)))?;

    Ok(user)
}

pub async fn find_one_by_email(db: DB, args: GetUserByEmailParameters) -> db::Result<User> {
    let user_email = normalize_email(&args.user_email);
    let message = format!("User '{}' not found", user_email);
    let user = db
        .call(move |conn| {
            conn.query_row(
                "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = ?",
                [user_email],
                |r| User::try_from(r),
            )
            .map_err(|e| e.into())
        })
        .await
        .map_err(db::Error::from)
        .map_err(|e| e.not_found_message(message))?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::db::{self, init_test_db};

    use super::*;

    fn params(email: &str) -> CreateUserParameters {
        CreateUserParameters {
            user_email: email.into(),
            password_hash: "$argon2id$fake".into(),
        }
    }

    #[tokio::test]
    async fn users_create() {
        let db = init_test_db().await.unwrap();
        let user = create(db, params(" Test@Mail.com ")).await.unwrap();

        assert_eq!(user.email, "test@mail.com");
        assert_eq!(user.id.get_version_num(), 7);
    }

    #[tokio::test]
    async fn users_duplicate_email() {
        let db = init_test_db().await.unwrap();
        create(db.clone(), params("test@mail.com")).await.unwrap();

        let error = create(db, params("TEST@mail.com")).await.unwrap_err();
        assert!(error.is_unique_violation());
    }

    #[tokio::test]
    async fn users_get_by_id() {
        let db = init_test_db().await.unwrap();
        let user = create(db.clone(), params("test@mail.com")).await.unwrap();

        let user = find_one_by_id(db, GetUserByIdParameters { user_id: user.id })
            .await
            .unwrap();

        assert_eq!(user.email, "test@mail.com");
    }

    #[tokio::test]
    async fn users_get_by_email() {
        let db = init_test_db().await.unwrap();
        create(db.clone(), params("test@mail.com")).await.unwrap();

        let user = find_one_by_email(
            db,
            GetUserByEmailParameters {
                user_email: "Test@Mail.com".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(user.email, "test@mail.com");
    }

    #[tokio::test]
    async fn users_not_found() {
        let db = init_test_db().await.unwrap();

        let user = find_one_by_email(
            db.clone(),
            GetUserByEmailParameters {
                user_email: "test@mail.com".into(),
            },
        )
        .await;

        assert!(matches!(user.err(), Some(db::Error::NotFound(_))));

        let user = find_one_by_id(
            db,
            GetUserByIdParameters {
                user_id: Uuid::new_v4(),
            },
        )
        .await;

        assert!(matches!(user.err(), Some(db::Error::NotFound(_))));
    }

    #[test]
    fn debug_redacts_password_hash() {
        let user = User {
            id: Uuid::now_v7(),
            email: "test@mail.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        assert!(!format!("{user:?}").contains("secret"));
    }
}
