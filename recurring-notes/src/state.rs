use axum::extract::FromRef;

use crate::{auth::PasswordHasher, db::DB};

#[derive(FromRef, Clone)]
pub struct AppState {
    pub conn: DB,
    pub hasher: PasswordHasher,
}
