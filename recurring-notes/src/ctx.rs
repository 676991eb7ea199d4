use std::convert::Infallible;

use axum::{
    extract::{Extension, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    auth::{bearer_token, hash_token},
    users::{self, sessions, UserId},
    Error, DB,
};

#[derive(Clone, FromRequestParts)]
pub struct BaseParams {
    pub ctx: Ctx,
    #[from_request(via(Extension))]
    pub db: DB,
}

impl BaseParams {
    pub fn new(db: DB, ctx: Ctx) -> Self {
        Self { db, ctx }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

impl From<users::User> for User {
    fn from(user: users::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Identity resolved for the current request.
#[derive(Clone, Debug, Default)]
pub struct Ctx {
    pub user: Option<User>,
    /// Digest of the bearer token the user authenticated with.
    pub token_hash: Option<String>,
}

impl Ctx {
    pub fn new(user: Option<User>) -> Self {
        Self { user, token_hash: None }
    }

    pub fn get_user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn require_user_id(&self) -> crate::Result<UserId> {
        self.get_user_id().ok_or_else(Error::unauthorized)
    }
}

impl<S> FromRequestParts<S> for Ctx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Ctx>().cloned().unwrap_or_default())
    }
}

/// Resolves the bearer token into a [`Ctx`] for the handlers downstream.
pub async fn with_ctx(
    Extension(db): Extension<DB>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> crate::Result<Response> {
    let ctx = match bearer_token(&headers) {
        Some(token) => {
            let token_hash = hash_token(token);
            let user = sessions::find_user(db, token_hash.clone(), Utc::now()).await?;
            if user.is_none() {
                tracing::debug!("unknown or expired token");
            }
            Ctx {
                token_hash: user.as_ref().map(|_| token_hash),
                user: user.map(User::from),
            }
        }
        None => Ctx::default(),
    };

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
