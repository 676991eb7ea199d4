mod handlers;
mod hasher;
mod model;
mod routes;
mod token;

pub use hasher::{HasherError, PasswordHasher};
pub use model::*;
pub use routes::router;
pub use token::{bearer_token, hash_token};

pub mod middleware {
    use axum::{extract::Request, middleware::Next, response::Response};

    use crate::{ctx::Ctx, Result};

    /// Rejects requests that did not resolve to a user.
    pub async fn protected(ctx: Ctx, request: Request, next: Next) -> Result<Response> {
        ctx.require_user_id()?;
        Ok(next.run(request).await)
    }
}
