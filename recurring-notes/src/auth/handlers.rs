use chrono::{Duration, Utc};

use crate::{
    config::config,
    ctx::{BaseParams, User},
    users::{self, sessions, CreateUserParameters, GetUserByEmailParameters, GetUserByIdParameters},
    Error, Result,
};

use super::{
    hasher::PasswordHasher,
    token::{generate_token, hash_token},
    AuthResponse, Credentials, MIN_PASSWORD_LENGTH,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn validate(Credentials { email, password }: &Credentials) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(Error::Validation("Email is invalid".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

async fn start_session(user: users::User, BaseParams { db, .. }: BaseParams) -> Result<AuthResponse> {
    let token = generate_token();
    let now = Utc::now();

    sessions::create(
        db.clone(),
        sessions::CreateSessionParameters {
            user_id: user.id,
            token_hash: hash_token(&token),
            expires_at: now + Duration::hours(config().session_ttl_hours),
        },
    )
    .await?;

    let pruned = sessions::delete_expired(db, now).await?;
    if pruned > 0 {
        tracing::debug!("pruned {pruned} expired sessions");
    }

    Ok(AuthResponse {
        id: user.id,
        email: user.email,
        token,
    })
}

pub async fn register(credentials: Credentials, hasher: PasswordHasher, base: BaseParams) -> Result<AuthResponse> {
    validate(&credentials)?;

    let Credentials { email, password } = credentials;
    let password_hash = tokio::task::spawn_blocking(move || hasher.generate_hash(&password))
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))??;

    let user = users::create(
        base.db.clone(),
        CreateUserParameters {
            user_email: email,
            password_hash,
        },
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            Error::Conflict("Email is already registered".into())
        } else {
            Error::from(e)
        }
    })?;

    tracing::info!("{} registered", user.email);

    start_session(user, base).await
}

pub async fn login(
    Credentials { email, password }: Credentials,
    hasher: PasswordHasher,
    base: BaseParams,
) -> Result<AuthResponse> {
    let user = users::find_one_by_email(base.db.clone(), GetUserByEmailParameters { user_email: email })
        .await
        .map_err(Error::from)
        .map_err(|e| match e {
            Error::NotFound(_) => Error::Unauthorized(INVALID_CREDENTIALS.into()),
            e => e,
        })?;

    let password_hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || hasher.check_hash(&password_hash, &password))
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))??;

    if !valid {
        return Err(Error::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    tracing::info!("{} logged in", user.email);

    start_session(user, base).await
}

pub async fn logout(BaseParams { db, ctx }: BaseParams) -> Result<()> {
    ctx.require_user_id()?;
    if let Some(token_hash) = ctx.token_hash {
        sessions::delete(db, token_hash).await?;
    }
    Ok(())
}

pub async fn me(BaseParams { db, ctx }: BaseParams) -> Result<User> {
    let user_id = ctx.require_user_id()?;
    let user = users::find_one_by_id(db, GetUserByIdParameters { user_id }).await?;
    Ok(User::from(user))
}
