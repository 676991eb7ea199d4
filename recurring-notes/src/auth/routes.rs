use axum::{extract::State, http::StatusCode};

use crate::{
    ctx::{BaseParams, User},
    openapi::{
        aide::{
            axum::{
                routing::{get, post, post_with},
                ApiRouter, IntoApiResponse,
            },
            NoApi,
        },
        Json,
    },
    state::AppState,
};

use super::{handlers, hasher::PasswordHasher, AuthResponse, Credentials, LogoutResponse};

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/v1/auth/register",
            post_with(register, |t| t.response::<201, Json<AuthResponse>>()),
        )
        .api_route("/api/v1/auth/login", post(login))
        .api_route("/api/v1/auth/logout", post(logout))
        .api_route("/api/v1/auth/me", get(me))
        .with_state(state)
}

async fn register(
    State(hasher): State<PasswordHasher>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<Credentials>,
) -> impl IntoApiResponse {
    handlers::register(args, hasher, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn login(
    State(hasher): State<PasswordHasher>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<Credentials>,
) -> impl IntoApiResponse {
    handlers::login(args, hasher, base).await.map(Json)
}

async fn logout(NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::logout(base).await.map(|_| {
        Json(LogoutResponse {
            message: "Logged out".into(),
        })
    })
}

async fn me(NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::me(base).await.map(Json::<User>)
}
