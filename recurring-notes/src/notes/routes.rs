use crate::{
    auth::middleware::protected,
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{routing::get, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Json, Path, Query,
    },
    state::AppState,
};
use axum::{http::StatusCode, middleware};

use schemars::JsonSchema;

use serde::Deserialize;
use uuid::Uuid;

use super::{handlers, CalendarQuery, CreateNote, FindNotesQuery, Note, UpdateNote};

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    note_id: Uuid,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/v1/notes",
            get(find_notes).post_with(create_note, |t| t.response::<201, Json<Note>>()),
        )
        .api_route("/api/v1/notes/calendar", get(find_active_dates))
        .api_route(
            "/api/v1/notes/{note_id}",
            get(get_note)
                .put(update_note)
                .patch(update_note)
                .delete(delete_note),
        )
        .layer(middleware::from_fn(protected))
        .with_state(state)
}

async fn find_notes(Query(query): Query<FindNotesQuery>, NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::find_notes(query.date(), base).await.map(Json)
}

async fn find_active_dates(
    Query(CalendarQuery { from, to }): Query<CalendarQuery>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::find_active_dates(from, to, base).await.map(Json)
}

async fn create_note(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateNote>) -> impl IntoApiResponse {
    handlers::create_note(args, base)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
}

async fn get_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::get_note(note_id, base).await.map(Json)
}

async fn update_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
    Json(args): Json<UpdateNote>,
) -> impl IntoApiResponse {
    handlers::update_note(note_id, args, base).await.map(Json)
}

async fn delete_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::delete_note(note_id, base).await.map(Json)
}
