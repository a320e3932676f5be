use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get},
};

use crate::{
    dto::library::{AddLibraryRequest, LibraryList, LibraryRemoval},
    error::AppResult,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    models::LibraryEntry,
    response::ApiResponse,
    services::library_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_library).post(add_to_library))
        .route("/{mix_id}", delete(remove_from_library))
}

#[utoipa::path(
    get,
    path = "/api/library",
    responses(
        (status = 200, description = "Saved mixes, newest first", body = ApiResponse<LibraryList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
pub async fn list_library(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<LibraryList>>> {
    let resp = library_service::list_library(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/library",
    request_body = AddLibraryRequest,
    responses(
        (status = 200, description = "Mix saved", body = ApiResponse<LibraryEntry>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Mix not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
pub async fn add_to_library(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<AddLibraryRequest>,
) -> AppResult<Json<ApiResponse<LibraryEntry>>> {
    let resp = library_service::add_to_library(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/library/{mix_id}",
    params(("mix_id" = i32, Path, description = "Mix ID")),
    responses(
        (status = 200, description = "Mix removed if it was saved", body = ApiResponse<LibraryRemoval>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Library"
)]
pub async fn remove_from_library(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(mix_id): AppPath<i32>,
) -> AppResult<Json<ApiResponse<LibraryRemoval>>> {
    let resp = library_service::remove_from_library(&state, &user, mix_id).await?;
    Ok(Json(resp))
}
