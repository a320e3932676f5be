use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        mixes::{ArchiveStats, ArtistList, MixDetail, MixList, RelatedMixes, UpdateMixMediaRequest},
        reviews::{CreateReviewRequest, ReviewCreated, ReviewList},
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Mix,
    response::ApiResponse,
    routes::params::{ArtistQuery, MixListQuery, Pagination},
    services::{mix_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_mixes))
        .route("/latest", get(latest_mixes))
        .route("/recommended", get(recommended_mixes))
        .route("/artists", get(list_artists))
        .route("/stats", get(archive_stats))
        .route("/{number}", get(get_mix).patch(update_mix_media))
        .route("/{number}/related", get(related_mixes))
        .route("/{number}/reviews", get(list_reviews).post(create_review))
}

#[utoipa::path(
    get,
    path = "/api/mixes",
    params(MixListQuery),
    responses(
        (status = 200, description = "Search and paginate mixes", body = ApiResponse<MixList>)
    ),
    tag = "Mixes"
)]
pub async fn list_mixes(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MixListQuery>,
) -> AppResult<Json<ApiResponse<MixList>>> {
    let resp = mix_service::list_mixes(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mixes/latest",
    responses(
        (status = 200, description = "Newest mixes by release date", body = ApiResponse<MixList>)
    ),
    tag = "Mixes"
)]
pub async fn latest_mixes(State(state): State<AppState>) -> AppResult<Json<ApiResponse<MixList>>> {
    let resp = mix_service::latest_mixes(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mixes/recommended",
    responses(
        (status = 200, description = "Editorially recommended mixes", body = ApiResponse<MixList>)
    ),
    tag = "Mixes"
)]
pub async fn recommended_mixes(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MixList>>> {
    let resp = mix_service::recommended_mixes(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mixes/artists",
    params(ArtistQuery),
    responses(
        (status = 200, description = "Artists with mix counts", body = ApiResponse<ArtistList>)
    ),
    tag = "Mixes"
)]
pub async fn list_artists(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ArtistQuery>,
) -> AppResult<Json<ApiResponse<ArtistList>>> {
    let resp = mix_service::list_artists(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mixes/stats",
    responses(
        (status = 200, description = "Archive counters", body = ApiResponse<ArchiveStats>)
    ),
    tag = "Mixes"
)]
pub async fn archive_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ArchiveStats>>> {
    let resp = mix_service::get_stats(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mixes/{number}",
    params(("number" = i32, Path, description = "Mix number")),
    responses(
        (status = 200, description = "Mix with tracklist and latest reviews", body = ApiResponse<MixDetail>),
        (status = 404, description = "Not Found")
    ),
    tag = "Mixes"
)]
pub async fn get_mix(
    State(state): State<AppState>,
    AppPath(number): AppPath<i32>,
) -> AppResult<Json<ApiResponse<MixDetail>>> {
    let resp = mix_service::get_mix_detail(&state, number).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/mixes/{number}",
    params(("number" = i32, Path, description = "Mix number")),
    request_body = UpdateMixMediaRequest,
    responses(
        (status = 200, description = "Media fields updated", body = ApiResponse<Mix>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Mixes"
)]
pub async fn update_mix_media(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(number): AppPath<i32>,
    AppJson(payload): AppJson<UpdateMixMediaRequest>,
) -> AppResult<Json<ApiResponse<Mix>>> {
    let resp = mix_service::update_media(&state, &user, number, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mixes/{number}/related",
    params(("number" = i32, Path, description = "Mix number")),
    responses(
        (status = 200, description = "Same-genre and suggested mixes", body = ApiResponse<RelatedMixes>),
        (status = 404, description = "Not Found")
    ),
    tag = "Mixes"
)]
pub async fn related_mixes(
    State(state): State<AppState>,
    AppPath(number): AppPath<i32>,
) -> AppResult<Json<ApiResponse<RelatedMixes>>> {
    let resp = mix_service::related_mixes(&state, number).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mixes/{number}/reviews",
    params(("number" = i32, Path, description = "Mix number"), Pagination),
    responses(
        (status = 200, description = "Reviews, newest first", body = ApiResponse<ReviewList>),
        (status = 404, description = "Not Found")
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    AppPath(number): AppPath<i32>,
    AppQuery(pagination): AppQuery<Pagination>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews(&state, number, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/mixes/{number}/reviews",
    params(("number" = i32, Path, description = "Mix number")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored, rating recomputed", body = ApiResponse<ReviewCreated>),
        (status = 400, description = "Invalid rating or text"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Account banned"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn create_review(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(number): AppPath<i32>,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReviewCreated>>)> {
    let resp = review_service::create_review(&state, &user, number, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
