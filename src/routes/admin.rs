use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{Dashboard, SetAdminRequest, SetBanRequest, UserList},
        mixes::{CreateMixRequest, MixList, RecommendRequest, UpdateMixRequest},
        reviews::AdminReviewList,
        tracks::{ReplaceTracksRequest, ReplaceTracksResponse, TrackList},
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::{Mix, RecommendedMix, User},
    response::ApiResponse,
    routes::params::{AdminMixQuery, Pagination},
    services::{admin_service, mix_service, review_service, track_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/mixes", get(list_mixes).post(create_mix))
        .route("/mixes/{id}", delete(delete_mix).patch(update_mix))
        .route("/mixes/{id}/tracks", get(list_tracks).put(replace_tracks))
        .route(
            "/mixes/{id}/recommendation",
            put(set_recommendation).delete(clear_recommendation),
        )
        .route("/reviews", get(list_reviews))
        .route("/reviews/{id}", delete(delete_review))
        .route("/users", get(list_users))
        .route("/users/{id}/admin", post(set_admin))
        .route("/users/{id}/ban", post(set_ban))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Recently added mixes and archive counters", body = ApiResponse<Dashboard>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    let resp = admin_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/mixes",
    params(AdminMixQuery),
    responses(
        (status = 200, description = "Mixes by number, newest first", body = ApiResponse<MixList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_mixes(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<AdminMixQuery>,
) -> AppResult<Json<ApiResponse<MixList>>> {
    let resp = mix_service::admin_list_mixes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/mixes",
    request_body = CreateMixRequest,
    responses(
        (status = 201, description = "Mix created", body = ApiResponse<Mix>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Number already used")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_mix(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateMixRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Mix>>)> {
    let resp = mix_service::create_mix(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/mixes/{id}",
    params(("id" = i32, Path, description = "Mix ID")),
    request_body = UpdateMixRequest,
    responses(
        (status = 200, description = "Mix updated", body = ApiResponse<Mix>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Number already used")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_mix(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateMixRequest>,
) -> AppResult<Json<ApiResponse<Mix>>> {
    let resp = mix_service::update_mix(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/mixes/{id}",
    params(("id" = i32, Path, description = "Mix ID")),
    responses(
        (status = 200, description = "Mix and dependents deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_mix(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = mix_service::delete_mix(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/mixes/{id}/tracks",
    params(("id" = i32, Path, description = "Mix ID")),
    responses(
        (status = 200, description = "Tracklist ordered by index", body = ApiResponse<TrackList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_tracks(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ApiResponse<TrackList>>> {
    let resp = track_service::list_tracks(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/mixes/{id}/tracks",
    params(("id" = i32, Path, description = "Mix ID")),
    request_body = ReplaceTracksRequest,
    responses(
        (status = 200, description = "Tracklist replaced", body = ApiResponse<ReplaceTracksResponse>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn replace_tracks(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ReplaceTracksRequest>,
) -> AppResult<Json<ApiResponse<ReplaceTracksResponse>>> {
    let resp = track_service::replace_tracks(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/mixes/{id}/recommendation",
    params(("id" = i32, Path, description = "Mix ID")),
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Recommendation set", body = ApiResponse<RecommendedMix>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_recommendation(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<RecommendRequest>,
) -> AppResult<Json<ApiResponse<RecommendedMix>>> {
    let resp = mix_service::set_recommendation(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/mixes/{id}/recommendation",
    params(("id" = i32, Path, description = "Mix ID")),
    responses(
        (status = 200, description = "Recommendation cleared"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn clear_recommendation(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = mix_service::clear_recommendation(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    params(Pagination),
    responses(
        (status = 200, description = "Newest reviews with their mix", body = ApiResponse<AdminReviewList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(pagination): AppQuery<Pagination>,
) -> AppResult<Json<ApiResponse<AdminReviewList>>> {
    let resp = review_service::admin_list_reviews(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/reviews/{id}",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted, rating recomputed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = review_service::admin_delete_review(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(Pagination),
    responses(
        (status = 200, description = "Users, newest first", body = ApiResponse<UserList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(pagination): AppQuery<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/admin",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = SetAdminRequest,
    responses(
        (status = 200, description = "Admin flag changed", body = ApiResponse<User>),
        (status = 400, description = "Super admin cannot be demoted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_admin(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<SetAdminRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = admin_service::set_admin(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/ban",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = SetBanRequest,
    responses(
        (status = 200, description = "Ban flag changed", body = ApiResponse<User>),
        (status = 400, description = "Super admin cannot be banned"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_ban(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<SetBanRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = admin_service::set_ban(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
