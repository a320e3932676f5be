use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};

use crate::{
    dto::account::{AccountOverview, UpdateProfileRequest},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::account_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_account))
        .route("/profile", put(update_profile))
}

#[utoipa::path(
    get,
    path = "/api/account",
    responses(
        (status = 200, description = "Profile and library size", body = ApiResponse<AccountOverview>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn get_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AccountOverview>>> {
    let resp = account_service::get_account(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/account/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Display name changed", body = ApiResponse<User>),
        (status = 400, description = "Missing, too long or reserved name"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Name already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = account_service::update_profile(&state, &user, payload).await?;
    Ok(Json(resp))
}
