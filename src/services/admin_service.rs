use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::admin::{Dashboard, SetAdminRequest, SetBanRequest, UserList},
    entity::{Users, users},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::User,
    query::{MixOrder, MixQuery},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, SortOrder},
    services::mix_service::archive_stats,
    state::AppState,
};

pub const DASHBOARD_RECENT: u64 = 8;

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Dashboard>> {
    ensure_admin(user)?;
    let latest = MixQuery::default()
        .order_by(MixOrder::CreatedAt(SortOrder::Desc))
        .order_by(MixOrder::Number(SortOrder::Desc))
        .take(DASHBOARD_RECENT)
        .all(&state.orm)
        .await?;
    let stats = archive_stats(&state.orm).await?;
    Ok(ApiResponse::success("Dashboard", Dashboard { latest, stats }, None))
}

pub async fn list_users(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let (page, per_page, offset) = pagination.normalize();

    let finder = Users::find().order_by_desc(users::Column::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

async fn load_target(state: &AppState, id: Uuid) -> AppResult<users::Model> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn set_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SetAdminRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let target = load_target(state, id).await?;
    if !payload.admin && state.config.super_admin.is_reserved_name(&target.name) {
        return Err(AppError::BadRequest("Super admin cannot be demoted".into()));
    }

    let mut active: users::ActiveModel = target.into();
    active.is_admin = Set(payload.admin);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(target_id = %id, admin = payload.admin, "admin role changed");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "user_set_admin",
        "users",
        serde_json::json!({ "target_id": id, "admin": payload.admin }),
    )
    .await;

    Ok(ApiResponse::success("Updated", User::from(updated), Some(Meta::empty())))
}

pub async fn set_ban(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: SetBanRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_admin(user)?;
    let target = load_target(state, id).await?;
    if payload.banned && state.config.super_admin.is_reserved_name(&target.name) {
        return Err(AppError::BadRequest("Super admin cannot be banned".into()));
    }

    let mut active: users::ActiveModel = target.into();
    active.is_banned = Set(payload.banned);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(target_id = %id, banned = payload.banned, "ban flag changed");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "user_set_ban",
        "users",
        serde_json::json!({ "target_id": id, "banned": payload.banned }),
    )
    .await;

    Ok(ApiResponse::success("Updated", User::from(updated), Some(Meta::empty())))
}
