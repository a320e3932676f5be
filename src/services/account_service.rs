use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::{
    audit,
    dto::account::{AccountOverview, UpdateProfileRequest},
    entity::{LibraryEntries, Users, library_entries, users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    services::auth_service::normalize_name,
    state::AppState,
};

async fn load_user(state: &AppState, user: &AuthUser) -> AppResult<users::Model> {
    Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn get_account(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AccountOverview>> {
    let current = load_user(state, user).await?;
    let library_count = LibraryEntries::find()
        .filter(library_entries::Column::UserId.eq(current.id))
        .count(&state.orm)
        .await? as i64;

    let data = AccountOverview {
        user: User::from(current),
        library_count,
    };
    Ok(ApiResponse::success("Account", data, None))
}

pub async fn update_profile(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateProfileRequest,
) -> AppResult<ApiResponse<User>> {
    let name = normalize_name(payload.name.as_deref().unwrap_or_default())?;
    let current = load_user(state, user).await?;

    let super_admin = &state.config.super_admin;
    if super_admin.is_reserved_name(&name) && !super_admin.is_reserved_name(&current.name) {
        return Err(AppError::BadRequest("That name is reserved".into()));
    }

    let taken = Users::find()
        .filter(users::Column::Name.eq(name.as_str()))
        .filter(users::Column::Id.ne(current.id))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict("Name is already taken".into()));
    }

    let previous = current.name.clone();
    let mut active: users::ActiveModel = current.into();
    active.name = Set(name);
    active.updated_at = Set(Utc::now().into());
    let updated = active
        .update(&state.orm)
        .await
        .map_err(AppError::on_unique("Name is already taken"))?;

    audit::record(
        &state.orm,
        Some(updated.id),
        "profile_rename",
        "users",
        serde_json::json!({ "from": previous, "to": updated.name }),
    )
    .await;

    Ok(ApiResponse::success("Profile updated", User::from(updated), Some(Meta::empty())))
}
