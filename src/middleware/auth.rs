use axum::{
    extract::{FromRef, FromRequestParts},
    http::header,
};
use chrono::Utc;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    entity::{Users, users},
    error::AppError,
    services::auth_service::decode_token,
    state::AppState,
};

/// Admin and ban flags carried in a token are re-read from the store once they are this old.
pub const FLAG_REFRESH_SECS: i64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub is_admin: bool,
    pub is_banned: bool,
}

impl From<users::Model> for AuthUser {
    fn from(user: users::Model) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            is_admin: user.is_admin,
            is_banned: user.is_banned,
        }
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.is_admin {
        return Err(AppError::Forbidden("Admin required".into()));
    }
    Ok(())
}

pub fn ensure_not_banned(user: &AuthUser) -> Result<(), AppError> {
    if user.is_banned {
        return Err(AppError::Forbidden("Account is banned".into()));
    }
    Ok(())
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?
            .trim();

        let state = AppState::from_ref(state);
        let claims = decode_token(token, &state.config.jwt_secret)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

        if Utc::now().timestamp() - claims.rfh < FLAG_REFRESH_SECS {
            return Ok(AuthUser {
                user_id,
                name: claims.name,
                is_admin: claims.adm,
                is_banned: claims.ban,
            });
        }

        let user = Users::find_by_id(user_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
        tracing::debug!(user_id = %user.id, "refreshed session flags");
        Ok(AuthUser::from(user))
    }
}
