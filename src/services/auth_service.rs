use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::{Users, users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MAX_NAME_LEN: usize = 60;
pub const MIN_PASSWORD_LEN: usize = 4;
const TOKEN_TTL_HOURS: i64 = 24;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Sign a session token carrying the user's current admin and ban flags.
pub fn issue_token(user: &users::Model, secret: &str) -> AppResult<String> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        adm: user.is_admin,
        ban: user.is_banned,
        rfh: now.timestamp(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))
}

/// Trimmed display name, or a 400 describing why it is unusable.
pub fn normalize_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest { username, password } = payload;
    let name = normalize_name(&username)?;
    if state.config.super_admin.is_reserved_name(&name) {
        return Err(AppError::BadRequest("That name is reserved".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let exists = Users::find()
        .filter(users::Column::Name.eq(name.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict("Name is already taken".into()));
    }

    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        password_hash: Set(hash_password(&password)?),
        is_admin: Set(false),
        is_banned: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await
    .map_err(AppError::on_unique("Name is already taken"))?;

    tracing::info!(user_id = %user.id, "user registered");
    audit::record(
        &state.orm,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success("User created", User::from(user), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;
    let user = Users::find()
        .filter(users::Column::Name.eq(username.trim()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid name or password".into())),
    };

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid name or password".into()));
    }
    if user.is_banned {
        return Err(AppError::Forbidden("Account is banned".into()));
    }

    let token = issue_token(&user, &state.config.jwt_secret)?;

    audit::record(
        &state.orm,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user: User::from(user),
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

/// Re-read the caller's flags and sign a fresh token.
pub async fn refresh_token(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<LoginResponse>> {
    let current = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;

    let token = issue_token(&current, &state.config.jwt_secret)?;
    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user: User::from(current),
    };
    Ok(ApiResponse::success("Token refreshed", resp, Some(Meta::empty())))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let current = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Me", User::from(current), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(is_admin: bool) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Uuid::new_v4(),
            name: "digger".into(),
            password_hash: String::new(),
            is_admin,
            is_banned: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn token_carries_flags() {
        let user = model(true);
        let token = issue_token(&user, "secret").unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert!(claims.adm);
        assert!(!claims.ban);
        assert!(matches!(
            decode_token(&token, "other"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn names_are_trimmed_and_bounded() {
        assert_eq!(normalize_name("  Sasha ").unwrap(), "Sasha");
        assert!(normalize_name("   ").is_err());
        assert!(normalize_name(&"x".repeat(61)).is_err());
    }
}
