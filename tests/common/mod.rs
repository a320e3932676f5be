#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use mix_archive_api::{
    config::{AppConfig, SuperAdminConfig},
    db::{create_orm_conn, run_migrations},
    dto::auth::Claims,
    entity::{mixes, users},
    middleware::auth::AuthUser,
    services::auth_service::issue_token,
    state::AppState,
};
use sea_orm::{ActiveModelTrait, Set};
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";
pub const SUPER_ADMIN: &str = "essentialmixadmin";

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: JWT_SECRET.into(),
        schema_sync_attempts: 1,
        schema_sync_delay: Duration::from_millis(1),
        super_admin: SuperAdminConfig {
            enabled: true,
            username: SUPER_ADMIN.into(),
            password: "rootpass".into(),
            reset_password_on_boot: false,
        },
    }
}

/// Fresh in-memory database with the schema applied.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let config = test_config();
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, config))
}

pub async fn create_user(
    state: &AppState,
    name: &str,
    is_admin: bool,
) -> anyhow::Result<users::Model> {
    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        password_hash: Set("dummy".into()),
        is_admin: Set(is_admin),
        is_banned: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(user)
}

pub fn auth(user: &users::Model) -> AuthUser {
    AuthUser::from(user.clone())
}

pub fn bearer(user: &users::Model) -> String {
    let token = issue_token(user, JWT_SECRET).expect("token");
    format!("Bearer {token}")
}

/// Token whose admin/ban flags were read `age_secs` ago.
pub fn aged_bearer(user: &users::Model, age_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        adm: user.is_admin,
        ban: user.is_banned,
        rfh: now - age_secs,
        exp: (now + 3600) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token");
    format!("Bearer {token}")
}

pub async fn insert_mix(
    state: &AppState,
    number: i32,
    artist: &str,
    release_date: &str,
    genre: Option<&str>,
) -> anyhow::Result<mixes::Model> {
    let now = Utc::now();
    let mix = mixes::ActiveModel {
        number: Set(number),
        artist: Set(artist.into()),
        release_date: Set(NaiveDate::parse_from_str(release_date, "%Y-%m-%d")?),
        genre: Set(genre.map(str::to_string)),
        rating: Set(0.0),
        rating_count: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;
    Ok(mix)
}

/// Send a request through the full router and decode the JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
