mod common;

use axum::http::StatusCode;
use mix_archive_api::{
    entity::{Users, users},
    middleware::auth::FLAG_REFRESH_SECS,
    routes::create_app,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::json;

async fn set_admin_flag(
    state: &mix_archive_api::state::AppState,
    user: &users::Model,
    is_admin: bool,
) -> anyhow::Result<()> {
    let mut active: users::ActiveModel = user.clone().into();
    active.is_admin = Set(is_admin);
    active.update(&state.orm).await?;
    Ok(())
}

#[tokio::test]
async fn missing_or_bad_token_is_unauthorized() -> anyhow::Result<()> {
    let app = create_app(common::setup_state().await?);

    let (status, body) = common::send(&app, "GET", "/api/library", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["data"]["error"].is_string());

    let (status, _) =
        common::send(&app, "GET", "/api/account", Some("Bearer not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = common::send(&app, "GET", "/api/admin/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn admin_endpoints_require_admin() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "listener", false).await?;
    let admin = common::create_user(&state, "curator", true).await?;
    let mix = common::insert_mix(&state, 1, "Pete Tong", "1993-10-30", None).await?;
    let app = create_app(state);

    let user_token = common::bearer(&user);
    let admin_token = common::bearer(&admin);

    let (status, body) =
        common::send(&app, "GET", "/api/admin/dashboard", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["data"]["error"], "Forbidden Admin required");

    let uri = format!("/api/admin/mixes/{}/tracks", mix.id);
    let (status, _) = common::send(&app, "PUT", &uri, Some(&user_token), Some(json!({ "tracks": [] }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
        common::send(&app, "GET", "/api/admin/dashboard", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stats"]["mixes"], 1);
    assert_eq!(body["data"]["latest"][0]["number"], 1);

    let (status, body) = common::send(
        &app,
        "PUT",
        &uri,
        Some(&admin_token),
        Some(json!({ "tracks": [{ "title": "" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["data"]["issues"][0]["message"], "Title required");
    Ok(())
}

#[tokio::test]
async fn register_login_and_browse() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    common::insert_mix(&state, 4, "Carl Cox", "1994-01-01", Some("Techno")).await?;
    let app = create_app(state);

    let credentials = json!({ "username": "newcomer", "password": "pass1234" });
    let (status, body) =
        common::send(&app, "POST", "/api/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "newcomer");
    assert!(body["data"].get("password_hash").is_none());

    let (status, _) =
        common::send(&app, "POST", "/api/auth/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = common::send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "newcomer", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = common::send(&app, "POST", "/api/auth/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().expect("token").to_string();
    assert!(token.starts_with("Bearer "));

    let (status, body) = common::send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_admin"], false);

    let (status, body) =
        common::send(&app, "GET", "/api/mixes?search=cox&per_page=5", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["number"], 4);

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/mixes/4/reviews",
        Some(&token),
        Some(json!({ "rating": 5, "text": "Three decks of fury" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["mix_rating_count"], 1);

    let (status, body) = common::send(&app, "GET", "/api/mixes/4", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mix"]["rating"], 5.0);
    assert_eq!(body["data"]["reviews"][0]["user_name"], "newcomer");

    let (status, _) = common::send(&app, "GET", "/api/mixes/404", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn stale_session_flags_are_reread_hourly() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::create_user(&state, "curator", true).await?;
    let gone = common::create_user(&state, "ghost", false).await?;
    let fresh = common::aged_bearer(&admin, 60);
    let stale = common::aged_bearer(&admin, FLAG_REFRESH_SECS * 2);
    let gone_token = common::aged_bearer(&gone, FLAG_REFRESH_SECS * 2);

    set_admin_flag(&state, &admin, false).await?;
    Users::delete_by_id(gone.id).exec(&state.orm).await?;
    let app = create_app(state);

    // flags read a minute ago are still trusted
    let (status, _) = common::send(&app, "GET", "/api/admin/dashboard", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        common::send(&app, "GET", "/api/admin/dashboard", Some(&stale), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["data"]["error"], "Forbidden Admin required");

    let (status, _) = common::send(&app, "GET", "/api/library", Some(&gone_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn refresh_issues_a_token_with_current_flags() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "promoted", false).await?;
    let old_token = common::bearer(&user);
    set_admin_flag(&state, &user, true).await?;
    let app = create_app(state);

    let (status, _) =
        common::send(&app, "GET", "/api/admin/dashboard", Some(&old_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) =
        common::send(&app, "POST", "/api/auth/refresh", Some(&old_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["is_admin"], true);
    let new_token = body["data"]["token"].as_str().expect("token").to_string();
    assert!(new_token.starts_with("Bearer "));

    let (status, _) =
        common::send(&app, "GET", "/api/admin/dashboard", Some(&new_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::send(&app, "POST", "/api/auth/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn media_patch_is_admin_only_and_clears_fields() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "listener", false).await?;
    let admin = common::create_user(&state, "curator", true).await?;
    common::insert_mix(&state, 4, "Carl Cox", "1994-01-01", None).await?;
    let app = create_app(state);
    let admin_token = common::bearer(&admin);

    let media = json!({
        "bio": "Three decks at the Zap Club",
        "youtube_url": "https://youtube.example/cox",
        "duration_seconds": 7200
    });
    let user_token = common::bearer(&user);
    let (status, _) =
        common::send(&app, "PATCH", "/api/mixes/4", Some(&user_token), Some(media.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = common::send(&app, "PATCH", "/api/mixes/4", None, Some(media.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) =
        common::send(&app, "PATCH", "/api/mixes/4", Some(&admin_token), Some(media)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bio"], "Three decks at the Zap Club");
    assert_eq!(body["data"]["duration_seconds"], 7200);

    let (status, body) = common::send(
        &app,
        "PATCH",
        "/api/mixes/4",
        Some(&admin_token),
        Some(json!({ "bio": null, "youtube_url": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["bio"].is_null());
    assert!(body["data"]["youtube_url"].is_null());
    // fields absent from the patch are left alone
    assert_eq!(body["data"]["duration_seconds"], 7200);

    let (status, _) = common::send(
        &app,
        "PATCH",
        "/api/mixes/404",
        Some(&admin_token),
        Some(json!({ "bio": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn latest_lists_six_newest_by_release_date() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let releases = [
        (1, 1993),
        (2, 2001),
        (3, 1995),
        (4, 2010),
        (5, 1999),
        (6, 2005),
        (7, 1994),
        (8, 2015),
    ];
    for (number, year) in releases {
        let date = format!("{year}-01-01");
        common::insert_mix(&state, number, "Various", &date, None).await?;
    }
    let app = create_app(state);

    let (status, body) = common::send(&app, "GET", "/api/mixes/latest", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<i64> = body["data"]["items"]
        .as_array()
        .expect("items")
        .iter()
        .filter_map(|m| m["number"].as_i64())
        .collect();
    assert_eq!(numbers, vec![8, 4, 6, 2, 5, 3]);
    Ok(())
}
