mod common;

use axum::http::StatusCode;
use mix_archive_api::routes::{create_app, params::MAX_PAGE};
use serde_json::json;

fn assert_bad_request(status: StatusCode, body: &serde_json::Value) {
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["message"].as_str().is_some_and(|m| m.starts_with("Bad Request")), "{body}");
    assert!(body["data"]["error"].is_string(), "{body}");
}

#[tokio::test]
async fn malformed_bodies_get_the_json_envelope() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "raver", false).await?;
    let admin = common::create_user(&state, "curator", true).await?;
    let mix = common::insert_mix(&state, 4, "Carl Cox", "1994-01-01", None).await?;
    let app = create_app(state);
    let user_token = common::bearer(&user);
    let admin_token = common::bearer(&admin);

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/mixes/4/reviews",
        Some(&user_token),
        Some(json!({ "rating": 5 })),
    )
    .await;
    assert_bad_request(status, &body);

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/mixes/4/reviews",
        Some(&user_token),
        Some(json!({ "rating": "5", "text": "Three decks" })),
    )
    .await;
    assert_bad_request(status, &body);

    let uri = format!("/api/admin/mixes/{}/tracks", mix.id);
    let (status, body) =
        common::send(&app, "PUT", &uri, Some(&admin_token), Some(json!({}))).await;
    assert_bad_request(status, &body);

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "raver" })),
    )
    .await;
    assert_bad_request(status, &body);
    Ok(())
}

#[tokio::test]
async fn non_numeric_ids_and_queries_are_bad_requests() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::create_user(&state, "curator", true).await?;
    let app = create_app(state);
    let admin_token = common::bearer(&admin);

    let (status, body) = common::send(
        &app,
        "PUT",
        "/api/admin/mixes/abc/tracks",
        Some(&admin_token),
        Some(json!({ "tracks": [] })),
    )
    .await;
    assert_bad_request(status, &body);

    let (status, body) = common::send(&app, "GET", "/api/mixes/abc", None, None).await;
    assert_bad_request(status, &body);

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/admin/users/not-a-uuid/ban",
        Some(&admin_token),
        Some(json!({ "banned": true })),
    )
    .await;
    assert_bad_request(status, &body);

    let (status, body) = common::send(&app, "GET", "/api/mixes?page=abc", None, None).await;
    assert_bad_request(status, &body);
    Ok(())
}

#[tokio::test]
async fn huge_page_numbers_are_capped() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    common::insert_mix(&state, 1, "Pete Tong", "1993-10-30", None).await?;
    let app = create_app(state);

    let (status, body) =
        common::send(&app, "GET", "/api/mixes?page=9223372036854775807", None, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["meta"]["page"], MAX_PAGE);
    assert_eq!(body["meta"]["total"], 1);
    assert!(body["data"]["items"].as_array().is_some_and(|items| items.is_empty()));
    Ok(())
}
