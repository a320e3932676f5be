mod common;

use axum::http::StatusCode;
use mix_archive_api::routes::{create_app, health::health_check};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
}

#[tokio::test]
async fn router_serves_health_and_fallback() -> anyhow::Result<()> {
    let app = create_app(common::setup_state().await?);

    let (status, body) = common::send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (status, body) = common::send(&app, "GET", "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/nowhere");
    Ok(())
}
