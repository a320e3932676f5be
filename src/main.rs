use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::net::SocketAddr;

use mix_archive_api::{
    bootstrap::ensure_super_admin, config::AppConfig, db::sync_schema_with_retry,
    routes::create_app, state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mix_archive_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = sync_schema_with_retry(
        &config.database_url,
        config.schema_sync_attempts,
        config.schema_sync_delay,
    )
    .await?;
    ensure_super_admin(&orm, &config.super_admin).await?;

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let app = create_app(AppState::new(orm, config));

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
