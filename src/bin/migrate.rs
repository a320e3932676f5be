use mix_archive_api::{
    bootstrap::ensure_super_admin, config::AppConfig, db::sync_schema_with_retry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = sync_schema_with_retry(
        &config.database_url,
        config.schema_sync_attempts,
        config.schema_sync_delay,
    )
    .await?;
    let outcome = ensure_super_admin(&orm, &config.super_admin).await?;
    println!("Migrations applied, super admin: {outcome:?}");
    Ok(())
}
