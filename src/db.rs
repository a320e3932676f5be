use std::time::Duration;

use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::migration::Migrator;

pub type OrmConn = DatabaseConnection;

/// Create a SeaORM connection.
///
/// In-memory SQLite databases live inside a single connection, so the pool is
/// pinned to one connection for them.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url.to_owned());
    if database_url.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(10)
            .min_connections(0)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(10));
    }
    opts.sqlx_logging(false);

    let conn = Database::connect(opts).await?;
    Ok(conn)
}

/// Apply pending migrations.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(conn, None).await
}

/// Connect and bring the schema up to date, retrying a bounded number of
/// times while the database is still coming up.
pub async fn sync_schema_with_retry(
    database_url: &str,
    attempts: u32,
    delay: Duration,
) -> Result<DatabaseConnection> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = async {
            let conn = create_orm_conn(database_url).await?;
            run_migrations(&conn).await?;
            anyhow::Ok(conn)
        }
        .await;

        match result {
            Ok(conn) => {
                tracing::info!(attempt, "database schema in sync");
                return Ok(conn);
            }
            Err(err) if attempt < attempts => {
                tracing::warn!(attempt, attempts, error = %err, "schema sync failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                tracing::error!(attempt, error = %err, "schema sync failed, giving up");
                return Err(err);
            }
        }
    }
}
