use std::{env, time::Duration};

const DEFAULT_SQLITE_PATH: &str = "./data/mixes.db";
const DEFAULT_SUPER_ADMIN: &str = "essentialmixadmin";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub schema_sync_attempts: u32,
    pub schema_sync_delay: Duration,
    pub super_admin: SuperAdminConfig,
}

/// Settings for the one-time super admin account created at startup.
#[derive(Debug, Clone)]
pub struct SuperAdminConfig {
    pub enabled: bool,
    pub username: String,
    pub password: String,
    pub reset_password_on_boot: bool,
}

impl SuperAdminConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("SUPER_ADMIN_BOOTSTRAP", true),
            username: env::var("SUPER_ADMIN_USERNAME")
                .map(|u| u.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_SUPER_ADMIN.to_string()),
            password: env::var("SUPER_ADMIN_PASSWORD")
                .map(|p| p.trim().to_string())
                .unwrap_or_default(),
            reset_password_on_boot: env_flag("SUPER_ADMIN_RESET_PASSWORD_ON_BOOT", false),
        }
    }

    /// Whether `name` collides with the reserved super admin username.
    pub fn is_reserved_name(&self, name: &str) -> bool {
        !self.username.is_empty() && self.username.eq_ignore_ascii_case(name.trim())
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = resolve_database_url(
            env::var("DATABASE_URL").ok().as_deref(),
            env::var("SQLITE_PATH").ok().as_deref(),
        );
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let schema_sync_attempts = env::var("SCHEMA_SYNC_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(12)
            .max(1);
        let schema_sync_delay = env::var("SCHEMA_SYNC_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(2));

        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            schema_sync_attempts,
            schema_sync_delay,
            super_admin: SuperAdminConfig::from_env(),
        })
    }
}

/// Map the configured database location onto a SeaORM connection URL.
///
/// `postgres://` and `sqlite:` URLs pass through untouched, `file:<path>`
/// selects a SQLite file, anything else falls back to `SQLITE_PATH` or the
/// bundled default path.
pub fn resolve_database_url(database_url: Option<&str>, sqlite_path: Option<&str>) -> String {
    let url = database_url.map(str::trim).unwrap_or_default();
    if url.starts_with("postgres://") || url.starts_with("postgresql://") || url.starts_with("sqlite:") {
        return url.to_string();
    }
    let path = match url.strip_prefix("file:") {
        Some(rel) if !rel.is_empty() => rel,
        _ => sqlite_path
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_SQLITE_PATH),
    };
    format!("sqlite://{path}?mode=rwc")
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => v.trim() == "1",
        Err(_) => default,
    }
}
