use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    config::SuperAdminConfig,
    entity::{Users, users},
    error::AppResult,
    services::auth_service::hash_password,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Disabled,
    Created,
    Updated,
}

/// Make sure the configured super admin exists, is an admin and is not banned.
pub async fn ensure_super_admin<C: ConnectionTrait>(
    conn: &C,
    config: &SuperAdminConfig,
) -> AppResult<BootstrapOutcome> {
    let username = config.username.trim();
    if !config.enabled || username.is_empty() || config.password.is_empty() {
        tracing::debug!("super admin bootstrap skipped");
        return Ok(BootstrapOutcome::Disabled);
    }

    let now = Utc::now();
    let existing = Users::find()
        .filter(users::Column::Name.eq(username))
        .one(conn)
        .await?;

    match existing {
        None => {
            users::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(username.to_string()),
                password_hash: Set(hash_password(&config.password)?),
                is_admin: Set(true),
                is_banned: Set(false),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(conn)
            .await?;
            tracing::info!(username, "super admin created");
            Ok(BootstrapOutcome::Created)
        }
        Some(user) => {
            let mut active: users::ActiveModel = user.into();
            active.is_admin = Set(true);
            active.is_banned = Set(false);
            if config.reset_password_on_boot {
                active.password_hash = Set(hash_password(&config.password)?);
            }
            active.updated_at = Set(now.into());
            active.update(conn).await?;
            tracing::info!(
                username,
                password_reset = config.reset_password_on_boot,
                "super admin ensured"
            );
            Ok(BootstrapOutcome::Updated)
        }
    }
}
