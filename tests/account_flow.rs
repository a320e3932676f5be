mod common;

use mix_archive_api::{
    bootstrap::{BootstrapOutcome, ensure_super_admin},
    dto::{
        account::UpdateProfileRequest,
        admin::{SetAdminRequest, SetBanRequest},
        auth::LoginRequest,
    },
    entity::{Users, users},
    error::AppError,
    routes::params::Pagination,
    services::{account_service, admin_service, auth_service},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

fn rename(name: &str) -> UpdateProfileRequest {
    UpdateProfileRequest {
        name: Some(name.into()),
    }
}

#[tokio::test]
async fn profile_rename_rules() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "listener", false).await?;
    common::create_user(&state, "taken", false).await?;
    let auth = common::auth(&user);

    let renamed = account_service::update_profile(&state, &auth, rename("  Night Owl  "))
        .await?
        .data
        .expect("user");
    assert_eq!(renamed.name, "Night Owl");

    let blank = account_service::update_profile(&state, &auth, rename("   ")).await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    let long = account_service::update_profile(&state, &auth, rename(&"n".repeat(61))).await;
    assert!(matches!(long, Err(AppError::BadRequest(_))));

    let reserved =
        account_service::update_profile(&state, &auth, rename("EssentialMixAdmin")).await;
    assert!(matches!(reserved, Err(AppError::BadRequest(_))));

    let duplicate = account_service::update_profile(&state, &auth, rename("taken")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn super_admin_bootstrap_and_protection() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let config = state.config.super_admin.clone();

    assert_eq!(ensure_super_admin(&state.orm, &config).await?, BootstrapOutcome::Created);
    assert_eq!(ensure_super_admin(&state.orm, &config).await?, BootstrapOutcome::Updated);

    let root = Users::find()
        .filter(users::Column::Name.eq(common::SUPER_ADMIN))
        .one(&state.orm)
        .await?
        .expect("super admin");
    assert!(root.is_admin);

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            username: common::SUPER_ADMIN.into(),
            password: "rootpass".into(),
        },
    )
    .await?;
    assert!(login.data.expect("login").user.is_admin);

    let admin = common::create_user(&state, "curator", true).await?;
    let auth = common::auth(&admin);

    let demote = admin_service::set_admin(&state, &auth, root.id, SetAdminRequest { admin: false }).await;
    assert!(matches!(demote, Err(AppError::BadRequest(_))));
    let ban = admin_service::set_ban(&state, &auth, root.id, SetBanRequest { banned: true }).await;
    assert!(matches!(ban, Err(AppError::BadRequest(_))));

    // the super admin may keep their own reserved name
    let own = account_service::update_profile(
        &state,
        &common::auth(&root),
        rename("EssentialMixAdmin"),
    )
    .await?;
    assert_eq!(own.data.expect("user").name, "EssentialMixAdmin");

    let disabled = mix_archive_api::config::SuperAdminConfig {
        enabled: false,
        ..config
    };
    assert_eq!(ensure_super_admin(&state.orm, &disabled).await?, BootstrapOutcome::Disabled);
    Ok(())
}

#[tokio::test]
async fn admins_manage_roles_and_bans() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::create_user(&state, "curator", true).await?;
    let user = common::create_user(&state, "listener", false).await?;
    let auth = common::auth(&admin);

    let promoted = admin_service::set_admin(&state, &auth, user.id, SetAdminRequest { admin: true })
        .await?
        .data
        .expect("user");
    assert!(promoted.is_admin);

    let banned = admin_service::set_ban(&state, &auth, user.id, SetBanRequest { banned: true })
        .await?
        .data
        .expect("user");
    assert!(banned.is_banned);

    let users = admin_service::list_users(&state, &auth, Pagination::default()).await?;
    assert_eq!(users.meta.clone().expect("meta").total, Some(2));

    let missing = admin_service::set_ban(
        &state,
        &auth,
        uuid::Uuid::new_v4(),
        SetBanRequest { banned: true },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    let denied =
        admin_service::list_users(&state, &common::auth(&user), Pagination::default()).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
    Ok(())
}
