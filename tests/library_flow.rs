mod common;

use mix_archive_api::{
    dto::library::AddLibraryRequest,
    error::AppError,
    services::{account_service, library_service},
};

#[tokio::test]
async fn add_twice_then_remove_twice() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let mix = common::insert_mix(&state, 9, "Four Tet", "2020-02-01", None).await?;
    let user = common::create_user(&state, "collector", false).await?;
    let auth = common::auth(&user);

    let first = library_service::add_to_library(&state, &auth, AddLibraryRequest { mix_id: mix.id })
        .await?
        .data
        .expect("entry");
    let second = library_service::add_to_library(&state, &auth, AddLibraryRequest { mix_id: mix.id })
        .await?
        .data
        .expect("entry");
    assert_eq!(first.id, second.id);

    let listed = library_service::list_library(&state, &auth).await?.data.expect("library");
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].mix.as_ref().map(|m| m.number), Some(9));

    let account = account_service::get_account(&state, &auth).await?.data.expect("account");
    assert_eq!(account.library_count, 1);

    let removed = library_service::remove_from_library(&state, &auth, mix.id)
        .await?
        .data
        .expect("removal");
    assert!(removed.removed);
    let removed = library_service::remove_from_library(&state, &auth, mix.id)
        .await?
        .data
        .expect("removal");
    assert!(!removed.removed);

    let listed = library_service::list_library(&state, &auth).await?.data.expect("library");
    assert!(listed.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_mix_is_not_found() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let user = common::create_user(&state, "collector", false).await?;

    let result =
        library_service::add_to_library(&state, &common::auth(&user), AddLibraryRequest { mix_id: 404 })
            .await;
    assert!(matches!(result, Err(AppError::NotFound)));
    Ok(())
}
