mod common;

use mix_archive_api::{
    dto::reviews::CreateReviewRequest,
    entity::{Mixes, Reviews, users},
    error::AppError,
    routes::params::Pagination,
    services::review_service,
};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

fn review(rating: i32, text: &str) -> CreateReviewRequest {
    CreateReviewRequest {
        rating,
        text: text.into(),
    }
}

#[tokio::test]
async fn rating_is_the_mean_of_all_reviews() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let mix = common::insert_mix(&state, 4, "Carl Cox", "1994-01-01", None).await?;
    let first = common::create_user(&state, "raver", false).await?;
    let second = common::create_user(&state, "digger", false).await?;

    review_service::create_review(&state, &common::auth(&first), 4, review(3, "Decent set")).await?;
    let created =
        review_service::create_review(&state, &common::auth(&second), 4, review(5, "All time great"))
            .await?
            .data
            .expect("review");
    assert_eq!(created.mix_rating, 4.0);
    assert_eq!(created.mix_rating_count, 2);
    assert_eq!(created.review.user_name, "digger");

    let stored = Mixes::find_by_id(mix.id).one(&state.orm).await?.expect("mix");
    assert_eq!(stored.rating, 4.0);
    assert_eq!(stored.rating_count, 2);

    let listed = review_service::list_reviews(&state, 4, Pagination::new(1, 10)).await?;
    assert_eq!(listed.meta.clone().expect("meta").total, Some(2));
    let items = listed.data.expect("reviews").items;
    assert_eq!(items[0].body, "All time great");
    Ok(())
}

#[tokio::test]
async fn invalid_reviews_are_rejected() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    common::insert_mix(&state, 1, "Pete Tong", "1993-10-30", None).await?;
    let user = common::create_user(&state, "raver", false).await?;
    let auth = common::auth(&user);

    let too_long = "x".repeat(2001);
    for bad in [
        review(0, "Too low"),
        review(6, "Too high"),
        review(3, "no"),
        review(3, &too_long),
    ] {
        let result = review_service::create_review(&state, &auth, 1, bad).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
    assert_eq!(Reviews::find().count(&state.orm).await?, 0);

    let longest = "y".repeat(2000);
    let created = review_service::create_review(&state, &auth, 1, review(3, &longest)).await?;
    assert_eq!(created.data.expect("review").review.body.len(), 2000);
    let missing = review_service::create_review(&state, &auth, 99, review(4, "Where is it")).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn banned_users_cannot_review() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    common::insert_mix(&state, 1, "Pete Tong", "1993-10-30", None).await?;
    let user = common::create_user(&state, "troll", false).await?;
    // a session issued before the ban still carries is_banned = false
    let stale = common::auth(&user);

    let mut active: users::ActiveModel = user.into();
    active.is_banned = Set(true);
    active.update(&state.orm).await?;

    let result = review_service::create_review(&state, &stale, 1, review(1, "Spam spam")).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    Ok(())
}

#[tokio::test]
async fn deleting_a_review_recomputes_the_rating() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let mix = common::insert_mix(&state, 4, "Carl Cox", "1994-01-01", None).await?;
    let admin = common::create_user(&state, "curator", true).await?;
    let user = common::create_user(&state, "raver", false).await?;

    let low = review_service::create_review(&state, &common::auth(&user), 4, review(1, "Not for me"))
        .await?
        .data
        .expect("review");
    review_service::create_review(&state, &common::auth(&user), 4, review(5, "Changed my mind")).await?;

    let admin_auth = common::auth(&admin);
    let listing = review_service::admin_list_reviews(&state, &admin_auth, Pagination::default())
        .await?
        .data
        .expect("reviews");
    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.items[0].mix.as_ref().map(|m| m.number), Some(4));

    review_service::admin_delete_review(&state, &admin_auth, low.review.id).await?;
    let stored = Mixes::find_by_id(mix.id).one(&state.orm).await?.expect("mix");
    assert_eq!(stored.rating, 5.0);
    assert_eq!(stored.rating_count, 1);

    let again = review_service::admin_delete_review(&state, &admin_auth, low.review.id).await;
    assert!(matches!(again, Err(AppError::NotFound)));

    let denied =
        review_service::admin_list_reviews(&state, &common::auth(&user), Pagination::default()).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
    Ok(())
}
