use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit,
    dto::reviews::{
        AdminReview, AdminReviewList, CreateReviewRequest, ReviewCreated, ReviewList,
        ReviewMixSummary,
    },
    entity::{Mixes, Reviews, Users, mixes, reviews},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_not_banned},
    models::Review,
    query,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub const MIN_REVIEW_LEN: usize = 3;
pub const MAX_REVIEW_LEN: usize = 2000;

pub fn validate_review(payload: &CreateReviewRequest) -> AppResult<String> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
    }
    let text = payload.text.trim();
    let len = text.chars().count();
    if len < MIN_REVIEW_LEN {
        return Err(AppError::BadRequest("Review text is too short".into()));
    }
    if len > MAX_REVIEW_LEN {
        return Err(AppError::BadRequest(format!(
            "Review text must be at most {MAX_REVIEW_LEN} characters"
        )));
    }
    Ok(text.to_string())
}

pub async fn list_reviews(
    state: &AppState,
    number: i32,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReviewList>> {
    let (page, per_page, offset) = pagination.normalize();
    let mix = Mixes::find()
        .filter(mixes::Column::Number.eq(number))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let finder = Reviews::find()
        .filter(reviews::Column::MixId.eq(mix.id))
        .order_by_desc(reviews::Column::CreatedAt)
        .order_by_desc(reviews::Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}

/// Store a review and refresh the mix's rating aggregate in one transaction.
pub async fn create_review(
    state: &AppState,
    user: &AuthUser,
    number: i32,
    payload: CreateReviewRequest,
) -> AppResult<ApiResponse<ReviewCreated>> {
    // ban flag comes from the store, not the token
    let author = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
    ensure_not_banned(&AuthUser::from(author.clone()))?;

    let body = validate_review(&payload)?;
    let mix = Mixes::find()
        .filter(mixes::Column::Number.eq(number))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let txn = state.orm.begin().await?;
    let review = reviews::ActiveModel {
        mix_id: Set(mix.id),
        user_id: Set(Some(author.id)),
        user_name: Set(author.name.clone()),
        rating: Set(payload.rating),
        body: Set(body),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    let stats = query::recompute_mix_rating(&txn, mix.id).await?;
    txn.commit().await?;

    tracing::info!(mix_id = mix.id, review_id = review.id, rating = stats.average, "review added");
    audit::record(
        &state.orm,
        Some(author.id),
        "review_create",
        "reviews",
        serde_json::json!({ "review_id": review.id, "mix_id": mix.id }),
    )
    .await;

    let data = ReviewCreated {
        review: Review::from(review),
        mix_rating: stats.average,
        mix_rating_count: stats.count,
    };
    Ok(ApiResponse::success("Review created", data, Some(Meta::empty())))
}

pub async fn admin_list_reviews(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<AdminReviewList>> {
    ensure_admin(user)?;
    let (page, per_page, offset) = pagination.normalize();

    let total = Reviews::find().count(&state.orm).await? as i64;
    let items = Reviews::find()
        .find_also_related(Mixes)
        .order_by_desc(reviews::Column::CreatedAt)
        .order_by_desc(reviews::Column::Id)
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(review, mix)| AdminReview {
            review: Review::from(review),
            mix: mix.map(|m| ReviewMixSummary {
                id: m.id,
                number: m.number,
                artist: m.artist,
            }),
        })
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Reviews", AdminReviewList { items }, Some(meta)))
}

/// Delete a review and refresh its mix's rating aggregate in one transaction.
pub async fn admin_delete_review(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let review = Reviews::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let txn = state.orm.begin().await?;
    Reviews::delete_by_id(id).exec(&txn).await?;
    let stats = query::recompute_mix_rating(&txn, review.mix_id).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "review_delete",
        "reviews",
        serde_json::json!({ "review_id": id, "mix_id": review.mix_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({
            "id": id,
            "mix_id": review.mix_id,
            "mix_rating": stats.average,
            "mix_rating_count": stats.count,
        }),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(rating: i32, text: &str) -> CreateReviewRequest {
        CreateReviewRequest {
            rating,
            text: text.to_string(),
        }
    }

    #[test]
    fn rating_and_text_bounds() {
        assert!(validate_review(&req(0, "great set")).is_err());
        assert!(validate_review(&req(6, "great set")).is_err());
        assert!(validate_review(&req(5, "  ok ")).is_err());
        assert!(validate_review(&req(3, &"a".repeat(2001))).is_err());
        assert_eq!(validate_review(&req(1, " solid ")).unwrap(), "solid");
    }
}
