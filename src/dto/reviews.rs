use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Review;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewCreated {
    pub review: Review,
    pub mix_rating: f64,
    pub mix_rating_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<Review>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewMixSummary {
    pub id: i32,
    pub number: i32,
    pub artist: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminReview {
    #[serde(flatten)]
    pub review: Review,
    pub mix: Option<ReviewMixSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminReviewList {
    pub items: Vec<AdminReview>,
}
