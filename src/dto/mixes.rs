use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{Mix, RecommendedMix, Review, Track},
    query::ArtistCount,
};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MixList {
    pub items: Vec<Mix>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MixDetail {
    pub mix: Mix,
    pub tracks: Vec<Track>,
    /// The five newest reviews.
    pub reviews: Vec<Review>,
    pub recommended: Option<RecommendedMix>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RelatedMixes {
    pub same_genre: Vec<Mix>,
    pub you_might_like: Vec<Mix>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArtistList {
    pub items: Vec<ArtistCount>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MixMilestone {
    pub number: i32,
    pub artist: String,
    pub release_date: chrono::NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArchiveStats {
    pub mixes: i64,
    pub tracks: i64,
    pub reviews: i64,
    pub users: i64,
    pub library_entries: i64,
    pub recommended: i64,
    pub first_mix: Option<MixMilestone>,
    pub latest_mix: Option<MixMilestone>,
}

/// Media fields editable on `PATCH /api/mixes/{number}`. `null` or `""` clears a field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMixMediaRequest {
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub duration_seconds: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub audio_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub external_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub soundcloud_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub mixcloud_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub youtube_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub spotify_url: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateMixRequest {
    pub number: Option<i32>,
    pub artist: Option<String>,
    pub title: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub release_date: Option<String>,
    pub bio: Option<String>,
    pub duration_seconds: Option<i32>,
    pub audio_path: Option<String>,
    pub artwork_url: Option<String>,
    pub hero_image_url: Option<String>,
    pub external_url: Option<String>,
    pub soundcloud_url: Option<String>,
    pub mixcloud_url: Option<String>,
    pub youtube_url: Option<String>,
    pub spotify_url: Option<String>,
    pub genre: Option<String>,
    pub bpm_low: Option<i32>,
    pub bpm_high: Option<i32>,
    pub location: Option<String>,
}

/// Admin partial update. Absent fields are untouched; `null` or `""` clears optional ones.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMixRequest {
    pub number: Option<i32>,
    pub artist: Option<String>,
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub duration_seconds: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub audio_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub artwork_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub hero_image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub external_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub soundcloud_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub mixcloud_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub youtube_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub spotify_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub genre: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub bpm_low: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i32>)]
    pub bpm_high: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecommendRequest {
    #[serde(default)]
    pub priority: i32,
}
