use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{library_entries, mixes, recommended_mixes, reviews, tracks, users};

/// Public view of an account. The password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub is_admin: bool,
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Mix {
    pub id: i32,
    pub number: i32,
    pub artist: String,
    pub title: Option<String>,
    pub release_date: NaiveDate,
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
    pub rating: f64,
    pub rating_count: i32,
    /// Editorial priority when the mix is recommended.
    pub recommended_priority: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Track {
    pub id: i32,
    pub mix_id: i32,
    pub index: i32,
    pub timecode_seconds: i32,
    pub title: String,
    pub artist: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub id: i32,
    pub mix_id: i32,
    pub user_id: Option<Uuid>,
    pub user_name: String,
    pub rating: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LibraryEntry {
    pub id: i32,
    pub user_id: Uuid,
    pub mix_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendedMix {
    pub id: i32,
    pub mix_id: i32,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_admin: model.is_admin,
            is_banned: model.is_banned,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl Mix {
    pub fn from_entity(model: mixes::Model, recommended: Option<recommended_mixes::Model>) -> Self {
        Self {
            id: model.id,
            number: model.number,
            artist: model.artist,
            title: model.title,
            release_date: model.release_date,
            bio: model.bio,
            duration_seconds: model.duration_seconds,
            audio_path: model.audio_path,
            artwork_url: model.artwork_url,
            hero_image_url: model.hero_image_url,
            external_url: model.external_url,
            soundcloud_url: model.soundcloud_url,
            mixcloud_url: model.mixcloud_url,
            youtube_url: model.youtube_url,
            spotify_url: model.spotify_url,
            genre: model.genre,
            bpm_low: model.bpm_low,
            bpm_high: model.bpm_high,
            location: model.location,
            rating: model.rating,
            rating_count: model.rating_count,
            recommended_priority: recommended.map(|r| r.priority),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<mixes::Model> for Mix {
    fn from(model: mixes::Model) -> Self {
        Self::from_entity(model, None)
    }
}

impl From<(mixes::Model, Option<recommended_mixes::Model>)> for Mix {
    fn from((model, recommended): (mixes::Model, Option<recommended_mixes::Model>)) -> Self {
        Self::from_entity(model, recommended)
    }
}

impl From<tracks::Model> for Track {
    fn from(model: tracks::Model) -> Self {
        Self {
            id: model.id,
            mix_id: model.mix_id,
            index: model.index,
            timecode_seconds: model.timecode_seconds,
            title: model.title,
            artist: model.artist,
            label: model.label,
        }
    }
}

impl From<reviews::Model> for Review {
    fn from(model: reviews::Model) -> Self {
        Self {
            id: model.id,
            mix_id: model.mix_id,
            user_id: model.user_id,
            user_name: model.user_name,
            rating: model.rating,
            body: model.body,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<library_entries::Model> for LibraryEntry {
    fn from(model: library_entries::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            mix_id: model.mix_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<recommended_mixes::Model> for RecommendedMix {
    fn from(model: recommended_mixes::Model) -> Self {
        Self {
            id: model.id,
            mix_id: model.mix_id,
            priority: model.priority,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
