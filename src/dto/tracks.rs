use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Track;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TrackInput {
    pub title: Option<String>,
    pub timecode_seconds: Option<f64>,
    pub artist: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceTracksRequest {
    pub tracks: Vec<TrackInput>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplaceTracksResponse {
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackList {
    pub items: Vec<Track>,
}
