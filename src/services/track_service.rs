use sea_orm::{EntityTrait, Set, TransactionTrait};

use crate::{
    audit,
    dto::tracks::{ReplaceTracksRequest, ReplaceTracksResponse, TrackInput, TrackList},
    entity::{Mixes, tracks},
    error::{AppError, AppResult, FieldIssue},
    middleware::auth::{AuthUser, ensure_admin},
    models::Track,
    query,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MAX_TRACKS: usize = 300;
pub const MAX_TIMECODE_SECONDS: f64 = 8.0 * 3600.0;
const MAX_TITLE_LEN: usize = 300;
const MAX_CREDIT_LEN: usize = 200;

/// A tracklist row that passed validation, positioned at `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanTrack {
    pub index: i32,
    pub timecode_seconds: i32,
    pub title: String,
    pub artist: Option<String>,
    pub label: Option<String>,
}

fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn credit(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| truncate(s, MAX_CREDIT_LEN))
}

/// Validate and normalise a submitted tracklist, collecting every problem.
pub fn sanitize_tracks(rows: &[TrackInput]) -> Result<Vec<CleanTrack>, Vec<FieldIssue>> {
    let mut issues = Vec::new();
    let mut clean = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let title = row.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            issues.push(FieldIssue::new(idx, "title", "Title required"));
        }

        let mut time = row.timecode_seconds.filter(|t| t.is_finite()).unwrap_or(0.0);
        if time < 0.0 {
            issues.push(FieldIssue::new(idx, "timecode_seconds", "Cannot be negative"));
            time = 0.0;
        }
        if time > MAX_TIMECODE_SECONDS {
            issues.push(FieldIssue::new(idx, "timecode_seconds", "Unrealistic (> 8h)"));
        }

        clean.push(CleanTrack {
            index: idx as i32,
            timecode_seconds: time.floor() as i32,
            title: truncate(title, MAX_TITLE_LEN),
            artist: credit(row.artist.as_deref()),
            label: credit(row.label.as_deref()),
        });
    }

    if issues.is_empty() {
        Ok(clean)
    } else {
        Err(issues)
    }
}

pub async fn list_tracks(
    state: &AppState,
    user: &AuthUser,
    mix_id: i32,
) -> AppResult<ApiResponse<TrackList>> {
    ensure_admin(user)?;
    let items = query::tracklist(&state.orm, mix_id)
        .await?
        .into_iter()
        .map(Track::from)
        .collect();
    Ok(ApiResponse::success("Tracks", TrackList { items }, None))
}

/// Replace the whole tracklist of a mix in one transaction.
pub async fn replace_tracks(
    state: &AppState,
    user: &AuthUser,
    mix_id: i32,
    payload: ReplaceTracksRequest,
) -> AppResult<ApiResponse<ReplaceTracksResponse>> {
    ensure_admin(user)?;
    if payload.tracks.len() > MAX_TRACKS {
        return Err(AppError::BadRequest(format!(
            "Too many tracks (max {MAX_TRACKS})"
        )));
    }

    let clean = sanitize_tracks(&payload.tracks).map_err(|issues| AppError::Validation {
        message: "Validation failed".into(),
        issues,
    })?;

    let rows = clean
        .into_iter()
        .map(|t| tracks::ActiveModel {
            mix_id: Set(mix_id),
            index: Set(t.index),
            timecode_seconds: Set(t.timecode_seconds),
            title: Set(t.title),
            artist: Set(t.artist),
            label: Set(t.label),
            ..Default::default()
        })
        .collect();

    if Mixes::find_by_id(mix_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let txn = state.orm.begin().await?;
    let count = query::replace_tracklist(&txn, mix_id, rows).await?;
    txn.commit().await?;

    tracing::debug!(mix_id, count, "tracklist replaced");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "tracks_replace",
        "tracks",
        serde_json::json!({ "mix_id": mix_id, "count": count }),
    )
    .await;

    Ok(ApiResponse::success(
        "Tracks saved",
        ReplaceTracksResponse { count },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, time: Option<f64>) -> TrackInput {
        TrackInput {
            title: Some(title.to_string()),
            timecode_seconds: time,
            ..Default::default()
        }
    }

    #[test]
    fn indexes_follow_submission_order() {
        let clean = sanitize_tracks(&[row("Intro", None), row("Outro", Some(125.9))]).unwrap();
        assert_eq!(clean[0].index, 0);
        assert_eq!(clean[0].timecode_seconds, 0);
        assert_eq!(clean[1].index, 1);
        assert_eq!(clean[1].timecode_seconds, 125);
    }

    #[test]
    fn collects_every_issue() {
        let issues = sanitize_tracks(&[
            row("  ", Some(10.0)),
            row("Fine", Some(-3.0)),
            row("Long", Some(9.0 * 3600.0)),
        ])
        .unwrap_err();
        assert_eq!(
            issues,
            vec![
                FieldIssue::new(0, "title", "Title required"),
                FieldIssue::new(1, "timecode_seconds", "Cannot be negative"),
                FieldIssue::new(2, "timecode_seconds", "Unrealistic (> 8h)"),
            ]
        );
    }

    #[test]
    fn credits_are_trimmed_and_truncated() {
        let input = TrackInput {
            title: Some("x".repeat(400)),
            artist: Some("   ".into()),
            label: Some(format!(" {} ", "L".repeat(250))),
            ..Default::default()
        };
        let clean = sanitize_tracks(&[input]).unwrap();
        assert_eq!(clean[0].title.chars().count(), 300);
        assert_eq!(clean[0].artist, None);
        assert_eq!(clean[0].label.as_ref().map(|l| l.len()), Some(200));
    }

    #[test]
    fn empty_list_is_valid() {
        assert!(sanitize_tracks(&[]).unwrap().is_empty());
    }
}
