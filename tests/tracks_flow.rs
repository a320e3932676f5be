mod common;

use mix_archive_api::{
    dto::tracks::{ReplaceTracksRequest, TrackInput},
    error::AppError,
    services::track_service,
};

fn track(title: &str, time: f64) -> TrackInput {
    TrackInput {
        title: Some(title.into()),
        timecode_seconds: Some(time),
        artist: Some(" Orbital ".into()),
        label: None,
    }
}

#[tokio::test]
async fn replace_assigns_indexes_and_empty_clears() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::create_user(&state, "curator", true).await?;
    let auth = common::auth(&admin);
    let mix = common::insert_mix(&state, 1, "Pete Tong", "1993-10-30", None).await?;

    let saved = track_service::replace_tracks(
        &state,
        &auth,
        mix.id,
        ReplaceTracksRequest {
            tracks: vec![track("Chime", 0.0), track("Halcyon", 312.7), track("Belfast", 640.0)],
        },
    )
    .await?;
    assert_eq!(saved.data.expect("count").count, 3);

    let listed = track_service::list_tracks(&state, &auth, mix.id)
        .await?
        .data
        .expect("tracks")
        .items;
    let indexes: Vec<i32> = listed.iter().map(|t| t.index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
    assert_eq!(listed[1].title, "Halcyon");
    assert_eq!(listed[1].timecode_seconds, 312);
    assert_eq!(listed[1].artist.as_deref(), Some("Orbital"));

    // replacing again must not collide with the previous (mix_id, index) rows
    track_service::replace_tracks(
        &state,
        &auth,
        mix.id,
        ReplaceTracksRequest {
            tracks: vec![track("Only", 10.0)],
        },
    )
    .await?;
    let listed = track_service::list_tracks(&state, &auth, mix.id).await?.data.expect("tracks");
    assert_eq!(listed.items.len(), 1);

    let cleared = track_service::replace_tracks(
        &state,
        &auth,
        mix.id,
        ReplaceTracksRequest { tracks: Vec::new() },
    )
    .await?;
    assert_eq!(cleared.data.expect("count").count, 0);
    let listed = track_service::list_tracks(&state, &auth, mix.id).await?.data.expect("tracks");
    assert!(listed.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_rows_leave_tracklist_untouched() -> anyhow::Result<()> {
    let state = common::setup_state().await?;
    let admin = common::create_user(&state, "curator", true).await?;
    let auth = common::auth(&admin);
    let mix = common::insert_mix(&state, 1, "Pete Tong", "1993-10-30", None).await?;

    track_service::replace_tracks(
        &state,
        &auth,
        mix.id,
        ReplaceTracksRequest {
            tracks: vec![track("Keep me", 0.0)],
        },
    )
    .await?;

    let result = track_service::replace_tracks(
        &state,
        &auth,
        mix.id,
        ReplaceTracksRequest {
            tracks: vec![track("", 0.0), track("Late", -5.0)],
        },
    )
    .await;
    match result {
        Err(AppError::Validation { message, issues }) => {
            assert_eq!(message, "Validation failed");
            assert_eq!(issues.len(), 2);
            assert_eq!(issues[0].field, "title");
            assert_eq!(issues[1].index, 1);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let too_many = track_service::replace_tracks(
        &state,
        &auth,
        mix.id,
        ReplaceTracksRequest {
            tracks: vec![track("Loop", 1.0); 301],
        },
    )
    .await;
    assert!(matches!(too_many, Err(AppError::BadRequest(_))));

    let listed = track_service::list_tracks(&state, &auth, mix.id).await?.data.expect("tracks");
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].title, "Keep me");

    let missing = track_service::replace_tracks(
        &state,
        &auth,
        9999,
        ReplaceTracksRequest { tracks: Vec::new() },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}
