use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::OnConflict;

use crate::{
    audit,
    dto::mixes::{
        ArchiveStats, ArtistList, CreateMixRequest, MixDetail, MixList, MixMilestone,
        RecommendRequest, RelatedMixes, UpdateMixMediaRequest, UpdateMixRequest,
    },
    entity::{
        LibraryEntries, Mixes, RecommendedMixes, Reviews, Tracks, Users, library_entries, mixes,
        recommended_mixes, reviews, tracks,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Mix, RecommendedMix, Review, Track},
    query::{self, MixFilter, MixOrder, MixQuery},
    response::{ApiResponse, Meta},
    routes::params::{AdminMixQuery, ArtistQuery, MIX_PAGE_SIZE, MixListQuery, SortOrder},
    state::AppState,
};

pub const LATEST_LIMIT: u64 = 6;
pub const RECOMMENDED_LIMIT: u64 = 16;
pub const RELATED_LIMIT: u64 = 6;
pub const DETAIL_REVIEW_LIMIT: u64 = 5;
pub const MAX_ARTIST_LEN: usize = 200;
pub const MAX_BIO_LEN: usize = 10_000;

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_release_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| AppError::BadRequest(format!("Invalid release date: {raw}")))
}

/// Trimmed text, `None` when blank.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A patched optional text field: `null` and `""` both clear it.
fn patch_text(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(clean)
}

fn non_negative(field: &str, value: Option<i32>) -> AppResult<Option<i32>> {
    match value {
        Some(v) if v < 0 => Err(AppError::BadRequest(format!("{field} cannot be negative"))),
        other => Ok(other),
    }
}

fn validate_artist(raw: &str) -> AppResult<String> {
    let artist = raw.trim();
    if artist.is_empty() {
        return Err(AppError::BadRequest("Artist is required".into()));
    }
    if artist.chars().count() > MAX_ARTIST_LEN {
        return Err(AppError::BadRequest(format!(
            "Artist must be at most {MAX_ARTIST_LEN} characters"
        )));
    }
    Ok(artist.to_string())
}

fn validate_bio(bio: Option<String>) -> AppResult<Option<String>> {
    let bio = clean(bio);
    if bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_LEN) {
        return Err(AppError::BadRequest(format!(
            "Bio must be at most {MAX_BIO_LEN} characters"
        )));
    }
    Ok(bio)
}

fn validate_number(number: i32) -> AppResult<i32> {
    if number <= 0 {
        return Err(AppError::BadRequest("Number must be a positive integer".into()));
    }
    Ok(number)
}

async fn find_by_number<C: ConnectionTrait>(conn: &C, number: i32) -> AppResult<mixes::Model> {
    Mixes::find()
        .filter(mixes::Column::Number.eq(number))
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)
}

async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<mixes::Model> {
    Mixes::find_by_id(id).one(conn).await?.ok_or(AppError::NotFound)
}

pub async fn list_mixes(state: &AppState, query: MixListQuery) -> AppResult<ApiResponse<MixList>> {
    let (page, per_page, offset) = query.pagination().normalize_with(MIX_PAGE_SIZE);
    let mix_query = MixQuery::new(query.filter())
        .orders(query.sort.unwrap_or_default().to_orders());

    let total = mix_query.count(&state.orm).await?;
    let items = mix_query
        .window(offset as u64, per_page as u64)
        .all(&state.orm)
        .await?;

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Mixes", MixList { items }, Some(meta)))
}

pub async fn latest_mixes(state: &AppState) -> AppResult<ApiResponse<MixList>> {
    let items = MixQuery::default()
        .order_by(MixOrder::ReleaseDate(SortOrder::Desc))
        .order_by(MixOrder::Number(SortOrder::Desc))
        .take(LATEST_LIMIT)
        .all(&state.orm)
        .await?;
    Ok(ApiResponse::success("Latest mixes", MixList { items }, None))
}

pub async fn recommended_mixes(state: &AppState) -> AppResult<ApiResponse<MixList>> {
    let items = MixQuery::new(MixFilter {
        recommended_only: true,
        ..Default::default()
    })
    .order_by(MixOrder::RecommendedPriority(SortOrder::Desc))
    .order_by(MixOrder::ReleaseDate(SortOrder::Desc))
    .take(RECOMMENDED_LIMIT)
    .all(&state.orm)
    .await?;
    Ok(ApiResponse::success("Recommended mixes", MixList { items }, None))
}

pub async fn list_artists(state: &AppState, query: ArtistQuery) -> AppResult<ApiResponse<ArtistList>> {
    let filter = MixFilter {
        artist_contains: clean(query.q),
        ..Default::default()
    };
    let items = query::artist_counts(&state.orm, &filter).await?;
    Ok(ApiResponse::success("Artists", ArtistList { items }, None))
}

fn milestone(model: mixes::Model) -> MixMilestone {
    MixMilestone {
        number: model.number,
        artist: model.artist,
        release_date: model.release_date,
    }
}

pub async fn archive_stats<C: ConnectionTrait>(conn: &C) -> AppResult<ArchiveStats> {
    let first_mix = Mixes::find()
        .order_by_asc(mixes::Column::Number)
        .one(conn)
        .await?
        .map(milestone);
    let latest_mix = Mixes::find()
        .order_by_desc(mixes::Column::ReleaseDate)
        .order_by_desc(mixes::Column::Number)
        .one(conn)
        .await?
        .map(milestone);

    Ok(ArchiveStats {
        mixes: Mixes::find().count(conn).await? as i64,
        tracks: Tracks::find().count(conn).await? as i64,
        reviews: Reviews::find().count(conn).await? as i64,
        users: Users::find().count(conn).await? as i64,
        library_entries: LibraryEntries::find().count(conn).await? as i64,
        recommended: RecommendedMixes::find().count(conn).await? as i64,
        first_mix,
        latest_mix,
    })
}

pub async fn get_stats(state: &AppState) -> AppResult<ApiResponse<ArchiveStats>> {
    let stats = archive_stats(&state.orm).await?;
    Ok(ApiResponse::success("Archive stats", stats, None))
}

pub async fn get_mix_detail(state: &AppState, number: i32) -> AppResult<ApiResponse<MixDetail>> {
    let mix = query::mix_by_number(&state.orm, number)
        .await?
        .ok_or(AppError::NotFound)?;

    let tracks = query::tracklist(&state.orm, mix.id)
        .await?
        .into_iter()
        .map(Track::from)
        .collect();
    let reviews = Reviews::find()
        .filter(reviews::Column::MixId.eq(mix.id))
        .order_by_desc(reviews::Column::CreatedAt)
        .order_by_desc(reviews::Column::Id)
        .limit(DETAIL_REVIEW_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();
    let recommended = RecommendedMixes::find()
        .filter(recommended_mixes::Column::MixId.eq(mix.id))
        .one(&state.orm)
        .await?
        .map(RecommendedMix::from);

    let detail = MixDetail {
        mix,
        tracks,
        reviews,
        recommended,
    };
    Ok(ApiResponse::success("Mix", detail, None))
}

pub async fn related_mixes(state: &AppState, number: i32) -> AppResult<ApiResponse<RelatedMixes>> {
    let mix = find_by_number(&state.orm, number).await?;

    let same_genre = match mix.genre.clone() {
        Some(genre) => {
            MixQuery::new(MixFilter {
                genre: Some(genre),
                exclude_id: Some(mix.id),
                ..Default::default()
            })
            .order_by(MixOrder::ReleaseDate(SortOrder::Desc))
            .take(RELATED_LIMIT)
            .all(&state.orm)
            .await?
        }
        None => Vec::new(),
    };

    let mut you_might_like = MixQuery::new(MixFilter {
        exclude_id: Some(mix.id),
        recommended_only: true,
        ..Default::default()
    })
    .order_by(MixOrder::RecommendedPriority(SortOrder::Desc))
    .order_by(MixOrder::ReleaseDate(SortOrder::Desc))
    .take(RELATED_LIMIT)
    .all(&state.orm)
    .await?;

    if you_might_like.is_empty() {
        you_might_like = MixQuery::new(MixFilter {
            exclude_id: Some(mix.id),
            ..Default::default()
        })
        .order_by(MixOrder::ReleaseDate(SortOrder::Desc))
        .take(RELATED_LIMIT)
        .all(&state.orm)
        .await?;
    }

    let data = RelatedMixes {
        same_genre,
        you_might_like,
    };
    Ok(ApiResponse::success("Related mixes", data, None))
}

pub async fn update_media(
    state: &AppState,
    user: &AuthUser,
    number: i32,
    payload: UpdateMixMediaRequest,
) -> AppResult<ApiResponse<Mix>> {
    ensure_admin(user)?;
    let existing = find_by_number(&state.orm, number).await?;
    let mix_id = existing.id;

    let mut active: mixes::ActiveModel = existing.into();
    if let Some(bio) = payload.bio {
        active.bio = Set(validate_bio(bio)?);
    }
    if let Some(duration) = payload.duration_seconds {
        active.duration_seconds = Set(non_negative("duration_seconds", duration)?);
    }
    if let Some(v) = patch_text(payload.audio_path) {
        active.audio_path = Set(v);
    }
    if let Some(v) = patch_text(payload.external_url) {
        active.external_url = Set(v);
    }
    if let Some(v) = patch_text(payload.soundcloud_url) {
        active.soundcloud_url = Set(v);
    }
    if let Some(v) = patch_text(payload.mixcloud_url) {
        active.mixcloud_url = Set(v);
    }
    if let Some(v) = patch_text(payload.youtube_url) {
        active.youtube_url = Set(v);
    }
    if let Some(v) = patch_text(payload.spotify_url) {
        active.spotify_url = Set(v);
    }
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "mix_media_update",
        "mixes",
        serde_json::json!({ "mix_id": mix_id, "number": number }),
    )
    .await;

    let mix = query::mix_by_id(&state.orm, mix_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", mix, Some(Meta::empty())))
}

pub async fn admin_list_mixes(
    state: &AppState,
    user: &AuthUser,
    query: AdminMixQuery,
) -> AppResult<ApiResponse<MixList>> {
    ensure_admin(user)?;
    let (page, per_page, offset) = query.pagination().normalize();
    let filter = MixFilter {
        search: clean(query.q),
        ..Default::default()
    };
    let mix_query = MixQuery::new(filter).order_by(MixOrder::Number(SortOrder::Desc));

    let total = mix_query.count(&state.orm).await?;
    let items = mix_query
        .window(offset as u64, per_page as u64)
        .all(&state.orm)
        .await?;

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Mixes", MixList { items }, Some(meta)))
}

async fn ensure_number_free<C: ConnectionTrait>(
    conn: &C,
    number: i32,
    except_id: Option<i32>,
) -> AppResult<()> {
    let mut finder = Mixes::find().filter(mixes::Column::Number.eq(number));
    if let Some(id) = except_id {
        finder = finder.filter(mixes::Column::Id.ne(id));
    }
    if finder.one(conn).await?.is_some() {
        return Err(AppError::Conflict(format!("Mix #{number} already exists")));
    }
    Ok(())
}

pub async fn create_mix(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMixRequest,
) -> AppResult<ApiResponse<Mix>> {
    ensure_admin(user)?;
    let number = payload
        .number
        .ok_or_else(|| AppError::BadRequest("Number is required".into()))
        .and_then(validate_number)?;
    let artist = validate_artist(payload.artist.as_deref().unwrap_or_default())?;
    let release_date = payload
        .release_date
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Release date is required".into()))
        .and_then(parse_release_date)?;

    ensure_number_free(&state.orm, number, None).await?;

    let now = Utc::now();
    let active = mixes::ActiveModel {
        number: Set(number),
        artist: Set(artist),
        title: Set(clean(payload.title)),
        release_date: Set(release_date),
        bio: Set(validate_bio(payload.bio)?),
        duration_seconds: Set(non_negative("duration_seconds", payload.duration_seconds)?),
        audio_path: Set(clean(payload.audio_path)),
        artwork_url: Set(clean(payload.artwork_url)),
        hero_image_url: Set(clean(payload.hero_image_url)),
        external_url: Set(clean(payload.external_url)),
        soundcloud_url: Set(clean(payload.soundcloud_url)),
        mixcloud_url: Set(clean(payload.mixcloud_url)),
        youtube_url: Set(clean(payload.youtube_url)),
        spotify_url: Set(clean(payload.spotify_url)),
        genre: Set(clean(payload.genre)),
        bpm_low: Set(non_negative("bpm_low", payload.bpm_low)?),
        bpm_high: Set(non_negative("bpm_high", payload.bpm_high)?),
        location: Set(clean(payload.location)),
        rating: Set(0.0),
        rating_count: Set(0),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let mix = active
        .insert(&state.orm)
        .await
        .map_err(AppError::on_unique(format!("Mix #{number} already exists")))?;

    tracing::info!(mix_id = mix.id, number, "mix created");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "mix_create",
        "mixes",
        serde_json::json!({ "mix_id": mix.id, "number": number }),
    )
    .await;

    Ok(ApiResponse::success("Mix created", Mix::from(mix), Some(Meta::empty())))
}

pub async fn update_mix(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateMixRequest,
) -> AppResult<ApiResponse<Mix>> {
    ensure_admin(user)?;
    let existing = find_by_id(&state.orm, id).await?;

    let mut active: mixes::ActiveModel = existing.into();
    if let Some(number) = payload.number {
        let number = validate_number(number)?;
        ensure_number_free(&state.orm, number, Some(id)).await?;
        active.number = Set(number);
    }
    if let Some(artist) = payload.artist {
        active.artist = Set(validate_artist(&artist)?);
    }
    if let Some(release_date) = payload.release_date {
        active.release_date = Set(parse_release_date(&release_date)?);
    }
    if let Some(v) = patch_text(payload.title) {
        active.title = Set(v);
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(validate_bio(bio)?);
    }
    if let Some(v) = payload.duration_seconds {
        active.duration_seconds = Set(non_negative("duration_seconds", v)?);
    }
    if let Some(v) = patch_text(payload.audio_path) {
        active.audio_path = Set(v);
    }
    if let Some(v) = patch_text(payload.artwork_url) {
        active.artwork_url = Set(v);
    }
    if let Some(v) = patch_text(payload.hero_image_url) {
        active.hero_image_url = Set(v);
    }
    if let Some(v) = patch_text(payload.external_url) {
        active.external_url = Set(v);
    }
    if let Some(v) = patch_text(payload.soundcloud_url) {
        active.soundcloud_url = Set(v);
    }
    if let Some(v) = patch_text(payload.mixcloud_url) {
        active.mixcloud_url = Set(v);
    }
    if let Some(v) = patch_text(payload.youtube_url) {
        active.youtube_url = Set(v);
    }
    if let Some(v) = patch_text(payload.spotify_url) {
        active.spotify_url = Set(v);
    }
    if let Some(v) = patch_text(payload.genre) {
        active.genre = Set(v);
    }
    if let Some(v) = payload.bpm_low {
        active.bpm_low = Set(non_negative("bpm_low", v)?);
    }
    if let Some(v) = payload.bpm_high {
        active.bpm_high = Set(non_negative("bpm_high", v)?);
    }
    if let Some(v) = patch_text(payload.location) {
        active.location = Set(v);
    }
    active.updated_at = Set(Utc::now().into());
    active
        .update(&state.orm)
        .await
        .map_err(AppError::on_unique("Mix number already exists"))?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "mix_update",
        "mixes",
        serde_json::json!({ "mix_id": id }),
    )
    .await;

    let mix = query::mix_by_id(&state.orm, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Updated", mix, Some(Meta::empty())))
}

/// Delete a mix together with everything that references it.
pub async fn delete_mix(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let mix = find_by_id(&state.orm, id).await?;

    let txn = state.orm.begin().await?;

    Tracks::delete_many()
        .filter(tracks::Column::MixId.eq(id))
        .exec(&txn)
        .await?;
    Reviews::delete_many()
        .filter(reviews::Column::MixId.eq(id))
        .exec(&txn)
        .await?;
    LibraryEntries::delete_many()
        .filter(library_entries::Column::MixId.eq(id))
        .exec(&txn)
        .await?;
    RecommendedMixes::delete_many()
        .filter(recommended_mixes::Column::MixId.eq(id))
        .exec(&txn)
        .await?;
    Mixes::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(mix_id = id, number = mix.number, "mix deleted");
    audit::record(
        &state.orm,
        Some(user.user_id),
        "mix_delete",
        "mixes",
        serde_json::json!({ "mix_id": id, "number": mix.number }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

pub async fn set_recommendation(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: RecommendRequest,
) -> AppResult<ApiResponse<RecommendedMix>> {
    ensure_admin(user)?;
    find_by_id(&state.orm, id).await?;

    RecommendedMixes::insert(recommended_mixes::ActiveModel {
        mix_id: Set(id),
        priority: Set(payload.priority),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(recommended_mixes::Column::MixId)
            .update_column(recommended_mixes::Column::Priority)
            .to_owned(),
    )
    .exec_without_returning(&state.orm)
    .await?;

    let recommendation = RecommendedMixes::find()
        .filter(recommended_mixes::Column::MixId.eq(id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "mix_recommend",
        "recommended_mixes",
        serde_json::json!({ "mix_id": id, "priority": payload.priority }),
    )
    .await;

    Ok(ApiResponse::success(
        "Recommended",
        RecommendedMix::from(recommendation),
        Some(Meta::empty()),
    ))
}

pub async fn clear_recommendation(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = RecommendedMixes::delete_many()
        .filter(recommended_mixes::Column::MixId.eq(id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected > 0 {
        audit::record(
            &state.orm,
            Some(user.user_id),
            "mix_unrecommend",
            "recommended_mixes",
            serde_json::json!({ "mix_id": id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Recommendation cleared",
        serde_json::json!({ "mix_id": id, "removed": result.rows_affected > 0 }),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_date_accepts_date_and_timestamp() {
        let expected = NaiveDate::from_ymd_opt(1993, 10, 30).unwrap();
        assert_eq!(parse_release_date("1993-10-30").unwrap(), expected);
        assert_eq!(
            parse_release_date("1993-10-30T22:00:00Z").unwrap(),
            expected
        );
        assert!(parse_release_date("30/10/1993").is_err());
    }

    #[test]
    fn patch_text_clears_blank_values() {
        assert_eq!(patch_text(None), None);
        assert_eq!(patch_text(Some(None)), Some(None));
        assert_eq!(patch_text(Some(Some("  ".into()))), Some(None));
        assert_eq!(
            patch_text(Some(Some(" https://x ".into()))),
            Some(Some("https://x".into()))
        );
    }

    #[test]
    fn field_validation() {
        assert!(validate_number(0).is_err());
        assert_eq!(validate_number(7).unwrap(), 7);
        assert!(validate_artist("  ").is_err());
        assert!(validate_artist(&"a".repeat(201)).is_err());
        assert!(non_negative("bpm_low", Some(-1)).is_err());
        assert_eq!(non_negative("bpm_low", None).unwrap(), None);
    }
}
