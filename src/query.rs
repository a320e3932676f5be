//! Typed query building for the archive tables.
//!
//! Call sites describe what they want with [`MixFilter`] and [`MixOrder`]
//! values; this module turns them into SeaORM statements. Every function is
//! generic over [`ConnectionTrait`] so the same calls work on the pooled
//! connection and inside a [`sea_orm::DatabaseTransaction`].

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, SelectTwo, Value,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    entity::{
        Mixes, RecommendedMixes, Reviews, Tracks, mixes, recommended_mixes, reviews, tracks,
    },
    models::Mix,
    routes::params::SortOrder,
};

/// Optional comparison bounds on a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct NumRange<T> {
    pub gt: Option<T>,
    pub gte: Option<T>,
    pub lt: Option<T>,
    pub lte: Option<T>,
}

impl<T> Default for NumRange<T> {
    fn default() -> Self {
        Self {
            gt: None,
            gte: None,
            lt: None,
            lte: None,
        }
    }
}

impl<T> NumRange<T>
where
    T: Into<Value> + Clone,
{
    pub fn is_empty(&self) -> bool {
        self.gt.is_none() && self.gte.is_none() && self.lt.is_none() && self.lte.is_none()
    }

    pub fn apply<C: ColumnTrait>(&self, col: C, cond: Condition) -> Condition {
        self.apply_split(col, col, cond)
    }

    /// Apply lower bounds to `lower_col` and upper bounds to `upper_col`.
    ///
    /// With a `[low, high]` column pair this yields overlap semantics.
    pub fn apply_split<C: ColumnTrait>(&self, lower_col: C, upper_col: C, mut cond: Condition) -> Condition {
        if let Some(v) = &self.gt {
            cond = cond.add(lower_col.gt(v.clone()));
        }
        if let Some(v) = &self.gte {
            cond = cond.add(lower_col.gte(v.clone()));
        }
        if let Some(v) = &self.lt {
            cond = cond.add(upper_col.lt(v.clone()));
        }
        if let Some(v) = &self.lte {
            cond = cond.add(upper_col.lte(v.clone()));
        }
        cond
    }
}

const LIKE_ESCAPE: char = '|';

/// Case-insensitive substring match, portable across SQLite and Postgres.
///
/// `%` and `_` in the needle match literally. SQLite's `LOWER` only folds
/// ASCII, so a non-ASCII needle also matches the column in its given case.
pub fn contains<E, C>(entity: E, col: C, needle: &str) -> SimpleExpr
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let needle = needle.trim();
    let folded = Expr::expr(Func::lower(Expr::col((entity, col))))
        .like(like_pattern(&needle.to_lowercase()));
    if needle.is_ascii() {
        return folded;
    }
    folded.or(Expr::col((entity, col)).like(like_pattern(needle)))
}

fn like_pattern(needle: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

#[derive(Debug, Clone, Default)]
pub struct MixFilter {
    /// Artist substring OR exact number when the text is numeric.
    pub search: Option<String>,
    /// Artist substring only.
    pub artist_contains: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub number: NumRange<i32>,
    pub exclude_id: Option<i32>,
    pub bpm: NumRange<i32>,
    pub released: NumRange<NaiveDate>,
    /// Only mixes carrying an editorial recommendation.
    pub recommended_only: bool,
}

impl MixFilter {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(search) = non_empty(&self.search) {
            let mut any = Condition::any().add(contains(Mixes, mixes::Column::Artist, search));
            if let Ok(number) = search.parse::<i32>() {
                any = any.add(mixes::Column::Number.eq(number));
            }
            cond = cond.add(any);
        }
        if let Some(artist) = non_empty(&self.artist_contains) {
            cond = cond.add(contains(Mixes, mixes::Column::Artist, artist));
        }
        if let Some(artist) = non_empty(&self.artist) {
            cond = cond.add(mixes::Column::Artist.eq(artist));
        }
        if let Some(genre) = non_empty(&self.genre) {
            cond = cond.add(mixes::Column::Genre.eq(genre));
        }
        if let Some(id) = self.exclude_id {
            cond = cond.add(mixes::Column::Id.ne(id));
        }
        cond = self.number.apply(mixes::Column::Number, cond);
        cond = self
            .bpm
            .apply_split(mixes::Column::BpmHigh, mixes::Column::BpmLow, cond);
        cond = self.released.apply(mixes::Column::ReleaseDate, cond);
        if self.recommended_only {
            cond = cond.add(recommended_mixes::Column::Id.is_not_null());
        }
        cond
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixOrder {
    Number(SortOrder),
    ReleaseDate(SortOrder),
    Artist(SortOrder),
    CreatedAt(SortOrder),
    /// Orders by the joined recommendation's priority.
    RecommendedPriority(SortOrder),
}

impl MixOrder {
    fn apply(self, finder: SelectTwo<Mixes, RecommendedMixes>) -> SelectTwo<Mixes, RecommendedMixes> {
        match self {
            MixOrder::Number(o) => finder.order_by(mixes::Column::Number, o.as_order()),
            MixOrder::ReleaseDate(o) => finder.order_by(mixes::Column::ReleaseDate, o.as_order()),
            MixOrder::Artist(o) => finder.order_by(mixes::Column::Artist, o.as_order()),
            MixOrder::CreatedAt(o) => finder.order_by(mixes::Column::CreatedAt, o.as_order()),
            MixOrder::RecommendedPriority(o) => {
                finder.order_by(recommended_mixes::Column::Priority, o.as_order())
            }
        }
    }
}

/// A mix listing: filter, ordering and an optional window.
#[derive(Debug, Clone, Default)]
pub struct MixQuery {
    pub filter: MixFilter,
    pub order: Vec<MixOrder>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl MixQuery {
    pub fn new(filter: MixFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn order_by(mut self, order: MixOrder) -> Self {
        self.order.push(order);
        self
    }

    pub fn orders(mut self, orders: impl IntoIterator<Item = MixOrder>) -> Self {
        self.order.extend(orders);
        self
    }

    pub fn window(mut self, offset: u64, limit: u64) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    pub fn take(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Mixes left-joined with their recommendation, filtered and ordered.
    pub fn select(&self) -> SelectTwo<Mixes, RecommendedMixes> {
        let mut finder = Mixes::find()
            .find_also_related(RecommendedMixes)
            .filter(self.filter.condition());
        for order in &self.order {
            finder = order.apply(finder);
        }
        finder
    }

    pub async fn all<C: ConnectionTrait>(&self, conn: &C) -> Result<Vec<Mix>, DbErr> {
        let mut finder = self.select();
        if let Some(offset) = self.offset {
            finder = finder.offset(offset);
        }
        if let Some(limit) = self.limit {
            finder = finder.limit(limit);
        }
        let rows = finder.all(conn).await?;
        Ok(rows.into_iter().map(Mix::from).collect())
    }

    /// Number of rows matching the filter, ignoring the window.
    pub async fn count<C: ConnectionTrait>(&self, conn: &C) -> Result<i64, DbErr> {
        let total = Mixes::find()
            .find_also_related(RecommendedMixes)
            .filter(self.filter.condition())
            .count(conn)
            .await?;
        Ok(total as i64)
    }
}

pub async fn mix_by_number<C: ConnectionTrait>(conn: &C, number: i32) -> Result<Option<Mix>, DbErr> {
    let row = Mixes::find()
        .find_also_related(RecommendedMixes)
        .filter(mixes::Column::Number.eq(number))
        .one(conn)
        .await?;
    Ok(row.map(Mix::from))
}

pub async fn mix_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<Mix>, DbErr> {
    let row = Mixes::find_by_id(id)
        .find_also_related(RecommendedMixes)
        .one(conn)
        .await?;
    Ok(row.map(Mix::from))
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, ToSchema)]
pub struct ArtistCount {
    pub artist: String,
    pub mix_count: i64,
}

/// Mixes grouped by artist with a count per artist, artist ascending.
pub async fn artist_counts<C: ConnectionTrait>(
    conn: &C,
    filter: &MixFilter,
) -> Result<Vec<ArtistCount>, DbErr> {
    let mut finder = Mixes::find()
        .select_only()
        .column(mixes::Column::Artist)
        .column_as(mixes::Column::Id.count(), "mix_count");
    if filter.recommended_only {
        finder = finder.join(JoinType::InnerJoin, mixes::Relation::RecommendedMix.def());
    }
    finder
        .filter(filter.condition())
        .group_by(mixes::Column::Artist)
        .order_by_asc(mixes::Column::Artist)
        .into_model::<ArtistCount>()
        .all(conn)
        .await
}

#[derive(Debug, FromQueryResult)]
struct RatingRow {
    rating_sum: Option<i64>,
    rating_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    pub average: f64,
    pub count: i64,
}

impl RatingStats {
    pub fn from_totals(sum: i64, count: i64) -> Self {
        let average = if count > 0 { sum as f64 / count as f64 } else { 0.0 };
        Self { average, count }
    }
}

pub async fn rating_stats<C: ConnectionTrait>(conn: &C, mix_id: i32) -> Result<RatingStats, DbErr> {
    let row = Reviews::find()
        .select_only()
        .column_as(reviews::Column::Rating.sum(), "rating_sum")
        .column_as(reviews::Column::Rating.count(), "rating_count")
        .filter(reviews::Column::MixId.eq(mix_id))
        .into_model::<RatingRow>()
        .one(conn)
        .await?;
    Ok(match row {
        Some(r) => RatingStats::from_totals(r.rating_sum.unwrap_or(0), r.rating_count),
        None => RatingStats::from_totals(0, 0),
    })
}

/// Recompute `mixes.rating` / `mixes.rating_count` from the mix's reviews.
pub async fn recompute_mix_rating<C: ConnectionTrait>(
    conn: &C,
    mix_id: i32,
) -> Result<RatingStats, DbErr> {
    let stats = rating_stats(conn, mix_id).await?;
    let updated_at: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    Mixes::update_many()
        .col_expr(mixes::Column::Rating, Expr::value(stats.average))
        .col_expr(mixes::Column::RatingCount, Expr::value(stats.count as i32))
        .col_expr(mixes::Column::UpdatedAt, Expr::value(updated_at))
        .filter(mixes::Column::Id.eq(mix_id))
        .exec(conn)
        .await?;
    Ok(stats)
}

pub async fn tracklist<C: ConnectionTrait>(conn: &C, mix_id: i32) -> Result<Vec<tracks::Model>, DbErr> {
    Tracks::find()
        .filter(tracks::Column::MixId.eq(mix_id))
        .order_by_asc(tracks::Column::Index)
        .all(conn)
        .await
}

/// Delete every track of `mix_id` and insert `rows` in their place.
pub async fn replace_tracklist<C: ConnectionTrait>(
    conn: &C,
    mix_id: i32,
    rows: Vec<tracks::ActiveModel>,
) -> Result<usize, DbErr> {
    Tracks::delete_many()
        .filter(tracks::Column::MixId.eq(mix_id))
        .exec(conn)
        .await?;
    let count = rows.len();
    if count > 0 {
        Tracks::insert_many(rows).exec(conn).await?;
    }
    Ok(count)
}
