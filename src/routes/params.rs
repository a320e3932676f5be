use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::query::{MixFilter, MixOrder, NumRange};

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MIX_PAGE_SIZE: i64 = 24;
pub const MAX_PAGE: i64 = 1_000_000;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn normalize(&self) -> (i64, i64, i64) {
        self.normalize_with(DEFAULT_PER_PAGE)
    }

    /// Returns `(page, per_page, offset)` with `page` in `1..=MAX_PAGE` and `per_page` in `1..=100`.
    pub fn normalize_with(&self, default_per_page: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_order(&self) -> sea_orm::Order {
        match self {
            SortOrder::Asc => sea_orm::Order::Asc,
            SortOrder::Desc => sea_orm::Order::Desc,
        }
    }
}

/// Listing sort keys accepted by `GET /api/mixes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MixSort {
    #[default]
    NumberAsc,
    NumberDesc,
    DateAsc,
    DateDesc,
    ArtistAsc,
    ArtistDesc,
}

impl MixSort {
    pub fn to_orders(self) -> Vec<MixOrder> {
        match self {
            MixSort::NumberAsc => vec![MixOrder::Number(SortOrder::Asc)],
            MixSort::NumberDesc => vec![MixOrder::Number(SortOrder::Desc)],
            MixSort::DateAsc => vec![MixOrder::ReleaseDate(SortOrder::Asc)],
            MixSort::DateDesc => vec![MixOrder::ReleaseDate(SortOrder::Desc)],
            MixSort::ArtistAsc => vec![
                MixOrder::Artist(SortOrder::Asc),
                MixOrder::Number(SortOrder::Asc),
            ],
            MixSort::ArtistDesc => vec![
                MixOrder::Artist(SortOrder::Desc),
                MixOrder::Number(SortOrder::Asc),
            ],
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MixListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Artist substring or exact mix number.
    pub search: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub bpm_min: Option<i32>,
    pub bpm_max: Option<i32>,
    pub released_from: Option<NaiveDate>,
    pub released_to: Option<NaiveDate>,
    pub recommended: Option<bool>,
    pub sort: Option<MixSort>,
}

impl MixListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn filter(&self) -> MixFilter {
        MixFilter {
            search: self.search.clone(),
            artist: self.artist.clone(),
            genre: self.genre.clone(),
            bpm: NumRange {
                gte: self.bpm_min,
                lte: self.bpm_max,
                ..Default::default()
            },
            released: NumRange {
                gte: self.released_from,
                lte: self.released_to,
                ..Default::default()
            },
            recommended_only: self.recommended.unwrap_or(false),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArtistQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminMixQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
}

impl AdminMixQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_values() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination::new(3, 24);
        assert_eq!(p.normalize(), (3, 24, 48));

        let p = Pagination::default();
        assert_eq!(p.normalize_with(MIX_PAGE_SIZE), (1, 24, 0));
    }

    #[test]
    fn normalize_caps_huge_pages() {
        let p = Pagination::new(i64::MAX, 24);
        let (page, per_page, offset) = p.normalize();
        assert_eq!((page, per_page), (MAX_PAGE, 24));
        assert_eq!(offset, (MAX_PAGE - 1) * 24);

        let p = Pagination::new(i64::MIN, i64::MIN);
        assert_eq!(p.normalize(), (1, 1, 0));
    }

    #[test]
    fn mix_sort_parses_kebab_case() {
        let sort: MixSort = serde_json::from_str("\"date-desc\"").unwrap();
        assert_eq!(sort, MixSort::DateDesc);
        assert_eq!(MixSort::default(), MixSort::NumberAsc);
    }

    #[test]
    fn list_query_maps_ranges() {
        let q = MixListQuery {
            bpm_min: Some(120),
            bpm_max: Some(128),
            recommended: Some(true),
            ..Default::default()
        };
        let filter = q.filter();
        assert_eq!(filter.bpm.gte, Some(120));
        assert_eq!(filter.bpm.lte, Some(128));
        assert!(filter.recommended_only);
    }
}
