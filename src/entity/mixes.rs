use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "mixes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: i32,
    pub artist: String,
    pub title: Option<String>,
    pub release_date: Date,
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tracks::Entity")]
    Tracks,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::library_entries::Entity")]
    LibraryEntries,
    #[sea_orm(has_one = "super::recommended_mixes::Entity")]
    RecommendedMix,
}

impl Related<super::tracks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tracks.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::library_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LibraryEntries.def()
    }
}

impl Related<super::recommended_mixes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecommendedMix.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
