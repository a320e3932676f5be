use chrono::{Days, NaiveDate, Utc};
use mix_archive_api::{
    config::AppConfig,
    db::{OrmConn, sync_schema_with_retry},
    entity::{Mixes, RecommendedMixes, mixes, recommended_mixes},
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

struct SeedMix {
    number: i32,
    artist: &'static str,
    title: &'static str,
    days_ago: u64,
    bio: &'static str,
}

const MIXES: [SeedMix; 10] = [
    SeedMix { number: 1, artist: "Pete Tong", title: "Foundations", days_ago: 4000, bio: "The inaugural Essential Mix that set the tone." },
    SeedMix { number: 2, artist: "Daft Punk", title: "Alive Warmup", days_ago: 3200, bio: "A formative early French touch showcase." },
    SeedMix { number: 3, artist: "Sasha & John Digweed", title: "Progressive Journey", days_ago: 2800, bio: "Defining progressive house narrative." },
    SeedMix { number: 4, artist: "Carl Cox", title: "3 Deck Energy", days_ago: 2500, bio: "Relentless techno + house hybrid energy." },
    SeedMix { number: 5, artist: "Nina Kraviz", title: "Siberian Echoes", days_ago: 800, bio: "Dreamy acid + leftfield textures." },
    SeedMix { number: 6, artist: "Amelie Lens", title: "Warehouse Pulse", days_ago: 300, bio: "Peak hour rolling techno intensity." },
    SeedMix { number: 7, artist: "Fred again..", title: "Emotive Collage", days_ago: 120, bio: "Field recordings meet club euphoria." },
    SeedMix { number: 8, artist: "Peggy Gou", title: "Global Groove", days_ago: 60, bio: "Sunrise deep rhythms & playful edges." },
    SeedMix { number: 9, artist: "Four Tet", title: "Textural Flow", days_ago: 20, bio: "Organic percussion + melodic abstractions." },
    SeedMix { number: 10, artist: "Ben UFO", title: "Selector Mode", days_ago: 1, bio: "Cross-genre precision mixing." },
];

/// (mix number, priority)
const RECOMMENDED: [(i32, i32); 4] = [(3, 10), (2, 9), (9, 8), (7, 7)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = sync_schema_with_retry(
        &config.database_url,
        config.schema_sync_attempts,
        config.schema_sync_delay,
    )
    .await?;

    let today = Utc::now().date_naive();
    let created = seed_mixes(&orm, today).await?;
    seed_recommendations(&orm).await?;

    println!("Seed completed. {created} new mixes, {} recommendations", RECOMMENDED.len());
    Ok(())
}

async fn seed_mixes(orm: &OrmConn, today: NaiveDate) -> anyhow::Result<usize> {
    let mut created = 0;
    for seed in &MIXES {
        let exists = Mixes::find()
            .filter(mixes::Column::Number.eq(seed.number))
            .one(orm)
            .await?;
        if exists.is_some() {
            continue;
        }

        let release_date = today
            .checked_sub_days(Days::new(seed.days_ago))
            .ok_or_else(|| anyhow::anyhow!("release date out of range"))?;
        let now = Utc::now();
        mixes::ActiveModel {
            number: Set(seed.number),
            artist: Set(seed.artist.to_string()),
            title: Set(Some(seed.title.to_string())),
            release_date: Set(release_date),
            bio: Set(Some(seed.bio.to_string())),
            rating: Set(0.0),
            rating_count: Set(0),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(orm)
        .await?;
        created += 1;
    }
    Ok(created)
}

async fn seed_recommendations(orm: &OrmConn) -> anyhow::Result<()> {
    for (number, priority) in RECOMMENDED {
        let mix = Mixes::find()
            .filter(mixes::Column::Number.eq(number))
            .one(orm)
            .await?
            .ok_or_else(|| anyhow::anyhow!("mix #{number} missing after seeding"))?;

        RecommendedMixes::insert(recommended_mixes::ActiveModel {
            mix_id: Set(mix.id),
            priority: Set(priority),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(recommended_mixes::Column::MixId)
                .update_column(recommended_mixes::Column::Priority)
                .to_owned(),
        )
        .exec_without_returning(orm)
        .await?;
    }
    Ok(())
}
