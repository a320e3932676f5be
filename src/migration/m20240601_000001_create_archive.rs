use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::IsAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::IsBanned).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Mixes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mixes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mixes::Number).integer().not_null().unique_key())
                    .col(ColumnDef::new(Mixes::Artist).string().not_null())
                    .col(ColumnDef::new(Mixes::Title).string().null())
                    .col(ColumnDef::new(Mixes::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Mixes::Bio).text().null())
                    .col(ColumnDef::new(Mixes::DurationSeconds).integer().null())
                    .col(ColumnDef::new(Mixes::AudioPath).string().null())
                    .col(ColumnDef::new(Mixes::ArtworkUrl).string().null())
                    .col(ColumnDef::new(Mixes::HeroImageUrl).string().null())
                    .col(ColumnDef::new(Mixes::ExternalUrl).string().null())
                    .col(ColumnDef::new(Mixes::SoundcloudUrl).string().null())
                    .col(ColumnDef::new(Mixes::MixcloudUrl).string().null())
                    .col(ColumnDef::new(Mixes::YoutubeUrl).string().null())
                    .col(ColumnDef::new(Mixes::SpotifyUrl).string().null())
                    .col(ColumnDef::new(Mixes::Genre).string().null())
                    .col(ColumnDef::new(Mixes::BpmLow).integer().null())
                    .col(ColumnDef::new(Mixes::BpmHigh).integer().null())
                    .col(ColumnDef::new(Mixes::Location).string().null())
                    .col(ColumnDef::new(Mixes::Rating).double().not_null().default(0.0))
                    .col(ColumnDef::new(Mixes::RatingCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Mixes::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Mixes::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tracks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tracks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tracks::MixId).integer().not_null())
                    .col(ColumnDef::new(Tracks::Index).integer().not_null())
                    .col(ColumnDef::new(Tracks::TimecodeSeconds).integer().not_null())
                    .col(ColumnDef::new(Tracks::Title).string().not_null())
                    .col(ColumnDef::new(Tracks::Artist).string().null())
                    .col(ColumnDef::new(Tracks::Label).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tracks_mix")
                            .from(Tracks::Table, Tracks::MixId)
                            .to(Mixes::Table, Mixes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tracks_mix_index")
                    .table(Tracks::Table)
                    .col(Tracks::MixId)
                    .col(Tracks::Index)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::MixId).integer().not_null())
                    .col(ColumnDef::new(Reviews::UserId).uuid().null())
                    .col(ColumnDef::new(Reviews::UserName).string().not_null())
                    .col(ColumnDef::new(Reviews::Rating).integer().not_null())
                    .col(ColumnDef::new(Reviews::Body).text().not_null())
                    .col(ColumnDef::new(Reviews::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_mix")
                            .from(Reviews::Table, Reviews::MixId)
                            .to(Mixes::Table, Mixes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_user")
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reviews_mix")
                    .table(Reviews::Table)
                    .col(Reviews::MixId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LibraryEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LibraryEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LibraryEntries::UserId).uuid().not_null())
                    .col(ColumnDef::new(LibraryEntries::MixId).integer().not_null())
                    .col(
                        ColumnDef::new(LibraryEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_library_entries_user")
                            .from(LibraryEntries::Table, LibraryEntries::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_library_entries_mix")
                            .from(LibraryEntries::Table, LibraryEntries::MixId)
                            .to(Mixes::Table, Mixes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_library_entries_user_mix")
                    .table(LibraryEntries::Table)
                    .col(LibraryEntries::UserId)
                    .col(LibraryEntries::MixId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecommendedMixes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecommendedMixes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecommendedMixes::MixId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(RecommendedMixes::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RecommendedMixes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recommended_mixes_mix")
                            .from(RecommendedMixes::Table, RecommendedMixes::MixId)
                            .to(Mixes::Table, Mixes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AuditLogs::UserId).uuid().null())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Resource).string().null())
                    .col(ColumnDef::new(AuditLogs::Metadata).json().null())
                    .col(
                        ColumnDef::new(AuditLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecommendedMixes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LibraryEntries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reviews::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tracks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Mixes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    PasswordHash,
    IsAdmin,
    IsBanned,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Mixes {
    Table,
    Id,
    Number,
    Artist,
    Title,
    ReleaseDate,
    Bio,
    DurationSeconds,
    AudioPath,
    ArtworkUrl,
    HeroImageUrl,
    ExternalUrl,
    SoundcloudUrl,
    MixcloudUrl,
    YoutubeUrl,
    SpotifyUrl,
    Genre,
    BpmLow,
    BpmHigh,
    Location,
    Rating,
    RatingCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tracks {
    Table,
    Id,
    MixId,
    Index,
    TimecodeSeconds,
    Title,
    Artist,
    Label,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    MixId,
    UserId,
    UserName,
    Rating,
    Body,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LibraryEntries {
    Table,
    Id,
    UserId,
    MixId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RecommendedMixes {
    Table,
    Id,
    MixId,
    Priority,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    Action,
    Resource,
    Metadata,
    CreatedAt,
}
