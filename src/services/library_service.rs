use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::{
    audit,
    dto::library::{AddLibraryRequest, LibraryItem, LibraryList, LibraryRemoval},
    entity::{LibraryEntries, Mixes, library_entries},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{LibraryEntry, Mix},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_library(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<LibraryList>> {
    let items = LibraryEntries::find()
        .find_also_related(Mixes)
        .filter(library_entries::Column::UserId.eq(user.user_id))
        .order_by_desc(library_entries::Column::CreatedAt)
        .order_by_desc(library_entries::Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(entry, mix)| LibraryItem {
            entry: LibraryEntry::from(entry),
            mix: mix.map(Mix::from),
        })
        .collect();

    Ok(ApiResponse::success("Library", LibraryList { items }, None))
}

/// Save a mix to the caller's library. Adding an already saved mix is a no-op.
pub async fn add_to_library(
    state: &AppState,
    user: &AuthUser,
    payload: AddLibraryRequest,
) -> AppResult<ApiResponse<LibraryEntry>> {
    let mix_id = payload.mix_id;
    if Mixes::find_by_id(mix_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let inserted = LibraryEntries::insert(library_entries::ActiveModel {
        user_id: Set(user.user_id),
        mix_id: Set(mix_id),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([
            library_entries::Column::UserId,
            library_entries::Column::MixId,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(&state.orm)
    .await?;

    let entry = LibraryEntries::find()
        .filter(library_entries::Column::UserId.eq(user.user_id))
        .filter(library_entries::Column::MixId.eq(mix_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if inserted > 0 {
        audit::record(
            &state.orm,
            Some(user.user_id),
            "library_add",
            "library_entries",
            serde_json::json!({ "mix_id": mix_id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Saved to library",
        LibraryEntry::from(entry),
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_library(
    state: &AppState,
    user: &AuthUser,
    mix_id: i32,
) -> AppResult<ApiResponse<LibraryRemoval>> {
    let result = LibraryEntries::delete_many()
        .filter(library_entries::Column::UserId.eq(user.user_id))
        .filter(library_entries::Column::MixId.eq(mix_id))
        .exec(&state.orm)
        .await?;
    let removed = result.rows_affected > 0;

    if removed {
        audit::record(
            &state.orm,
            Some(user.user_id),
            "library_remove",
            "library_entries",
            serde_json::json!({ "mix_id": mix_id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Removed from library",
        LibraryRemoval { mix_id, removed },
        Some(Meta::empty()),
    ))
}
