use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{LibraryEntry, Mix};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddLibraryRequest {
    pub mix_id: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LibraryItem {
    #[serde(flatten)]
    pub entry: LibraryEntry,
    pub mix: Option<Mix>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LibraryList {
    pub items: Vec<LibraryItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LibraryRemoval {
    pub mix_id: i32,
    pub removed: bool,
}
