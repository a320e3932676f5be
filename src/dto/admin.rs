use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::mixes::ArchiveStats,
    models::{Mix, User},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAdminRequest {
    #[serde(default)]
    pub admin: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetBanRequest {
    #[serde(default)]
    pub banned: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub latest: Vec<Mix>,
    pub stats: ArchiveStats,
}
