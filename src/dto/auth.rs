use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Session token claims.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    /// Admin flag as of `rfh`.
    pub adm: bool,
    /// Ban flag as of `rfh`.
    pub ban: bool,
    /// Unix time the flags were last read from the store.
    pub rfh: i64,
    pub exp: usize,
}
