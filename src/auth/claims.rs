use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload of a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub username: String, // at issue time
    pub iat: i64,         // unix timestamp
    pub exp: i64,         // unix timestamp
    pub jti: Uuid,        // log correlation only
}
