use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::User;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct UserLookupQuery {
    pub email: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            name: user.name().map(str::to_string),
            role: user.role().as_str().to_string(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}
