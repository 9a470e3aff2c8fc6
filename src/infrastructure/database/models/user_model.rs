use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{User, UserRole};
use crate::infrastructure::database::schema::users;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserModel {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for NewUserModel {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            name: user.name().map(str::to_string),
            role: user.role().as_str().to_string(),
            created_at: user.created_at(),
        }
    }
}

impl TryFrom<UserModel> for User {
    type Error = String;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role: UserRole = model.role.parse()?;
        Ok(User::from_database(
            model.id,
            model.email,
            model.name,
            role,
            model.created_at,
        ))
    }
}
