use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::domain::repositories::{RepositoryError, UserRepository};
use crate::infrastructure::database::models::{NewUserModel, UserModel};
use crate::infrastructure::database::schema::users;
use crate::infrastructure::database::{DbPool, map_diesel_error, run_blocking};

pub struct PostgresUserRepository {
    pool: DbPool,
}

impl PostgresUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_domain(model: UserModel) -> Result<User, RepositoryError> {
    User::try_from(model).map_err(RepositoryError::ValidationError)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn save(&self, user: &User) -> Result<(), RepositoryError> {
        let new_user = NewUserModel::from(user);

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .execute(conn)
                .map_err(map_diesel_error)
        })
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, RepositoryError> {
        let model = run_blocking(&self.pool, move |conn| {
            users::table
                .find(user_id)
                .select(UserModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let email = email.to_string();
        let model = run_blocking(&self.pool, move |conn| {
            users::table
                .filter(users::email.eq(email))
                .select(UserModel::as_select())
                .first(conn)
                .optional()
                .map_err(map_diesel_error)
        })
        .await?;

        model.map(to_domain).transpose()
    }
}
