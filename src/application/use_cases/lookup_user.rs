use std::sync::Arc;

use uuid::Uuid;

use crate::application::use_cases::errors::UserError;
use crate::domain::entities::{User, normalize_email};
use crate::domain::repositories::UserRepository;

pub struct LookupUserUseCase {
    user_repository: Arc<dyn UserRepository>,
}

impl LookupUserUseCase {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn by_id(&self, user_id: Uuid) -> Result<User, UserError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))
    }

    pub async fn by_email(&self, email: &str) -> Result<User, UserError> {
        let email = normalize_email(email).map_err(UserError::ValidationError)?;
        self.user_repository
            .find_by_email(&email)
            .await?
            .ok_or(UserError::NotFound(email))
    }
}
