use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::users_model::{NewUser, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, Result};
use crate::records::{Page, PageRequest};

/// Service for listing and registering users.
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn list_users(&self, request: PageRequest) -> Result<Page<User>> {
        debug!(
            "Listing users page={} limit={}",
            request.page, request.limit
        );
        self.repository.list(request).await
    }

    /// Registers a user after the existence checks.
    ///
    /// The checks and the insert are separate store calls; two concurrent
    /// registrations for the same email can both pass them.
    async fn register_user(&self, new_user: NewUser) -> Result<User> {
        new_user.validate_registration()?;

        if self
            .repository
            .find_by_external_id(&new_user.external_id)
            .await?
            .is_some()
        {
            return Err(Error::Conflict("User already exists".to_string()));
        }

        if self
            .repository
            .find_by_email(&new_user.email)
            .await?
            .is_some()
        {
            return Err(Error::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let user = self.repository.create(new_user).await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }
}
