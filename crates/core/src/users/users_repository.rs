use std::sync::Arc;

use async_trait::async_trait;

use super::users_model::{NewUser, User, UserUpdate, EMAIL_FIELD, EXTERNAL_ID_FIELD};
use super::users_traits::UserRepositoryTrait;
use crate::documents::{DocumentStoreTrait, Filter};
use crate::errors::Result;
use crate::records::{Page, PageRequest, Repository};

/// User persistence on top of the generic record repository.
pub struct UserRepository {
    records: Repository<User>,
}

impl UserRepository {
    /// Creates a repository over the `users` collection handle.
    pub fn new(store: Arc<dyn DocumentStoreTrait>) -> Self {
        Self {
            records: Repository::new(store),
        }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        self.records.create(new_user).await
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<Option<User>> {
        self.records.update(user_id, update).await
    }

    async fn delete(&self, user_id: &str) -> Result<bool> {
        self.records.delete(user_id).await
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        self.records.find_by_id(user_id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.records.find_one(&Filter::eq(EMAIL_FIELD, email)).await
    }

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        self.records
            .find_one(&Filter::eq(EXTERNAL_ID_FIELD, external_id))
            .await
    }

    async fn list(&self, request: PageRequest) -> Result<Page<User>> {
        self.records.find(&Filter::all(), request).await
    }
}
