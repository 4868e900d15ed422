//! User repository and service traits.
//!
//! These traits define the contract for user operations without any
//! storage-specific types.

use async_trait::async_trait;

use super::users_model::{NewUser, User, UserUpdate};
use crate::errors::Result;
use crate::records::{Page, PageRequest};

/// Contract for user persistence.
///
/// Lookups return `None` when nothing matches.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User>;

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<Option<User>>;

    /// Returns true iff a user was removed.
    async fn delete(&self, user_id: &str) -> Result<bool>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>>;

    /// Lists users one page at a time, with the total user count.
    async fn list(&self, request: PageRequest) -> Result<Page<User>>;
}

/// Contract for the user-management operations exposed over HTTP.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn list_users(&self, request: PageRequest) -> Result<Page<User>>;

    /// Registers a fully-specified user, rejecting duplicates by external id or email.
    async fn register_user(&self, new_user: NewUser) -> Result<User>;
}
