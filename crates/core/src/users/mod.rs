//! Users module - the account record, its repository and the registration service.

mod users_model;
mod users_repository;
mod users_service;
mod users_traits;

// Re-export the public interface
pub use users_model::{
    NewUser, User, UserUpdate, EMAIL_FIELD, EXTERNAL_ID_FIELD, USERS_COLLECTION,
};
pub use users_repository::UserRepository;
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
