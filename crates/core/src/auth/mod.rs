//! Auth module - identity provider contract and the account-provisioning workflow.

mod auth_errors;
mod auth_model;
mod auth_service;
mod auth_traits;


pub use auth_errors::{AuthError, ProviderError, ProviderResult};
pub use auth_model::{
    AuthOutcome, AuthUser, ChangePasswordRequest, ConfirmRequest, EmailOtpType,
    MagicLinkRequest, PasswordCredentials, Session, SessionTokens, SignUpResponse,
};
pub use auth_service::AuthService;
pub use auth_traits::{AuthServiceTrait, IdentityProviderTrait};
