//! Identity provider and authentication service traits.

use async_trait::async_trait;

use super::auth_errors::ProviderResult;
use super::auth_model::{
    AuthOutcome, AuthUser, ChangePasswordRequest, ConfirmRequest, EmailOtpType,
    MagicLinkRequest, PasswordCredentials, Session, SessionTokens, SignUpResponse,
};
use crate::errors::Result;

/// Capabilities of the external identity provider.
///
/// The provider is opaque: every rejection comes back as a `ProviderError`
/// carrying the provider's message.
#[async_trait]
pub trait IdentityProviderTrait: Send + Sync {
    /// Emails a one-time sign-in link that lands on `redirect_to`.
    async fn sign_in_with_otp(&self, email: &str, redirect_to: &str) -> ProviderResult<()>;

    async fn sign_up(&self, email: &str, password: &str) -> ProviderResult<SignUpResponse>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ProviderResult<Session>;

    /// Exchanges a one-time-code token hash for a session.
    async fn verify_otp(&self, otp_type: EmailOtpType, token_hash: &str)
        -> ProviderResult<Session>;

    /// Replaces the password of the user owning `access_token`.
    async fn update_password(&self, access_token: &str, new_password: &str)
        -> ProviderResult<()>;

    /// Resolves the user owning `access_token`, validating it with the provider.
    async fn get_user(&self, access_token: &str) -> ProviderResult<AuthUser>;
}

/// The account-provisioning workflow behind the sign-in forms.
#[async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn request_magic_link(&self, request: MagicLinkRequest) -> Result<AuthOutcome>;

    async fn sign_up(&self, credentials: PasswordCredentials) -> Result<AuthOutcome>;

    async fn sign_in(&self, credentials: PasswordCredentials) -> Result<AuthOutcome>;

    /// Verifies a confirmation link. Always resolves to a redirect.
    async fn confirm(&self, request: ConfirmRequest) -> AuthOutcome;

    async fn change_password(
        &self,
        session: Option<&Session>,
        request: ChangePasswordRequest,
    ) -> Result<()>;

    /// The session for `tokens`, or `None` when absent or rejected by the provider.
    async fn current_session(&self, tokens: Option<SessionTokens>) -> Option<Session>;
}
