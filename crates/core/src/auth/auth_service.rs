use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use super::auth_errors::AuthError;
use super::auth_model::{
    submitted, AuthOutcome, ChangePasswordRequest, ConfirmRequest, EmailOtpType,
    MagicLinkRequest, PasswordCredentials, Session, SessionTokens,
};
use super::auth_traits::{AuthServiceTrait, IdentityProviderTrait};
use crate::constants::{
    AUTH_CONFIRM_PATH, AUTH_ERROR_PATH, HOME_PATH, MIN_PASSWORD_LENGTH, PRIVATE_AREA_PATH,
};
use crate::errors::{Result, ValidationError};
use crate::users::{NewUser, UserRepositoryTrait, UserUpdate};

const MAGIC_LINK_SENT: &str = "Check your email for the magic link";

/// Drives the sign-in forms against the identity provider and keeps local
/// accounts provisioned.
pub struct AuthService {
    users: Arc<dyn UserRepositoryTrait>,
    provider: Arc<dyn IdentityProviderTrait>,
    site_url: String,
}

impl AuthService {
    /// `site_url` is the public origin used to build the magic-link landing URL.
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        provider: Arc<dyn IdentityProviderTrait>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            users,
            provider,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn confirm_url(&self) -> String {
        format!("{}{}", self.site_url, AUTH_CONFIRM_PATH)
    }

    /// Makes sure `email` has a local account linked to `external_id`.
    ///
    /// A linked account is left alone, an unlinked one is given the id and a
    /// missing one is created. Failures are logged only.
    async fn link_account(&self, email: &str, external_id: &str) {
        let result = match self.users.find_by_email(email).await {
            Ok(Some(user)) if user.is_linked() => return,
            Ok(Some(_)) if external_id.is_empty() => return,
            Ok(Some(user)) => self
                .users
                .update(&user.id, UserUpdate::external_id(external_id))
                .await
                .map(|_| ()),
            Ok(None) => self
                .users
                .create(NewUser::linked(email, external_id))
                .await
                .map(|_| ()),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!("Linked account {} to provider user {}", email, external_id),
            Err(e) => warn!("Failed to link local account for {}: {}", email, e),
        }
    }
}

/// Accepts only same-site relative paths as post-confirmation targets.
fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => HOME_PATH.to_string(),
    }
}

fn required_credentials(credentials: &PasswordCredentials) -> Result<(&str, &str)> {
    match (
        submitted(&credentials.email),
        submitted(&credentials.password),
    ) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(ValidationError::invalid("Please provide both email and password").into()),
    }
}

fn check_password_length(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::invalid(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ))
        .into());
    }
    Ok(())
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    /// Ensures a local account exists, then asks the provider to email a link.
    ///
    /// The lookup and the create are separate store calls with no lock between
    /// them, so concurrent requests for one new email can create two accounts.
    async fn request_magic_link(&self, request: MagicLinkRequest) -> Result<AuthOutcome> {
        let email = submitted(&request.email)
            .ok_or_else(|| ValidationError::invalid("Please provide your email"))?;

        if self.users.find_by_email(email).await?.is_none() {
            let user = self
                .users
                .create(NewUser::pending(email))
                .await
                .map_err(|e| AuthError::Provisioning(e.to_string()))?;
            debug!("Provisioned pending account {} for {}", user.id, email);
        }

        self.provider
            .sign_in_with_otp(email, &self.confirm_url())
            .await
            .map_err(AuthError::from)?;

        Ok(AuthOutcome::MagicLinkSent {
            message: MAGIC_LINK_SENT.to_string(),
        })
    }

    async fn sign_up(&self, credentials: PasswordCredentials) -> Result<AuthOutcome> {
        let (email, password) = required_credentials(&credentials)?;
        check_password_length(password)?;

        let response = self
            .provider
            .sign_up(email, password)
            .await
            .map_err(AuthError::from)?;

        let external_id = response.external_id.clone().unwrap_or_default();
        self.link_account(email, &external_id).await;

        Ok(AuthOutcome::Redirect {
            location: HOME_PATH.to_string(),
            session: response.session,
        })
    }

    async fn sign_in(&self, credentials: PasswordCredentials) -> Result<AuthOutcome> {
        let (email, password) = required_credentials(&credentials)?;

        let session = self
            .provider
            .sign_in_with_password(email, password)
            .await
            .map_err(AuthError::from)?;

        Ok(AuthOutcome::Redirect {
            location: PRIVATE_AREA_PATH.to_string(),
            session: Some(session),
        })
    }

    async fn confirm(&self, request: ConfirmRequest) -> AuthOutcome {
        let Some(token_hash) = submitted(&request.token_hash) else {
            return AuthOutcome::redirect(format!("{}?error=missing-token", AUTH_ERROR_PATH));
        };
        let Some(otp_type) = submitted(&request.otp_type)
            .and_then(|t| t.parse::<EmailOtpType>().ok())
        else {
            return AuthOutcome::redirect(AUTH_ERROR_PATH);
        };

        match self.provider.verify_otp(otp_type, token_hash).await {
            Ok(session) => {
                if let Some(email) = session.user.email.as_deref() {
                    self.link_account(email, &session.user.id).await;
                }
                AuthOutcome::Redirect {
                    location: safe_next(request.next.as_deref()),
                    session: Some(session),
                }
            }
            Err(e) => {
                warn!("One-time code verification ({}) failed: {}", otp_type, e);
                AuthOutcome::redirect(AUTH_ERROR_PATH)
            }
        }
    }

    async fn change_password(
        &self,
        session: Option<&Session>,
        request: ChangePasswordRequest,
    ) -> Result<()> {
        let (Some(current), Some(new), Some(confirm)) = (
            submitted(&request.current_password),
            submitted(&request.new_password),
            submitted(&request.confirm_password),
        ) else {
            return Err(ValidationError::invalid("All fields are required").into());
        };

        if new != confirm {
            return Err(ValidationError::invalid("New passwords do not match").into());
        }
        check_password_length(new)?;

        let email = session
            .and_then(|s| s.user.email.as_deref())
            .ok_or_else(|| ValidationError::invalid("User email not found"))?;

        let verified = self
            .provider
            .sign_in_with_password(email, current)
            .await
            .map_err(|_| ValidationError::invalid("Current password is incorrect"))?;

        self.provider
            .update_password(&verified.access_token, new)
            .await
            .map_err(|e| AuthError::CredentialUpdate(e.message))?;

        info!("Password changed for {}", email);
        Ok(())
    }

    async fn current_session(&self, tokens: Option<SessionTokens>) -> Option<Session> {
        let tokens = tokens?;
        match self.provider.get_user(&tokens.access_token).await {
            Ok(user) => Some(Session {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires_in: None,
                user,
            }),
            Err(e) => {
                debug!("Session token rejected: {}", e);
                None
            }
        }
    }
}
