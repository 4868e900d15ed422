//! Authentication domain models: provider sessions, form inputs and flow outcomes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated provider session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds, when the provider reported it.
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Tokens a client presented to resume a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Result of a provider signup.
///
/// The provider only returns a session when email confirmation is disabled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignUpResponse {
    pub external_id: Option<String>,
    pub session: Option<Session>,
}

/// Kind of one-time code carried by a confirmation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailOtpType {
    Signup,
    Invite,
    Magiclink,
    Recovery,
    EmailChange,
    Email,
}

impl EmailOtpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailOtpType::Signup => "signup",
            EmailOtpType::Invite => "invite",
            EmailOtpType::Magiclink => "magiclink",
            EmailOtpType::Recovery => "recovery",
            EmailOtpType::EmailChange => "email_change",
            EmailOtpType::Email => "email",
        }
    }
}

impl fmt::Display for EmailOtpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmailOtpType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(EmailOtpType::Signup),
            "invite" => Ok(EmailOtpType::Invite),
            "magiclink" => Ok(EmailOtpType::Magiclink),
            "recovery" => Ok(EmailOtpType::Recovery),
            "email_change" => Ok(EmailOtpType::EmailChange),
            "email" => Ok(EmailOtpType::Email),
            other => Err(format!("Unknown one-time code type: {other}")),
        }
    }
}

/// Magic-link form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MagicLinkRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Email/password form used by signup and login.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordCredentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl PasswordCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

/// Query of a one-time-code confirmation link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub token_hash: Option<String>,
    #[serde(default, rename = "type")]
    pub otp_type: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Password change form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

/// What the caller should do after a successful authentication step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// A one-time-code email was sent; no session exists yet.
    MagicLinkSent { message: String },
    /// Navigate to `location`, persisting `session` when the provider issued one.
    Redirect {
        location: String,
        session: Option<Session>,
    },
}

impl AuthOutcome {
    pub fn redirect(location: impl Into<String>) -> Self {
        AuthOutcome::Redirect {
            location: location.into(),
            session: None,
        }
    }
}

/// Returns the field value when it was submitted and is not empty.
pub(crate) fn submitted(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
