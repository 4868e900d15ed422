//! Wire types of the Supabase Auth (GoTrue) REST API.

use serde::{Deserialize, Serialize};
use sitekit_core::auth::{AuthUser, Session, SignUpResponse};

// ─────────────────────────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct OtpRequest<'a> {
    pub email: &'a str,
    pub create_user: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyRequest<'a> {
    #[serde(rename = "type")]
    pub otp_type: &'a str,
    pub token_hash: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateUserRequest<'a> {
    pub password: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Responses
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ApiUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<ApiUser> for AuthUser {
    fn from(user: ApiUser) -> Self {
        AuthUser {
            id: user.id,
            email: user.email.filter(|e| !e.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: ApiUser,
}

impl From<ApiSession> for Session {
    fn from(session: ApiSession) -> Self {
        Session {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
            user: session.user.into(),
        }
    }
}

/// Signup answers with a session when email confirmation is off, and with the
/// bare user otherwise.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiSignUpResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<ApiUser>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<ApiSignUpResponse> for SignUpResponse {
    fn from(response: ApiSignUpResponse) -> Self {
        match (response.access_token, response.user) {
            (Some(access_token), Some(user)) => {
                let session = Session {
                    access_token,
                    refresh_token: response.refresh_token,
                    expires_in: response.expires_in,
                    user: user.into(),
                };
                SignUpResponse {
                    external_id: Some(session.user.id.clone()),
                    session: Some(session),
                }
            }
            (_, Some(user)) => SignUpResponse {
                external_id: Some(user.id),
                session: None,
            },
            (_, None) => SignUpResponse {
                external_id: response.id,
                session: None,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.msg
            .or(self.error_description)
            .or(self.message)
            .or(self.error)
            .filter(|m| !m.is_empty())
    }
}
