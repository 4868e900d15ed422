use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitekit_core::auth as core_auth;
use sitekit_core::constants::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};
use sitekit_core::records::{Page, PageRequest};
use sitekit_core::users as core_users;
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub external_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<core_users::User> for User {
    fn from(u: core_users::User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            external_id: u.external_id,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Registration body. Every field is required; missing ones are reported by the service.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
}

impl From<NewUser> for core_users::NewUser {
    fn from(u: NewUser) -> Self {
        Self {
            email: u.email.unwrap_or_default(),
            name: u.name,
            external_id: u.external_id.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub total: u64,
}

impl From<Page<core_users::User>> for UsersPage {
    fn from(page: Page<core_users::User>) -> Self {
        Self {
            users: page.items.into_iter().map(User::from).collect(),
            total: page.total,
        }
    }
}

/// Raw listing query. Values that are not positive numbers fall back to the defaults.
#[derive(Deserialize, IntoParams, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn number_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n != 0.0)
        .map(|n| n.trunc() as i64)
        .filter(|n| *n != 0)
        .unwrap_or(default)
}

impl From<ListUsersQuery> for PageRequest {
    fn from(q: ListUsersQuery) -> Self {
        PageRequest::new(
            number_or(q.page.as_deref(), DEFAULT_PAGE),
            number_or(q.limit.as_deref(), DEFAULT_PAGE_LIMIT),
        )
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
}

/// The signed-in user as exposed to the browser. Tokens stay in the HttpOnly cookies.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: SessionUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

impl From<core_auth::Session> for SessionInfo {
    fn from(s: core_auth::Session) -> Self {
        Self {
            user: SessionUser {
                id: s.user.id,
                email: s.user.email,
            },
            expires_in: s.expires_in,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SessionResponse {
    pub session: Option<SessionInfo>,
}

impl From<Option<core_auth::Session>> for SessionResponse {
    fn from(session: Option<core_auth::Session>) -> Self {
        Self {
            session: session.map(SessionInfo::from),
        }
    }
}
