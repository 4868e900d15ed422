//! User (account) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::records::Record;

/// Collection holding user records.
pub const USERS_COLLECTION: &str = "users";

/// Stored field holding the user's email address.
pub const EMAIL_FIELD: &str = "email";

/// Stored field holding the identity provider's user id.
pub const EXTERNAL_ID_FIELD: &str = "externalId";

/// A local user account, linked to the identity provider through `external_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identity provider user id. Empty until the provider has issued one.
    #[serde(default)]
    pub external_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the account is linked to an identity provider user yet.
    pub fn is_linked(&self) -> bool {
        !self.external_id.is_empty()
    }
}

impl Record for User {
    type New = NewUser;
    type Patch = UserUpdate;
    const COLLECTION: &'static str = USERS_COLLECTION;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Input model for creating a new user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub external_id: String,
}

impl NewUser {
    /// A placeholder account for an email the identity provider has not confirmed yet.
    pub fn pending(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            external_id: String::new(),
        }
    }

    /// An account already linked to an identity provider user.
    pub fn linked(email: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            external_id: external_id.into(),
        }
    }

    /// Validates an explicit registration, where every field is mandatory.
    pub fn validate_registration(&self) -> Result<()> {
        let name_missing = self.name.as_deref().map_or(true, |n| n.trim().is_empty());
        if self.email.trim().is_empty() || name_missing || self.external_id.trim().is_empty() {
            return Err(ValidationError::invalid("Email, name, and externalId are required").into());
        }
        Ok(())
    }
}

/// Partial update for a user. Only the fields that are set are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl UserUpdate {
    pub fn external_id(external_id: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id.into()),
            ..Default::default()
        }
    }
}
