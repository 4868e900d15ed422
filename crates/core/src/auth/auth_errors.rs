use thiserror::Error;

/// The identity provider rejected an operation.
///
/// `message` is the provider's own text and is shown to users verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    /// HTTP status reported by the provider, if any.
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Failures of the authentication and account-provisioning flows.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A local account could not be written during a flow that requires it.
    #[error("Failed to provision user account: {0}")]
    Provisioning(String),

    /// The provider accepted the current password but refused the new one.
    #[error("{0}")]
    CredentialUpdate(String),
}
