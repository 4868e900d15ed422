use std::sync::Arc;

use crate::config::Config;
use sitekit_core::{
    auth::{AuthService, AuthServiceTrait, IdentityProviderTrait},
    users::{UserRepository, UserService, UserServiceTrait, USERS_COLLECTION},
};
use sitekit_identity::SupabaseAuthClient;
use sitekit_storage_sqlite::DocumentDatabase;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub database: Arc<DocumentDatabase>,
    pub user_service: Arc<dyn UserServiceTrait>,
    /// `None` when user auth is disabled.
    pub auth_service: Option<Arc<dyn AuthServiceTrait>>,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn auth_enabled(&self) -> bool {
        self.auth_service.is_some()
    }
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Wires the application against the configured Supabase project.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = config
        .auth
        .as_ref()
        .map(|auth| SupabaseAuthClient::new(&auth.url, &auth.anon_key))
        .transpose()?
        .map(|client| Arc::new(client) as Arc<dyn IdentityProviderTrait>);
    build_state_with(config, provider).await
}

/// Wires the application with an explicit identity provider.
///
/// The provider is only used when `config` enables user auth.
pub async fn build_state_with(
    config: &Config,
    provider: Option<Arc<dyn IdentityProviderTrait>>,
) -> anyhow::Result<Arc<AppState>> {
    let database = Arc::new(DocumentDatabase::initialize(
        &config.database_url,
        &config.database_name,
    )?);
    tracing::info!(
        "Database '{}' in use at {}",
        database.name(),
        database.path()
    );

    let users = Arc::new(UserRepository::new(Arc::new(
        database.collection(USERS_COLLECTION),
    )));
    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(users.clone()));

    let auth_service = match (config.auth_enabled(), provider) {
        (true, Some(provider)) => Some(Arc::new(AuthService::new(
            users,
            provider,
            &config.site_url,
        )) as Arc<dyn AuthServiceTrait>),
        (true, None) => anyhow::bail!("User auth is enabled but no identity provider is configured"),
        (false, _) => {
            tracing::info!("User auth disabled");
            None
        }
    };

    Ok(Arc::new(AppState {
        database,
        user_service,
        auth_service,
        cookie_secure: config.cookie_secure,
    }))
}
