use std::{net::SocketAddr, time::Duration};

use anyhow::{bail, Context};

/// Supabase project the sign-in flows talk to.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub database_name: String,
    /// Public origin of the site, used to build the magic-link landing URL.
    pub site_url: String,
    /// `None` when user auth is disabled.
    pub auth: Option<SupabaseConfig>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub cookie_secure: bool,
    pub static_dir: String,
}

fn required(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => bail!("{} must be set", name),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("SITE_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SITE_LISTEN_ADDR")?;
        let database_url = required("DATABASE_URL")?;
        let database_name = required("DATABASE_NAME")?;
        let site_url = std::env::var("PUBLIC_SITE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into());

        // Only the literal "true" turns user auth on.
        let auth_enabled = std::env::var("PUBLIC_AUTH_ENABLED").as_deref() == Ok("true");
        let auth = if auth_enabled {
            Some(SupabaseConfig {
                url: required("SUPABASE_URL")?,
                anon_key: required("SUPABASE_ANON_KEY")?,
            })
        } else {
            None
        };

        let cors_allow = std::env::var("SITE_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("SITE_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let cookie_secure = std::env::var("SITE_COOKIE_SECURE")
            .map(|v| v != "false")
            .unwrap_or(true);
        let static_dir = std::env::var("SITE_STATIC_DIR").unwrap_or_else(|_| "build".into());

        Ok(Self {
            listen_addr,
            database_url,
            database_name,
            site_url,
            auth,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            cookie_secure,
            static_dir,
        })
    }

    pub fn auth_enabled(&self) -> bool {
        self.auth.is_some()
    }
}
