//! Identity provider integration for sitekit.
//!
//! [`SupabaseAuthClient`] implements `sitekit_core::auth::IdentityProviderTrait`
//! against the Supabase Auth (GoTrue) REST API.

mod client;
mod models;

pub use client::SupabaseAuthClient;
