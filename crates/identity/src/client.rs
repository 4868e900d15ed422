//! HTTP client for the Supabase Auth (GoTrue) REST API.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use sitekit_core::auth::{
    AuthUser, EmailOtpType, IdentityProviderTrait, ProviderError, ProviderResult, Session,
    SignUpResponse,
};
use sitekit_core::errors::{Error, Result};

use crate::models::{
    ApiErrorResponse, ApiSession, ApiSignUpResponse, ApiUser, OtpRequest, PasswordRequest,
    UpdateUserRequest, VerifyRequest,
};

/// Default timeout for provider requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the project API key on every request.
const API_KEY_HEADER: &str = "apikey";

/// Client for a Supabase project's auth endpoints.
///
/// Anonymous calls authenticate with the project's anon key; user calls
/// (`update_password`, `get_user`) carry the user's access token instead.
#[derive(Debug, Clone)]
pub struct SupabaseAuthClient {
    client: reqwest::Client,
    base_url: String,
    api_key: HeaderValue,
    anon_bearer: HeaderValue,
}

impl SupabaseAuthClient {
    /// Create a client for the project at `project_url` (e.g. "https://xyz.supabase.co").
    pub fn new(project_url: &str, anon_key: &str) -> Result<Self> {
        let api_key = HeaderValue::from_str(anon_key)
            .map_err(|e| Error::Unexpected(format!("Invalid Supabase anon key: {}", e)))?;
        let anon_bearer = bearer(anon_key)
            .map_err(|e| Error::Unexpected(format!("Invalid Supabase anon key: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: project_url.trim_end_matches('/').to_string(),
            api_key,
            anon_bearer,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn headers(&self, authorization: HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, self.api_key.clone());
        headers.insert(AUTHORIZATION, authorization);
        headers
    }

    fn user_headers(&self, access_token: &str) -> ProviderResult<HeaderMap> {
        let authorization = bearer(access_token)
            .map_err(|_| ProviderError::with_status("Invalid access token", 401))?;
        Ok(self.headers(authorization))
    }

    async fn send(&self, request: RequestBuilder) -> ProviderResult<String> {
        let response = request.send().await.map_err(|e| {
            ProviderError::new(format!("Unable to reach the authentication service: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderError::with_status(format!("Failed to read response: {}", e), status.as_u16())
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(ApiErrorResponse::into_message)
                .unwrap_or_else(|| format!("Authentication service error (HTTP {})", status));
            debug!("[SupabaseAuth] {} -> {}", status, message);
            return Err(ProviderError::with_status(message, status.as_u16()));
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ProviderResult<T> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            ProviderError::new(format!("Unexpected authentication service response: {}", e))
        })
    }
}

fn bearer(token: &str) -> std::result::Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", token))
}

#[async_trait]
impl IdentityProviderTrait for SupabaseAuthClient {
    async fn sign_in_with_otp(&self, email: &str, redirect_to: &str) -> ProviderResult<()> {
        debug!("[SupabaseAuth] POST /otp");
        let request = self
            .client
            .post(self.url("/otp"))
            .query(&[("redirect_to", redirect_to)])
            .headers(self.headers(self.anon_bearer.clone()))
            .json(&OtpRequest {
                email,
                create_user: true,
            });
        self.send(request).await.map(|_| ())
    }

    async fn sign_up(&self, email: &str, password: &str) -> ProviderResult<SignUpResponse> {
        debug!("[SupabaseAuth] POST /signup");
        let request = self
            .client
            .post(self.url("/signup"))
            .headers(self.headers(self.anon_bearer.clone()))
            .json(&PasswordRequest { email, password });
        let response: ApiSignUpResponse = self.send_json(request).await?;
        Ok(response.into())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> ProviderResult<Session> {
        debug!("[SupabaseAuth] POST /token?grant_type=password");
        let request = self
            .client
            .post(self.url("/token"))
            .query(&[("grant_type", "password")])
            .headers(self.headers(self.anon_bearer.clone()))
            .json(&PasswordRequest { email, password });
        let session: ApiSession = self.send_json(request).await?;
        Ok(session.into())
    }

    async fn verify_otp(&self, otp_type: EmailOtpType, token_hash: &str) -> ProviderResult<Session> {
        debug!("[SupabaseAuth] POST /verify ({})", otp_type);
        let request = self
            .client
            .post(self.url("/verify"))
            .headers(self.headers(self.anon_bearer.clone()))
            .json(&VerifyRequest {
                otp_type: otp_type.as_str(),
                token_hash,
            });
        let session: ApiSession = self.send_json(request).await?;
        Ok(session.into())
    }

    async fn update_password(&self, access_token: &str, new_password: &str) -> ProviderResult<()> {
        debug!("[SupabaseAuth] PUT /user");
        let request = self
            .client
            .put(self.url("/user"))
            .headers(self.user_headers(access_token)?)
            .json(&UpdateUserRequest {
                password: new_password,
            });
        self.send(request).await.map(|_| ())
    }

    async fn get_user(&self, access_token: &str) -> ProviderResult<AuthUser> {
        let request = self
            .client
            .get(self.url("/user"))
            .headers(self.user_headers(access_token)?);
        let user: ApiUser = self.send_json(request).await?;
        Ok(user.into())
    }
}
