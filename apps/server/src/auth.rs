//! Session cookies and the route guards built on them.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use sitekit_core::auth::{Session, SessionTokens};
use sitekit_core::constants::{HOME_PATH, SIGN_IN_PATH};

use crate::main_lib::AppState;

/// Cookie carrying the provider access token.
pub const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

/// Cookie carrying the provider refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "sb-refresh-token";

/// Session resolved by [`require_session`] for the handlers behind it.
///
/// Always `None` when user auth is disabled.
#[derive(Debug, Clone, Default)]
pub struct CurrentSession(pub Option<Session>);

/// Reads the session cookies of a request.
pub fn session_tokens(headers: &HeaderMap) -> Option<SessionTokens> {
    let mut access_token = None;
    let mut refresh_token = None;

    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse(raw).flatten() {
            match cookie.name() {
                ACCESS_TOKEN_COOKIE => access_token = Some(cookie.value().to_string()),
                REFRESH_TOKEN_COOKIE => refresh_token = Some(cookie.value().to_string()),
                _ => {}
            }
        }
    }

    access_token
        .filter(|token| !token.is_empty())
        .map(|access_token| SessionTokens {
            access_token,
            refresh_token,
        })
}

fn session_cookie(name: &'static str, value: String, max_age: Option<u64>, secure: bool) -> String {
    let mut cookie = Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    if let Some(seconds) = max_age {
        cookie.set_max_age(CookieDuration::seconds(i64::try_from(seconds).unwrap_or(i64::MAX)));
    }
    cookie.to_string()
}

/// `Set-Cookie` values persisting `session` in the browser.
pub fn session_cookies(session: &Session, secure: bool) -> Vec<HeaderValue> {
    let mut cookies = vec![session_cookie(
        ACCESS_TOKEN_COOKIE,
        session.access_token.clone(),
        session.expires_in,
        secure,
    )];
    if let Some(refresh) = &session.refresh_token {
        cookies.push(session_cookie(REFRESH_TOKEN_COOKIE, refresh.clone(), None, secure));
    }

    cookies
        .into_iter()
        .filter_map(|c| match HeaderValue::from_str(&c) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Dropping unencodable session cookie: {}", e);
                None
            }
        })
        .collect()
}

/// Resolves the request's session, or `None` when auth is off or the cookies are missing/stale.
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let auth = state.auth_service.as_ref()?;
    auth.current_session(session_tokens(headers)).await
}

/// Guard for the private area.
///
/// With auth enabled, requests without a valid session are sent to the sign-in page.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !state.auth_enabled() {
        request.extensions_mut().insert(CurrentSession(None));
        return next.run(request).await;
    }

    match resolve_session(&state, request.headers()).await {
        Some(session) => {
            request
                .extensions_mut()
                .insert(CurrentSession(Some(session)));
            next.run(request).await
        }
        None => Redirect::to(SIGN_IN_PATH).into_response(),
    }
}

/// Guard for the sign-in routes: they only exist while user auth is enabled.
pub async fn require_auth_enabled(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.auth_enabled() {
        return Redirect::to(HOME_PATH).into_response();
    }
    next.run(request).await
}
