use std::sync::Arc;

use crate::{
    auth::{require_auth_enabled, resolve_session, session_cookies},
    error::ActionResult,
    main_lib::AppState,
    models::{MessageResponse, SessionResponse},
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use sitekit_core::auth::{
    AuthOutcome, AuthServiceTrait, ConfirmRequest, MagicLinkRequest, PasswordCredentials,
};
use sitekit_core::constants::HOME_PATH;

/// Renders a successful flow step: the magic-link notice as JSON, anything
/// else as a 303 that stores the issued session.
fn outcome_response(outcome: AuthOutcome, cookie_secure: bool) -> Response {
    match outcome {
        AuthOutcome::MagicLinkSent { message } => Json(MessageResponse { message }).into_response(),
        AuthOutcome::Redirect { location, session } => {
            let mut response = Redirect::to(&location).into_response();
            if let Some(session) = session {
                for cookie in session_cookies(&session, cookie_secure) {
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
            }
            response
        }
    }
}

fn service(state: &AppState) -> Option<Arc<dyn AuthServiceTrait>> {
    state.auth_service.clone()
}

#[utoipa::path(
    post,
    path = "/auth/magic-link",
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Missing email or provider error"),
        (status = 500, description = "Account provisioning failed")
    )
)]
pub async fn request_magic_link(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MagicLinkRequest>,
) -> ActionResult<Response> {
    let Some(auth) = service(&state) else {
        return Ok(Redirect::to(HOME_PATH).into_response());
    };
    let outcome = auth.request_magic_link(form).await?;
    Ok(outcome_response(outcome, state.cookie_secure))
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    responses(
        (status = 303, description = "Signed up"),
        (status = 400, description = "Invalid form or provider error")
    )
)]
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PasswordCredentials>,
) -> ActionResult<Response> {
    let Some(auth) = service(&state) else {
        return Ok(Redirect::to(HOME_PATH).into_response());
    };
    let outcome = auth.sign_up(form).await?;
    Ok(outcome_response(outcome, state.cookie_secure))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    responses(
        (status = 303, description = "Signed in"),
        (status = 400, description = "Invalid form or provider error")
    )
)]
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PasswordCredentials>,
) -> ActionResult<Response> {
    let Some(auth) = service(&state) else {
        return Ok(Redirect::to(HOME_PATH).into_response());
    };
    let outcome = auth.sign_in(form).await?;
    Ok(outcome_response(outcome, state.cookie_secure))
}

#[utoipa::path(
    get,
    path = "/auth/confirm",
    responses((status = 303, description = "Redirect to the next page or the auth error page"))
)]
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConfirmRequest>,
) -> Response {
    let Some(auth) = service(&state) else {
        return Redirect::to(HOME_PATH).into_response();
    };
    outcome_response(auth.confirm(query).await, state.cookie_secure)
}

#[utoipa::path(get, path = "/api/session", responses((status = 200, body = SessionResponse)))]
pub async fn current_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    Json(resolve_session(&state, &headers).await.into())
}

/// Sign-in routes, mounted under `/auth`.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/magic-link", post(request_magic_link))
        .route("/signup", post(sign_up))
        .route("/login", post(sign_in))
        .route("/confirm", get(confirm))
        .route_layer(middleware::from_fn_with_state(state, require_auth_enabled))
}

/// Session lookup, mounted under `/api`.
pub fn session_router() -> Router<Arc<AppState>> {
    Router::new().route("/session", get(current_session))
}
