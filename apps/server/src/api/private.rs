use std::sync::Arc;

use crate::{
    auth::{require_session, CurrentSession},
    error::{ActionError, ActionResult},
    main_lib::AppState,
    models::{SessionResponse, SuccessResponse},
};
use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Form, Json, Router,
};
use sitekit_core::auth::ChangePasswordRequest;
use sitekit_core::errors::ValidationError;

#[utoipa::path(
    get,
    path = "/private",
    responses(
        (status = 200, body = SessionResponse),
        (status = 303, description = "No valid session; redirect to /auth")
    )
)]
pub async fn private_area(
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> Json<SessionResponse> {
    Json(session.into())
}

#[utoipa::path(
    post,
    path = "/private/change-password",
    responses(
        (status = 200, body = SuccessResponse),
        (status = 400, description = "Invalid form or wrong current password"),
        (status = 500, description = "Password update failed")
    )
)]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
    Form(form): Form<ChangePasswordRequest>,
) -> ActionResult<Json<SuccessResponse>> {
    // Without user auth there is never a session to change the password of.
    let Some(auth) = state.auth_service.clone() else {
        return Err(ActionError(
            ValidationError::invalid("User email not found").into(),
        ));
    };
    auth.change_password(session.as_ref(), form).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Session-guarded routes, mounted under `/private`.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(private_area))
        .route("/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}
