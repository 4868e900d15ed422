use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ListUsersQuery, NewUser, User, UsersPage},
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersQuery),
    responses((status = 200, body = UsersPage))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UsersPage>> {
    let page = state.user_service.list_users(query.into()).await?;
    Ok(Json(UsersPage::from(page)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUser,
    responses(
        (status = 201, body = User),
        (status = 400, description = "Malformed body or missing fields"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(payload) =
        payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let created = state.user_service.register_user(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(User::from(created))))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users", get(list_users).post(create_user))
}
