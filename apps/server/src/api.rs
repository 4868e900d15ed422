use std::sync::Arc;

use crate::{
    config::Config,
    main_lib::AppState,
    models::{
        MessageResponse, NewUser, SessionInfo, SessionResponse, SessionUser, SuccessResponse,
        User, UsersPage,
    },
};
use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

mod auth;
mod health;
mod private;
mod users;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        users::list_users,
        users::create_user,
        auth::request_magic_link,
        auth::sign_up,
        auth::sign_in,
        auth::confirm,
        auth::current_session,
        private::private_area,
        private::change_password
    ),
    components(schemas(
        User,
        NewUser,
        UsersPage,
        MessageResponse,
        SuccessResponse,
        SessionResponse,
        SessionInfo,
        SessionUser
    )),
    tags((name = "sitekit"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(auth::session_router());

    Router::new()
        .nest("/api", api)
        .nest("/auth", auth::router(state.clone()))
        .nest("/private", private::router(state.clone()))
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
