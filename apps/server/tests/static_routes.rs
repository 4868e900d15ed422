use std::time::Duration;

use axum::{body::to_bytes, body::Body, http::Request};
use sitekit_server::{api::app_router, build_state, config::Config};
use tempfile::tempdir;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

#[tokio::test]
async fn serves_index_html_for_unknown_route() {
    let db_dir = tempdir().unwrap();
    let static_dir = tempdir().unwrap();
    let index_path = static_dir.path().join("index.html");
    std::fs::write(&index_path, "<html>Site</html>").unwrap();

    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        database_url: db_dir.path().join("site.db").to_string_lossy().to_string(),
        database_name: "site".to_string(),
        site_url: "http://localhost:8080".to_string(),
        auth: None,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        cookie_secure: false,
        static_dir: static_dir.path().to_string_lossy().to_string(),
    };
    let state = build_state(&config).await.unwrap();
    let static_service =
        ServeDir::new(static_dir.path()).fallback(ServeFile::new(index_path.clone()));
    let app = app_router(state, &config).fallback_service(static_service);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ratgeber/some-article")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, "<html>Site</html>".as_bytes());
}
