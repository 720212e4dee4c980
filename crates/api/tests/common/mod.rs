#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use cinebuff_api::auth::jwt::{generate_access_token, JwtConfig};
use cinebuff_api::auth::password::hash_password;
use cinebuff_api::config::ServerConfig;
use cinebuff_api::router::build_app_router;
use cinebuff_api::state::AppState;
use cinebuff_core::roles::Role;
use cinebuff_core::types::DbId;
use cinebuff_db::models::genre::{CreateGenre, Genre};
use cinebuff_db::models::movie::{CreateMovie, Movie};
use cinebuff_db::models::user::{CreateUser, User};
use cinebuff_db::repositories::{GenreRepo, MovieRepo, RoleRepo, UserRepo};

/// Password used for every user created through [`create_user`].
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        bootstrap_admin: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with the given role directly into the database.
pub async fn create_user(pool: &PgPool, username: &str, role: Role) -> User {
    let role_row = RoleRepo::find_by_name(pool, role.as_str())
        .await
        .unwrap()
        .expect("roles are seeded by migrations");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role_id: role_row.id,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Mint an access token for a user without going through `/auth/login`.
pub fn token_for(user_id: DbId, role: Role) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

/// Create a user and return it together with a valid access token.
pub async fn user_with_token(pool: &PgPool, username: &str, role: Role) -> (User, String) {
    let user = create_user(pool, username, role).await;
    let token = token_for(user.id, role);
    (user, token)
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

pub async fn create_genre(pool: &PgPool, name: &str) -> Genre {
    GenreRepo::create(
        pool,
        &CreateGenre {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .expect("genre creation should succeed")
}

pub async fn create_movie(
    pool: &PgPool,
    title: &str,
    genre_ids: Vec<DbId>,
    created_by: DbId,
) -> Movie {
    let input = CreateMovie {
        title: title.to_string(),
        synopsis: format!("{title} synopsis"),
        release_date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        poster_url: None,
        content_type: None,
        genre_ids,
    };
    MovieRepo::create(pool, &input, "movie", created_by)
        .await
        .expect("movie creation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, None, Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None, Some(token)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
