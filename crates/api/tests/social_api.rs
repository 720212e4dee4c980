//! HTTP-level integration tests for profiles, connections, watchlists,
//! favorites and reviews.

mod common;

use axum::http::StatusCode;
use cinebuff_core::roles::Role;
use common::{body_json, delete_auth, get, get_auth, put_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update_sets_bio_and_favorite_genres(pool: PgPool) {
    let (_user, token) = common::user_with_token(&pool, "cinephile", Role::User).await;
    let noir = common::create_genre(&pool, "Noir").await;
    let drama = common::create_genre(&pool, "Drama").await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/me",
        json!({ "bio": "  Mostly Melville.  ", "favorite_genre_ids": [noir.id, drama.id] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["bio"], "Mostly Melville.");
    assert_eq!(json["data"]["favorite_genres"][0]["name"], "Drama");
    assert_eq!(json["data"]["favorite_genres"][1]["name"], "Noir");

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/v1/me",
        json!({ "favorite_genre_ids": [] }),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["bio"], "Mostly Melville.");
    assert!(json["data"]["favorite_genres"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn connections_are_idempotent_and_visible(pool: PgPool) {
    let (_me, my_token) = common::user_with_token(&pool, "me", Role::User).await;
    let them = common::create_user(&pool, "critic", Role::Critic).await;
    let uri = format!("/api/v1/users/{}/connection", them.id);

    let response = put_auth(common::build_test_app(pool.clone()), &uri, &my_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let response = put_auth(common::build_test_app(pool.clone()), &uri, &my_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", them.id),
        &my_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "critic");
    assert_eq!(json["data"]["is_connected"], true);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", them.id),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["is_connected"], false);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/me/connections",
        &my_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["username"], "critic");

    let response = delete_auth(common::build_test_app(pool), &uri, &my_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cannot_connect_to_self(pool: PgPool) {
    let (me, token) = common::user_with_token(&pool, "me", Role::User).await;
    let response = put_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}/connection", me.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn watchlist_add_is_get_or_create(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "planner", Role::User).await;
    let heat = common::create_movie(&pool, "Heat", vec![], user.id).await;
    let ronin = common::create_movie(&pool, "Ronin", vec![], user.id).await;

    let heat_uri = format!("/api/v1/me/watchlist/{}", heat.id);
    let response = put_auth(common::build_test_app(pool.clone()), &heat_uri, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first_id = body_json(response).await["data"]["entry"]["id"].clone();

    let response = put_auth(common::build_test_app(pool.clone()), &heat_uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["created"], false);
    assert_eq!(json["data"]["entry"]["id"], first_id);

    put_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/me/watchlist/{}", ronin.id),
        &token,
    )
    .await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/me/watchlist",
        &token,
    )
    .await;
    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Ronin", "Heat"]);

    // Favorites are a separate list.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/me/favorites",
        &token,
    )
    .await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    let response = delete_auth(common::build_test_app(pool.clone()), &heat_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(common::build_test_app(pool), &heat_uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_a_missing_movie_is_404(pool: PgPool) {
    let (_user, token) = common::user_with_token(&pool, "planner", Role::User).await;
    let response = put_auth(
        common::build_test_app(pool),
        "/api/v1/me/favorites/424242",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reviews_are_one_per_movie_and_owner_scoped(pool: PgPool) {
    let (author, author_token) = common::user_with_token(&pool, "author", Role::User).await;
    let (_peer, peer_token) = common::user_with_token(&pool, "peer", Role::User).await;
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let movie = common::create_movie(&pool, "Heat", vec![], author.id).await;
    let review_uri = format!("/api/v1/movies/{}/review", movie.id);

    for title in ["First take", "Second take"] {
        let response = put_json_auth(
            common::build_test_app(pool.clone()),
            &review_uri,
            json!({ "title": title, "content": "Long and loud." }),
            &author_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/movies/{}/reviews", movie.id),
    )
    .await;
    let json = body_json(response).await;
    let reviews = json["data"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["title"], "Second take");
    let review_id = reviews[0]["id"].as_i64().unwrap();

    // Non-admins only see their own reviews.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/reviews",
        &peer_token,
    )
    .await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/reviews",
        &admin_token,
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let review_path = format!("/api/v1/reviews/{review_id}");
    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &review_path,
        &peer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = delete_auth(common::build_test_app(pool), &review_path, &author_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
