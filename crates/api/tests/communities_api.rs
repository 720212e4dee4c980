//! HTTP-level integration tests for genre communities and their discussions.

mod common;

use axum::http::StatusCode;
use cinebuff_core::roles::Role;
use common::{body_json, delete_auth, get, get_auth, post_json_auth, put_auth};
use serde_json::json;
use sqlx::PgPool;

/// Create a community for a fresh genre through the API and return its id.
async fn create_community(pool: &PgPool, admin_token: &str, genre_name: &str) -> i64 {
    let genre = common::create_genre(pool, genre_name).await;
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/communities",
        json!({ "genre_id": genre.id }),
        admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn join(pool: &PgPool, community_id: i64, token: &str) -> serde_json::Value {
    let response = put_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/communities/{community_id}/membership"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn community_name_defaults_to_genre(pool: PgPool) {
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let id = create_community(&pool, &admin_token, "Horror").await;

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/communities/{id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Horror");
    assert_eq!(json["data"]["genre_name"], "Horror");
    assert_eq!(json["data"]["member_count"], 0);
    assert_eq!(json["data"]["is_member"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn one_community_per_genre(pool: PgPool) {
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let genre = common::create_genre(&pool, "Western").await;

    let body = json!({ "genre_id": genre.id, "name": "Cowboys" });
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/communities",
        body.clone(),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/communities",
        body,
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn joining_is_idempotent_and_shows_membership(pool: PgPool) {
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let (_fan, fan_token) = common::user_with_token(&pool, "fan", Role::User).await;
    let id = create_community(&pool, &admin_token, "Horror").await;

    assert_eq!(join(&pool, id, &fan_token).await["data"]["joined"], true);
    assert_eq!(join(&pool, id, &fan_token).await["data"]["joined"], false);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/communities",
        &fan_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["member_count"], 1);
    assert_eq!(json["data"][0]["is_member"], true);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/communities/{id}/membership"),
        &fan_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/communities/{id}/membership"),
        &fan_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_members_post_and_comment(pool: PgPool) {
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let (_member, member_token) = common::user_with_token(&pool, "member", Role::User).await;
    let (_outsider, outsider_token) = common::user_with_token(&pool, "outsider", Role::User).await;
    let id = create_community(&pool, &admin_token, "Horror").await;
    join(&pool, id, &member_token).await;

    let posts_uri = format!("/api/v1/communities/{id}/posts");
    let post_body = json!({ "title": "Best slasher?", "content": "Halloween, obviously." });

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &posts_uri,
        post_body.clone(),
        &outsider_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &posts_uri,
        post_body,
        &member_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let post_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let comments_uri = format!("/api/v1/posts/{post_id}/comments");
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &comments_uri,
        json!({ "content": "Scream." }),
        &outsider_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    for content in ["Scream.", "Black Christmas."] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &comments_uri,
            json!({ "content": content }),
            &member_token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Reading is open to everyone.
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/posts/{post_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["author_username"], "member");
    assert_eq!(json["data"]["comments"][0]["content"], "Scream.");
    assert_eq!(json["data"]["comments"][1]["content"], "Black Christmas.");

    let response = get(common::build_test_app(pool), &posts_uri).await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["comment_count"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_post_content_is_rejected(pool: PgPool) {
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let (_member, member_token) = common::user_with_token(&pool, "member", Role::User).await;
    let id = create_community(&pool, &admin_token, "Horror").await;
    join(&pool, id, &member_token).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/communities/{id}/posts"),
        json!({ "title": "Hello", "content": "   " }),
        &member_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn authors_and_admins_delete_posts(pool: PgPool) {
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let (_author, author_token) = common::user_with_token(&pool, "author", Role::User).await;
    let (_peer, peer_token) = common::user_with_token(&pool, "peer", Role::User).await;
    let id = create_community(&pool, &admin_token, "Horror").await;
    join(&pool, id, &author_token).await;
    join(&pool, id, &peer_token).await;

    let mut post_ids = Vec::new();
    for title in ["First", "Second"] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/communities/{id}/posts"),
            json!({ "title": title, "content": "Discuss." }),
            &author_token,
        )
        .await;
        post_ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/posts/{}", post_ids[0]),
        &peer_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/posts/{}", post_ids[0]),
        &author_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/posts/{}", post_ids[1]),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/posts/{}", post_ids[1]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
