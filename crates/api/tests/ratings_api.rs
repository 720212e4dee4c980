//! HTTP-level integration tests for ratings and the cached statistics they
//! keep up to date.

mod common;

use axum::http::StatusCode;
use cinebuff_core::roles::Role;
use common::{body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

fn scores(story: i32, acting: i32, cinematography: i32) -> serde_json::Value {
    json!({
        "story_score": story,
        "acting_score": acting,
        "cinematography_score": cinematography,
    })
}

async fn stats(pool: &PgPool, movie_id: i64) -> serde_json::Value {
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/movies/{movie_id}/stats"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

async fn rate(pool: &PgPool, movie_id: i64, body: serde_json::Value, token: &str) -> StatusCode {
    put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/movies/{movie_id}/rating"),
        body,
        token,
    )
    .await
    .status()
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_and_critic_ratings_are_weighted(pool: PgPool) {
    let (user, user_token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let (_critic, critic_token) = common::user_with_token(&pool, "critic", Role::Critic).await;
    let movie = common::create_movie(&pool, "Heat", vec![], user.id).await;

    assert!(stats(&pool, movie.id).await.is_null());

    assert_eq!(rate(&pool, movie.id, scores(8, 6, 7), &user_token).await, StatusCode::CREATED);
    assert_eq!(
        rate(&pool, movie.id, scores(10, 10, 10), &critic_token).await,
        StatusCode::CREATED
    );

    let s = stats(&pool, movie.id).await;
    assert_eq!(s["total_ratings"], 2);
    assert_eq!(s["user_ratings_count"], 1);
    assert_eq!(s["critic_ratings_count"], 1);
    assert_eq!(s["weighted_average"], 9.0);
    assert_eq!(s["user_average"], 7.0);
    assert_eq!(s["critic_average"], 10.0);
    assert_eq!(s["story_average"], 9.0);
    assert_eq!(s["acting_average"], 8.0);
    assert_eq!(s["cinematography_average"], 8.5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_response_carries_fresh_stats(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let movie = common::create_movie(&pool, "Heat", vec![], user.id).await;

    let body = json!({
        "movie_id": movie.id,
        "story_score": 7,
        "acting_score": 7,
        "cinematography_score": 8,
        "score": 4,
    });
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/ratings", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["rating"]["calculated_overall_score"], 7.3);
    // Legacy star score wins for display: 4 stars is 8 on the 1-10 scale.
    assert_eq!(json["data"]["rating"]["effective_score"], 8.0);
    // The aggregate always uses the category scores.
    assert_eq!(json["data"]["stats"]["weighted_average"], 7.3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replacing_a_rating_updates_stats(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let movie = common::create_movie(&pool, "Heat", vec![], user.id).await;

    assert_eq!(rate(&pool, movie.id, scores(2, 2, 2), &token).await, StatusCode::CREATED);
    assert_eq!(rate(&pool, movie.id, scores(6, 6, 6), &token).await, StatusCode::OK);

    let s = stats(&pool, movie.id).await;
    assert_eq!(s["total_ratings"], 1);
    assert_eq!(s["weighted_average"], 6.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_the_last_rating_removes_stats(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let movie = common::create_movie(&pool, "Heat", vec![], user.id).await;

    rate(&pool, movie.id, scores(5, 5, 5), &token).await;
    assert!(!stats(&pool, movie.id).await.is_null());

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/movies/{}/rating", movie.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(stats(&pool, movie.id).await.is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_ratings_stay_out_of_role_averages(pool: PgPool) {
    let (admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let (_user, user_token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let movie = common::create_movie(&pool, "Heat", vec![], admin.id).await;

    rate(&pool, movie.id, scores(4, 4, 4), &admin_token).await;
    rate(&pool, movie.id, scores(8, 8, 8), &user_token).await;

    let s = stats(&pool, movie.id).await;
    assert_eq!(s["total_ratings"], 2);
    assert_eq!(s["user_ratings_count"], 1);
    assert_eq!(s["critic_ratings_count"], 0);
    assert_eq!(s["weighted_average"], 6.0);
    assert_eq!(s["user_average"], 8.0);
    assert_eq!(s["critic_average"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn promoting_a_user_reweights_their_ratings(pool: PgPool) {
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let (riser, riser_token) = common::user_with_token(&pool, "riser", Role::User).await;
    let (_other, other_token) = common::user_with_token(&pool, "other", Role::User).await;
    let movie = common::create_movie(&pool, "Heat", vec![], riser.id).await;

    rate(&pool, movie.id, scores(10, 10, 10), &riser_token).await;
    rate(&pool, movie.id, scores(7, 7, 7), &other_token).await;
    assert_eq!(stats(&pool, movie.id).await["weighted_average"], 8.5);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/users/{}/role", riser.id),
        json!({ "role": "critic" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "critic");

    // (2 * 10 + 7) / 3 = 9.0
    let s = stats(&pool, movie.id).await;
    assert_eq!(s["weighted_average"], 9.0);
    assert_eq!(s["critic_ratings_count"], 1);
    assert_eq!(s["user_ratings_count"], 1);
}

// ---------------------------------------------------------------------------
// Rejected mutations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_scores_are_rejected(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let movie = common::create_movie(&pool, "Heat", vec![], user.id).await;

    assert_eq!(rate(&pool, movie.id, scores(11, 5, 5), &token).await, StatusCode::BAD_REQUEST);
    assert_eq!(rate(&pool, movie.id, scores(5, 0, 5), &token).await, StatusCode::BAD_REQUEST);
    let mut stars_out_of_range = scores(5, 5, 5);
    stars_out_of_range["score"] = json!(6);
    assert_eq!(rate(&pool, movie.id, stars_out_of_range, &token).await, StatusCode::BAD_REQUEST);
    assert!(stats(&pool, movie.id).await.is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_post_for_same_movie_conflicts(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let movie = common::create_movie(&pool, "Heat", vec![], user.id).await;

    let mut body = scores(5, 5, 5);
    body["movie_id"] = json!(movie.id);
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/ratings",
        body.clone(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    body["story_score"] = json!(9);
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/v1/ratings", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    assert_eq!(stats(&pool, movie.id).await["story_average"], 5.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_a_missing_movie_is_404(pool: PgPool) {
    let (_user, token) = common::user_with_token(&pool, "viewer", Role::User).await;
    assert_eq!(rate(&pool, 424242, scores(5, 5, 5), &token).await, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_the_author_edits_and_admins_may_delete(pool: PgPool) {
    let (author, author_token) = common::user_with_token(&pool, "author", Role::User).await;
    let (_other, other_token) = common::user_with_token(&pool, "other", Role::Critic).await;
    let (_admin, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let movie = common::create_movie(&pool, "Heat", vec![], author.id).await;

    let mut body = scores(5, 5, 5);
    body["movie_id"] = json!(movie.id);
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/ratings",
        body,
        &author_token,
    )
    .await;
    let rating_id = body_json(response).await["data"]["rating"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/ratings/{rating_id}");

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "story_score": 9 }),
        &other_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "story_score": 8 }),
        &author_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["rating"]["story_score"], 8);
    assert_eq!(json["data"]["rating"]["acting_score"], 5);
    // (8 + 5 + 5) / 3 = 6.0
    assert_eq!(json["data"]["stats"]["weighted_average"], 6.0);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(stats(&pool, movie.id).await.is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ratings_list_filters_by_movie(pool: PgPool) {
    let (user, token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let heat = common::create_movie(&pool, "Heat", vec![], user.id).await;
    let ronin = common::create_movie(&pool, "Ronin", vec![], user.id).await;
    rate(&pool, heat.id, scores(5, 5, 5), &token).await;
    rate(&pool, ronin.id, scores(6, 6, 6), &token).await;

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/ratings?movie_id={}", ronin.id),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let ratings = json["data"].as_array().unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["movie_id"], ronin.id);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/movies/{}/ratings", heat.id),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["username"], "viewer");
    assert_eq!(json["data"][0]["role"], "user");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_rebuild_reports_processed_movies(pool: PgPool) {
    let (admin, token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    common::create_movie(&pool, "Heat", vec![], admin.id).await;
    common::create_movie(&pool, "Ronin", vec![], admin.id).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/rating-stats/rebuild",
        json!({}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["movies_processed"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ratings_list_is_scoped_to_the_caller(pool: PgPool) {
    let (viewer, viewer_token) = common::user_with_token(&pool, "viewer", Role::User).await;
    let (other, other_token) = common::user_with_token(&pool, "other", Role::Critic).await;
    let (_, admin_token) = common::user_with_token(&pool, "boss", Role::Admin).await;
    let movie = common::create_movie(&pool, "Heat", vec![], other.id).await;
    rate(&pool, movie.id, scores(5, 5, 5), &viewer_token).await;
    rate(&pool, movie.id, scores(9, 9, 9), &other_token).await;

    let response = get(common::build_test_app(pool.clone()), "/api/v1/ratings").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // A user filter naming someone else is ignored for non-admins.
    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/ratings?user_id={}", other.id),
        &viewer_token,
    )
    .await;
    let json = body_json(response).await;
    let ratings = json["data"].as_array().unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["user_id"], viewer.id);

    let response =
        get_auth(common::build_test_app(pool.clone()), "/api/v1/ratings", &admin_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/ratings?user_id={}", other.id),
        &admin_token,
    )
    .await;
    let json = body_json(response).await;
    let ratings = json["data"].as_array().unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0]["user_id"], other.id);
}
