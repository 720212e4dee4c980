use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify seeded roles.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    cinebuff_db::health_check(&pool).await.unwrap();

    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM roles ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(names, vec!["user", "critic", "admin"]);
}

/// Every table the service reads from exists after migration.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tables_exist(pool: PgPool) {
    let tables = [
        "users",
        "user_sessions",
        "genres",
        "movies",
        "movie_genres",
        "ratings",
        "rating_stats",
        "reviews",
        "watchlist_items",
        "favorites",
        "user_connections",
        "user_favorite_genres",
        "communities",
        "community_members",
        "discussion_posts",
        "discussion_comments",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Seeded role rows resolve to the matching domain roles.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seeded_roles_resolve(pool: PgPool) {
    use cinebuff_core::roles::Role;
    use cinebuff_db::repositories::RoleRepo;

    for role in [Role::User, Role::Critic, Role::Admin] {
        let row = RoleRepo::find_by_name(&pool, role.as_str())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(RoleRepo::resolve(&pool, row.id).await.unwrap(), Some(role));
    }
    assert_eq!(RoleRepo::resolve(&pool, 9_999).await.unwrap(), None);
}
