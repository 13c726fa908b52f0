//! Schema tests: migrations applied in order to an empty database.
//!
//! These tests require a `PostgreSQL` server reachable through
//! `DATABASE_URL`; sqlx creates and migrates a fresh database per test.

#![allow(clippy::unwrap_used)]

use sqlx::PgPool;
use surf_bot_integration_tests::{DANA_PHONE, HILTON_SLUG, insert_dana_and_hilton};

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

async fn insert_favorite(pool: &PgPool, phone: &str, slug: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO favorites (phone_number, beach_slug) VALUES ($1, $2)")
        .bind(phone)
        .bind(slug)
        .execute(pool)
        .await
        .map(|_| ())
}

#[sqlx::test(migrator = "surf_bot_store::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_users_table_has_five_columns(pool: PgPool) {
    let columns: Vec<String> = sqlx::query_scalar(
        r"
        SELECT column_name::text FROM information_schema.columns
        WHERE table_schema = current_schema() AND table_name = 'users'
        ORDER BY ordinal_position
        ",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        columns,
        vec![
            "phone_number",
            "first_name",
            "created_at",
            "subscription_status",
            "subscription_frequency",
        ]
    );
}

#[sqlx::test(migrator = "surf_bot_store::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_subscription_columns_default(pool: PgPool) {
    insert_dana_and_hilton(&pool).await.unwrap();

    let (status, frequency): (String, String) = sqlx::query_as(
        "SELECT subscription_status, subscription_frequency FROM users WHERE phone_number = $1",
    )
    .bind(DANA_PHONE)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(status, "unsubscribed");
    assert_eq!(frequency, "weekly");
}

#[sqlx::test(migrator = "surf_bot_store::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_timestamps_default_to_now(pool: PgPool) {
    insert_dana_and_hilton(&pool).await.unwrap();

    let unset: i64 = sqlx::query_scalar(
        r"
        SELECT (SELECT count(*) FROM users WHERE created_at IS NULL)
             + (SELECT count(*) FROM beaches WHERE last_updated IS NULL)
        ",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(unset, 0);
}

#[sqlx::test(migrator = "surf_bot_store::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_example_rows_insert(pool: PgPool) {
    insert_dana_and_hilton(&pool).await.unwrap();
    insert_favorite(&pool, DANA_PHONE, HILTON_SLUG).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM favorites")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrator = "surf_bot_store::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_favorite_for_deleted_beach_is_rejected(pool: PgPool) {
    insert_dana_and_hilton(&pool).await.unwrap();
    sqlx::query("DELETE FROM beaches WHERE slug = $1")
        .bind(HILTON_SLUG)
        .execute(&pool)
        .await
        .unwrap();

    let err = insert_favorite(&pool, DANA_PHONE, HILTON_SLUG)
        .await
        .unwrap_err();
    assert!(is_foreign_key_violation(&err), "unexpected error: {err}");
}

#[sqlx::test(migrator = "surf_bot_store::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_favorite_for_unknown_user_is_rejected(pool: PgPool) {
    insert_dana_and_hilton(&pool).await.unwrap();

    let err = insert_favorite(&pool, "0599999999", HILTON_SLUG)
        .await
        .unwrap_err();
    assert!(is_foreign_key_violation(&err), "unexpected error: {err}");
}

#[sqlx::test(migrator = "surf_bot_store::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_favorite_is_rejected(pool: PgPool) {
    insert_dana_and_hilton(&pool).await.unwrap();
    insert_favorite(&pool, DANA_PHONE, HILTON_SLUG).await.unwrap();

    let err = insert_favorite(&pool, DANA_PHONE, HILTON_SLUG)
        .await
        .unwrap_err();
    assert!(matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation()));
}

#[sqlx::test(migrator = "surf_bot_store::MIGRATOR")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_migrations_are_recorded(pool: PgPool) {
    let statuses = surf_bot_store::migrate::status(&pool).await.unwrap();

    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| s.applied));
}
