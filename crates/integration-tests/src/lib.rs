//! Integration tests for the surf bot.
//!
//! # Running Tests
//!
//! ```bash
//! # Database tests: sqlx creates a throwaway database per test
//! DATABASE_URL=postgres://surf_bot_user:<password>@127.0.0.1/surf_bot_db \
//!     cargo test -p surf-bot-integration-tests -- --ignored schema repositories
//!
//! # Host bootstrap (root, Docker and gcloud required; replaces surf-postgres)
//! cargo test -p surf-bot-integration-tests --test bootstrap_host -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `schema` - Migrations, column defaults and referential integrity
//! - `repositories` - Repository behavior against a migrated database
//! - `bootstrap_host` - The full bootstrap on a real machine
//!
//! This crate holds shared fixtures for those tests.

use sqlx::PgPool;
use surf_bot_core::{BeachSlug, PhoneNumber};

/// Phone number of the example user.
pub const DANA_PHONE: &str = "0500000000";
/// Slug of the example beach.
pub const HILTON_SLUG: &str = "hilton";

/// Parse a phone number fixture.
///
/// # Panics
///
/// Panics if `s` is not a valid phone number.
#[must_use]
pub fn phone(s: &str) -> PhoneNumber {
    PhoneNumber::parse(s).expect("invalid phone fixture")
}

/// Parse a beach slug fixture.
///
/// # Panics
///
/// Panics if `s` is not a valid slug.
#[must_use]
pub fn slug(s: &str) -> BeachSlug {
    BeachSlug::parse(s).expect("invalid slug fixture")
}

/// Insert user `('0500000000', 'Dana')` and beach `('hilton', 'Hilton Beach')`
/// with raw SQL, bypassing the repositories.
///
/// # Errors
///
/// Returns `sqlx::Error` if either insert fails.
pub async fn insert_dana_and_hilton(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (phone_number, first_name) VALUES ($1, $2)")
        .bind(DANA_PHONE)
        .bind("Dana")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO beaches (slug, name) VALUES ($1, $2)")
        .bind(HILTON_SLUG)
        .bind("Hilton Beach")
        .execute(pool)
        .await?;
    Ok(())
}
