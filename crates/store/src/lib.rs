//! Surf Bot Store - Schema and data access for the surf bot database.
//!
//! # Database: `surf_bot_db`
//!
//! ## Tables
//!
//! - `users` - Subscribers keyed by phone number
//! - `beaches` - Surf spots keyed by slug
//! - `favorites` - Which beaches each user follows
//!
//! # Migrations
//!
//! Migrations live in `crates/store/migrations/`, are embedded into the
//! binary via [`MIGRATOR`], and are applied in version order with:
//! ```bash
//! cargo run -p surf-bot-cli -- migrate run
//! ```
//! Migrations are forward-only; no down scripts exist.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod db;
pub mod migrate;
pub mod models;

pub use db::{
    BeachRepository, FavoriteRepository, RepositoryError, UserRepository, create_pool,
    create_pool_with,
};
pub use migrate::{MIGRATOR, MigrationStatus};
pub use models::{Beach, Favorite, NewBeach, User};
