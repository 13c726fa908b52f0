//! Surf Bot Core - Shared types library.
//!
//! This crate provides the domain types shared by the surf bot components:
//! - `store` - Schema migrations and repositories for the surf bot database
//! - `provision` - Host bootstrap that launches the database container
//! - `cli` - Command-line tools for bootstrap, migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no process spawning. Database encoding is available behind the
//! `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Validated phone numbers, beach slugs and subscription enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
