//! Core types for the surf bot.
//!
//! This module provides type-safe wrappers for the keys and enum-like
//! columns of the `users`, `beaches` and `favorites` tables.

mod macros;

pub mod phone;
pub mod slug;
pub mod status;

pub use phone::{PhoneNumber, PhoneNumberError};
pub use slug::{BeachSlug, BeachSlugError};
pub use status::{ParseStatusError, SubscriptionFrequency, SubscriptionStatus};
