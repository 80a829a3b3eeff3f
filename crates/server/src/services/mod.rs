//! Business logic services.
//!
//! - `auth` - Email and password accounts
//! - `catalog` - Cached read-only catalog (plant types, achievements, challenges)
//! - `garden` - Garden actions applied transactionally over the core rules

pub mod auth;
pub mod catalog;
pub mod garden;
