//! BoostMe Core - Shared types and garden rules.
//!
//! This crate is used by every BoostMe component:
//! - `server` - Auth and Wellness Garden REST service
//! - `client` - Typed garden client with a cached snapshot
//! - `cli` - Migrations, catalog seeding, and user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients, and no clock reads. Every rule that depends on time
//! takes `now` as an argument so it can be tested deterministically.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, email, and catalog enums
//! - [`garden`] - Garden entities and the progression rules (planting,
//!   watering, harvesting, rewards, leveling, challenges, achievements, themes)
//! - [`format`] - Display helpers (relative time, compact XP, emoji)
//! - [`api`] - HTTP request and response bodies shared by server and client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod format;
pub mod garden;
pub mod types;

pub use types::*;
