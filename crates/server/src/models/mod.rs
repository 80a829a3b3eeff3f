//! Domain models for the server.
//!
//! - `user` - Account records as loaded from the database
//! - `session` - Identity stored in the session cookie
//! - `catalog` - Catalog seed files for the CLI

pub mod catalog;
pub mod session;
pub mod user;

pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
