//! BoostMe client - typed access to the Wellness Garden API.
//!
//! - [`GardenClient`] - one method per endpoint, cookie-based session
//! - [`GardenSession`] - cached garden snapshot kept in sync with server
//!   responses, one mutation in flight at a time
//! - [`display`] - derived display values for plants and the garden
//!
//! The client never computes level, XP, or Star Seeds itself. Every value it
//! shows comes from the last server response.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
pub mod display;
mod error;
mod session;

pub use client::{DEFAULT_API_URL, GardenClient};
pub use error::{ClientError, Result};
pub use session::{GardenSession, GardenSnapshot};
