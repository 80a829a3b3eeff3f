//! Integration tests for the BoostMe API.
//!
//! # Running Tests
//!
//! ```bash
//! # Database, migrations, and catalog
//! boostme migrate
//! boostme seed catalog seeds/catalog.yaml
//!
//! # Server
//! cargo run -p boostme-server
//!
//! # Tests (ignored by default)
//! cargo test -p boostme-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `BOOSTME_API_URL` - Server under test (default: `http://localhost:3000`)
//!
//! Every test registers its own user, so tests can run in parallel and
//! against a shared database.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use boostme_client::{DEFAULT_API_URL, GardenClient};
use boostme_core::garden::PlantType;
use reqwest::Client;
use uuid::Uuid;

/// Password used for every test user.
pub const TEST_PASSWORD: &str = "garden-test-pass";

/// Base URL of the server under test, without a trailing slash.
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("BOOSTME_API_URL")
        .unwrap_or_else(|_| DEFAULT_API_URL.to_owned())
        .trim_end_matches('/')
        .to_owned()
}

/// A fresh email address nobody has registered yet.
#[must_use]
pub fn unique_email() -> String {
    format!("garden-{}@example.com", Uuid::new_v4().simple())
}

/// Raw HTTP client with a cookie store.
#[must_use]
pub fn http_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Typed client logged in as a newly registered user.
pub async fn registered_client() -> (GardenClient, String) {
    let client = GardenClient::new(url::Url::parse(&api_base_url()).unwrap()).unwrap();
    let email = unique_email();
    client
        .register("ผู้ทดสอบ", &email, TEST_PASSWORD)
        .await
        .expect("Failed to register test user");
    (client, email)
}

/// Cheapest plant type a level-1 garden can plant.
pub async fn starter_plant_type(client: &GardenClient) -> PlantType {
    client
        .plant_types()
        .await
        .unwrap()
        .into_iter()
        .filter(|t| t.unlock_level <= 1)
        .min_by_key(PlantType::planting_cost)
        .expect("Catalog has no level-1 plant type; run `boostme seed catalog`")
}
