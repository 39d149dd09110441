//! Integration tests for the Uhsin store and sync layer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p uhsin-integration-tests
//! ```
//!
//! No external services are needed: the remote API and the description
//! service are stood in for by `wiremock` servers, and file caches live in
//! temporary directories.
//!
//! # Test Categories
//!
//! - `store_scenarios` - Cart, checkout, rating, wishlist and admin flows
//! - `remote_sync` - Remote client endpoints, auth and background pulls
//! - `file_cache` - Persistence across store restarts
//! - `descriptions` - Generated descriptions and their fallbacks

use std::sync::Arc;
use std::time::Duration;

use uhsin_core::{Address, Email, Role, User};
use uhsin_store::{MemoryCache, RemoteClient, StateCache, Store};
use url::Url;
use wiremock::MockServer;

/// A regular customer account.
///
/// # Panics
///
/// Never; the address is a valid literal.
#[must_use]
pub fn shopper() -> User {
    User::new(
        Email::parse("meera@example.com").expect("valid email"),
        "Meera",
        Role::User,
    )
}

/// An admin account.
///
/// # Panics
///
/// Never; the address is a valid literal.
#[must_use]
pub fn admin() -> User {
    User::new(
        Email::parse("admin@uhsinstore.com").expect("valid email"),
        "Store Admin",
        Role::Admin,
    )
}

/// A complete delivery address.
#[must_use]
pub fn address() -> Address {
    Address {
        street: "12 MG Road".to_owned(),
        city: "Pune".to_owned(),
        state: "MH".to_owned(),
        zip: "411001".to_owned(),
        ..Address::default()
    }
}

/// The API base URL for a mock server, mirroring the production `/api` prefix.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
#[must_use]
pub fn api_base(server: &MockServer) -> Url {
    Url::parse(&format!("{}/api", server.uri())).expect("mock server URI")
}

/// A store wired to a mock remote API over an in-memory cache.
///
/// # Panics
///
/// Panics if the client or store cannot be built.
#[must_use]
pub fn remote_store(server: &MockServer) -> (Store, RemoteClient, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new());
    let remote = RemoteClient::new(&api_base(server), cache.clone()).expect("remote client");
    let store = Store::open(cache.clone(), Some(remote.clone())).expect("store");
    (store, remote, cache)
}

/// An offline store over an in-memory cache.
///
/// # Panics
///
/// Panics if the store cannot be opened.
#[must_use]
pub fn offline_store() -> (Store, Arc<dyn StateCache>) {
    let cache: Arc<dyn StateCache> = Arc::new(MemoryCache::new());
    let store = Store::open(cache.clone(), None).expect("store");
    (store, cache)
}

/// Wait until the mock server has seen `count` requests, or time out.
///
/// Fire-and-forget writes complete on a spawned task, so tests poll.
pub async fn wait_for_requests(server: &MockServer, count: usize) -> Vec<wiremock::Request> {
    for _ in 0..50 {
        let received = server.received_requests().await.unwrap_or_default();
        if received.len() >= count {
            return received;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    server.received_requests().await.unwrap_or_default()
}
