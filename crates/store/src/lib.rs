//! Uhsin Store - local-first session state with best-effort remote sync.
//!
//! # Architecture
//!
//! ```text
//! caller ──> Store ──> StateCache (durable, authoritative)
//!              │
//!              └────> RemoteClient (fire-and-forget writes)
//!
//! BackgroundSync ──> RemoteClient::fetch_snapshot ──> Store::apply_snapshot
//! ```
//!
//! - [`Store`] holds the session: signed-in user, catalog, orders, roster,
//!   admin log and cart. Every mutation is persisted to the cache first.
//! - [`RemoteClient`] talks to the REST API. Write failures are logged and
//!   never roll back local state.
//! - [`BackgroundSync`] periodically pulls products and orders and overwrites
//!   the local copies (last successful read wins).
//! - [`DescriptionClient`] asks a generative model for product copy, with
//!   static fallbacks.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod describe;
pub mod error;
pub mod remote;
pub mod store;
pub mod sync;

pub use cache::{CacheError, CacheKey, FileCache, MemoryCache, StateCache, StateCacheExt};
pub use config::{ConfigError, DescriptionConfig, StoreConfig};
pub use describe::{DescribeError, DescriptionClient};
pub use error::{Result, StoreError};
pub use remote::{RemoteClient, RemoteError, RemoteSnapshot, SyncOp};
pub use store::{
    AppliedCoupon, CartItem, CartLine, CartSummary, Checkout, DashboardStats, OrderFilter,
    ProductQuery, SortOrder, Store,
};
pub use sync::{BackgroundSync, SharedStore};
