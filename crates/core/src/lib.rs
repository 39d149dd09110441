//! Uhsin Core - Shared domain types for the Uhsin storefront.
//!
//! This crate provides the types used across all Uhsin components:
//! - `store` - Session state container, persisted cache and remote sync
//! - `cli` - Operator tooling over a file-backed cache
//!
//! # Architecture
//!
//! The core crate contains only types and pure domain rules - no I/O, no
//! cache access, no HTTP clients. This keeps it lightweight and allows it to
//! be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, statuses and discounts
//! - [`models`] - Entity records (products, users, orders, admin logs)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
