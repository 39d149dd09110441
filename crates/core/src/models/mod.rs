//! Entity records shared by the store, the cache and the remote API.
//!
//! All records serialize with camelCase field names, matching the remote API
//! and the persisted cache snapshots.

pub mod admin_log;
pub mod catalog;
pub mod order;
pub mod product;
pub mod user;

pub use admin_log::{AdminLog, LogBook};
pub use catalog::initial_products;
pub use order::{Order, OrderLine};
pub use product::{
    DraftError, Product, ProductDraft, Review, ReviewDraft, ReviewError, validate_rating,
};
pub use user::{Address, BankDetails, ProfileUpdate, User};
