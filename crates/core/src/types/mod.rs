//! Core types for the Uhsin storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod discount;
pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod view;

pub use category::Category;
pub use discount::{Discount, PROMO_CODES, PromoValue, promo_code};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;
pub use view::View;
