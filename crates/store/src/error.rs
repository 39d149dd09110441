//! Unified error handling with Sentry breadcrumbs.
//!
//! Store operations return `Result<T, StoreError>`. Remote failures never
//! appear here: writes are fire-and-forget and are only logged.

use thiserror::Error;
use uhsin_core::{DraftError, OrderId, ProductId, ReviewError, TransitionError, UserId, View};

use crate::cache::CacheError;

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation needs a signed-in user.
    #[error("sign in required")]
    SignInRequired,

    /// The signed-in user lacks the admin role.
    #[error("admin role required")]
    Forbidden,

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("cart is empty")]
    EmptyCart,

    /// Street, city, state and zip are all required for delivery.
    #[error("shipping address is incomplete")]
    IncompleteAddress,

    #[error("invalid coupon code: {0}")]
    InvalidCoupon(String),

    #[error("invalid product: {0}")]
    Draft(#[from] DraftError),

    #[error("invalid review: {0}")]
    Review(#[from] ReviewError),

    #[error("invalid order status change: {0}")]
    Transition(#[from] TransitionError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl StoreError {
    /// Where the caller should navigate in response, if anywhere.
    #[must_use]
    pub const fn redirect(&self) -> Option<View> {
        match self {
            Self::SignInRequired => Some(View::Auth),
            Self::Forbidden => Some(View::Home),
            _ => None,
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Set the Sentry user context.
///
/// Call this after sign-in to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on sign-out.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a session action.
///
/// Breadcrumbs appear in Sentry reports to show the trail of actions leading
/// up to an error. A no-op when Sentry is not initialised.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };
    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String((*value).to_string()));
    }
    sentry::add_breadcrumb(breadcrumb);
}
