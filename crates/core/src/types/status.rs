//! Status enums for various entities.
//!
//! The order lifecycle is a small state machine:
//!
//! ```text
//! Processing -> Shipped -> Out for Delivery -> Delivered
//!      |            |              |               |
//!      +------------+--------------+---------------+--> Cancelled
//! ```
//!
//! Customers may only cancel while an order is still `Processing`; admins may
//! cancel from any state. `Cancelled` is absorbing.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseError {
    kind: &'static str,
    value: String,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// A rejected order status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot move order from {from} to {to}")]
pub struct TransitionError {
    /// Current status.
    pub from: OrderStatus,
    /// Requested status.
    pub to: OrderStatus,
}

/// Order fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, happy path first.
    pub const ALL: [Self; 5] = [
        Self::Processing,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Position along the happy path, `None` for `Cancelled`.
    #[must_use]
    pub const fn stage(&self) -> Option<u8> {
        match self {
            Self::Processing => Some(0),
            Self::Shipped => Some(1),
            Self::OutForDelivery => Some(2),
            Self::Delivered => Some(3),
            Self::Cancelled => None,
        }
    }

    /// Status after a customer-initiated cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] unless the order is still `Processing`.
    pub const fn customer_cancel(self) -> Result<Self, TransitionError> {
        match self {
            Self::Processing => Ok(Self::Cancelled),
            from => Err(TransitionError {
                from,
                to: Self::Cancelled,
            }),
        }
    }

    /// Validate an admin-initiated status change.
    ///
    /// Admins may move forward along the happy path or cancel from any
    /// non-cancelled state. Re-selecting the current status is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when leaving `Cancelled` or moving
    /// backwards.
    pub fn admin_transition(self, to: Self) -> Result<Self, TransitionError> {
        if self == to {
            return Ok(to);
        }
        let allowed = match (self.stage(), to.stage()) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(from), Some(next)) => next > from,
        };
        if allowed {
            Ok(to)
        } else {
            Err(TransitionError { from: self, to })
        }
    }

    /// The display label, identical to the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| {
                status
                    .as_str()
                    .chars()
                    .filter(char::is_ascii_alphanumeric)
                    .collect::<String>()
                    .eq_ignore_ascii_case(&normalized)
            })
            .ok_or_else(|| ParseError::new("order status", s))
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// The other role, used by the admin roster toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::User => Self::Admin,
            Self::Admin => Self::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseError::new("role", s)),
        }
    }
}

/// Severity tag on an admin audit log entry.
///
/// `Error` marks destructive actions (e.g. deleting a product), not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogSeverity {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Success => write!(f, "success"),
        }
    }
}
