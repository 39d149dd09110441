//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are opaque
//! strings: the remote API and the persisted cache both store them as JSON
//! strings, and locally generated IDs are short random base-36 tokens.

use rand::Rng;

/// Alphabet used for locally generated IDs.
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a locally generated ID token.
pub const TOKEN_LENGTH: usize = 9;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `generate()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use uhsin_core::define_id;
/// define_id!(CouponId);
/// define_id!(BasketId);
///
/// let coupon = CouponId::new("c1");
/// let basket = BasketId::new("c1");
///
/// // These are different types, so this won't compile:
/// // let _: CouponId = basket;
/// # let _ = (coupon, basket);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an ID from an existing value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::random_token($crate::types::id::TOKEN_LENGTH))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(ReviewId);
define_id!(AdminLogId);

// Order IDs carry an `ORD-` prefix and an upper-case token
define_id!(OrderId);

impl OrderId {
    /// Generate a fresh order ID such as `ORD-K3J9X0QZ1`.
    #[must_use]
    pub fn generate_order() -> Self {
        Self(format!("ORD-{}", random_token(TOKEN_LENGTH).to_uppercase()))
    }
}

/// Generate a random lower-case base-36 token of the given length.
///
/// Tokens are not guaranteed to be globally unique.
#[must_use]
pub fn random_token(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| {
            let idx = rng.random_range(0..BASE36.len());
            char::from(BASE36.get(idx).copied().unwrap_or(b'0'))
        })
        .collect()
}

/// Generate a shipment tracking number such as `TRK482910337`.
#[must_use]
pub fn tracking_number() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000_000);
    format!("TRK{n}")
}
