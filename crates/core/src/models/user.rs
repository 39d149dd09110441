//! Users, addresses and profile edits.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, ProductId, Role, UserId};

/// Default country pre-filled on new addresses.
pub const DEFAULT_COUNTRY: &str = "India";

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Address {
    /// Whether every field required for delivery is filled in.
    ///
    /// Country is not checked; it always carries a default.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.street, &self.city, &self.state, &self.zip]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: DEFAULT_COUNTRY.to_owned(),
        }
    }
}

/// Payout bank details kept on the profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub account_holder: String,
    pub account_number: String,
    pub bank_name: String,
    pub ifsc: String,
}

/// A customer or admin account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Product ids; a set, so duplicates are impossible.
    #[serde(default)]
    pub wishlist: BTreeSet<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
}

impl User {
    /// A freshly registered account.
    ///
    /// A blank name falls back to the local part of the email.
    #[must_use]
    pub fn new(email: Email, name: &str, role: Role) -> Self {
        let name = match name.trim() {
            "" => email.local_part().to_owned(),
            n => n.to_owned(),
        };
        Self {
            id: UserId::generate(),
            bank_details: Some(BankDetails {
                account_holder: name.clone(),
                ..BankDetails::default()
            }),
            email,
            name,
            avatar: None,
            role,
            wishlist: BTreeSet::new(),
            joined_at: Some(Utc::now()),
            address: None,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Flip wishlist membership. Returns `true` if the product is now listed.
    pub fn toggle_wishlist(&mut self, product_id: &ProductId) -> bool {
        if self.wishlist.remove(product_id) {
            false
        } else {
            self.wishlist.insert(product_id.clone());
            true
        }
    }
}

/// Profile fields a user can edit about themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: Email,
    pub address: Address,
    pub bank_details: BankDetails,
}

impl ProfileUpdate {
    /// Pre-fill the form from the current profile.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            address: user.address.clone().unwrap_or_default(),
            bank_details: user.bank_details.clone().unwrap_or_default(),
        }
    }

    /// Write the edited fields onto a user record.
    pub fn apply_to(self, user: &mut User) {
        user.name = self.name;
        user.email = self.email;
        user.address = Some(self.address);
        user.bank_details = Some(self.bank_details);
    }
}
