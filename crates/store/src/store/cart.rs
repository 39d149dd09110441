//! Cart lines and coupons.
//!
//! The cart is an in-memory list of `(product id, quantity)` pairs. It is not
//! persisted and is cleared on checkout and sign-out. Product details are
//! joined in at read time.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uhsin_core::{Discount, Price, Product, ProductId, promo_code};

use super::Store;
use crate::error::{Result, StoreError};

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A cart line joined with its current product record.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// A promo code accepted into the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    /// Canonical upper-case code.
    pub code: String,
    pub discount: Discount,
}

/// Cart totals as shown on the order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub subtotal: Price,
    pub discount: Price,
    /// Subtotal minus discount, never below zero.
    pub total: Price,
    pub coupon: Option<AppliedCoupon>,
}

impl Store {
    /// Add one unit of a product to the cart.
    ///
    /// Returns the line's new quantity. Stock is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProductNotFound`] if the product is not in the
    /// catalog.
    pub fn add_to_cart(&mut self, product_id: &ProductId) -> Result<u32> {
        if self.product(product_id).is_none() {
            return Err(StoreError::ProductNotFound(product_id.clone()));
        }
        let quantity = match self.cart.iter_mut().find(|i| &i.product_id == product_id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                item.quantity
            }
            None => {
                self.cart.push(CartItem {
                    product_id: product_id.clone(),
                    quantity: 1,
                });
                1
            }
        };
        debug!(product_id = %product_id, quantity, "added to cart");
        Ok(quantity)
    }

    /// Remove a product's line entirely. Returns `false` if it was not there.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> bool {
        let before = self.cart.len();
        self.cart.retain(|i| &i.product_id != product_id);
        self.cart.len() != before
    }

    #[must_use]
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    /// Cart lines joined with the current catalog.
    ///
    /// Lines whose product has since been deleted are skipped.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart
            .iter()
            .filter_map(|item| match self.product(&item.product_id) {
                Some(product) => Some(CartLine {
                    product: product.clone(),
                    quantity: item.quantity,
                }),
                None => {
                    warn!(product_id = %item.product_id, "cart line refers to a missing product");
                    None
                }
            })
            .collect()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.cart.iter().map(|i| i.quantity).sum()
    }

    /// Apply a promo code, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidCoupon`] for unknown codes.
    pub fn apply_coupon(&mut self, code: &str) -> Result<AppliedCoupon> {
        let (code, discount) =
            promo_code(code).ok_or_else(|| StoreError::InvalidCoupon(code.trim().to_owned()))?;
        let coupon = AppliedCoupon { code, discount };
        debug!(code = %coupon.code, discount = %coupon.discount, "coupon applied");
        self.coupon = Some(coupon.clone());
        Ok(coupon)
    }

    pub fn remove_coupon(&mut self) {
        self.coupon = None;
    }

    /// Subtotal, coupon discount and total of the current cart.
    #[must_use]
    pub fn cart_summary(&self) -> CartSummary {
        let subtotal: Price = self.cart_lines().iter().map(CartLine::total).sum();
        let discount = self
            .coupon
            .as_ref()
            .map_or(Price::ZERO, |c| c.discount.amount_off(subtotal));
        CartSummary {
            subtotal,
            discount,
            total: subtotal.saturating_sub(discount),
            coupon: self.coupon.clone(),
        }
    }
}
