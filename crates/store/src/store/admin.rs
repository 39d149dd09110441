//! Admin console operations.
//!
//! Every operation here requires the admin role. Successful mutations append
//! an audit entry: catalog creates and updates are `success`, deletes are
//! `error` (destructive, not failed), order and user edits are `info`.

use tracing::{info, instrument};
use uhsin_core::{
    AdminLog, Category, LogSeverity, Order, OrderId, OrderStatus, Price, Product, ProductDraft,
    ProductId, User, UserId,
};

use super::Store;
use crate::cache::CacheKey;
use crate::describe::ERROR_FALLBACK;
use crate::error::{Result, StoreError};
use crate::remote::SyncOp;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    /// Sum of totals across orders that were not cancelled.
    pub revenue: Price,
    pub order_count: usize,
    pub product_count: usize,
    pub user_count: usize,
    /// Products below the low-stock threshold.
    pub low_stock_count: usize,
}

impl Store {
    /// Create or update a product from a draft.
    ///
    /// A draft whose id matches a catalog entry replaces it in place; anything
    /// else is prepended as a new product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`], or
    /// [`StoreError::Draft`] if required fields are missing.
    #[instrument(skip_all)]
    pub fn save_product(&mut self, draft: ProductDraft) -> Result<Product> {
        self.require_admin()?;
        let product = draft.build()?;

        let (action, op) = match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product.clone();
                ("Updated Product", SyncOp::UpdateProduct(product.clone()))
            }
            None => {
                self.products.insert(0, product.clone());
                ("Created Product", SyncOp::CreateProduct(product.clone()))
            }
        };

        info!(product_id = %product.id, action, "product saved");
        self.persist_keys(&[CacheKey::Products]);
        self.record_log(action, product.name.clone(), LogSeverity::Success);
        self.sync(op);
        Ok(product)
    }

    /// Remove a product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`], or
    /// [`StoreError::ProductNotFound`] without logging anything.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<Product> {
        self.require_admin()?;
        let index = self
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| StoreError::ProductNotFound(id.clone()))?;
        let removed = self.products.remove(index);

        info!(product_id = %id, "product deleted");
        self.persist_keys(&[CacheKey::Products]);
        self.record_log("Deleted Product", removed.name.clone(), LogSeverity::Error);
        self.sync(SyncOp::DeleteProduct(id.clone()));
        Ok(removed)
    }

    /// Move an order to a new status.
    ///
    /// Setting the current status again changes nothing and logs nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`],
    /// [`StoreError::OrderNotFound`], or [`StoreError::Transition`] when
    /// moving backwards or out of `Cancelled`.
    pub fn set_order_status(&mut self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        self.require_admin()?;
        let order = self
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| StoreError::OrderNotFound(id.clone()))?;
        if order.status == status {
            return Ok(order.clone());
        }
        order.status = order.status.admin_transition(status)?;
        let snapshot = order.clone();

        info!(order_id = %id, status = %status, "order status updated");
        self.persist_keys(&[CacheKey::Orders]);
        self.record_log("Updated Order", id.as_str(), LogSeverity::Info);
        self.sync(SyncOp::UpdateOrder(snapshot.clone()));
        Ok(snapshot)
    }

    /// Replace a roster entry.
    ///
    /// Editing the signed-in admin's own entry also updates the current user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`], or
    /// [`StoreError::UserNotFound`].
    pub fn update_user(&mut self, user: User) -> Result<User> {
        self.require_admin()?;
        let entry = self
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| StoreError::UserNotFound(user.id.clone()))?;
        *entry = user.clone();

        let is_self = self.user.as_ref().is_some_and(|u| u.id == user.id);
        let target = user.name.clone();
        info!(user_id = %user.id, role = %user.role, "user updated");
        // Logged before the current user changes so the entry names the acting admin
        self.record_log("Updated User", target, LogSeverity::Info);
        if is_self {
            self.user = Some(user.clone());
            self.persist_keys(&[CacheKey::User]);
        }
        self.persist_keys(&[CacheKey::Users]);
        self.sync(SyncOp::UpdateUser(user.clone()));
        Ok(user)
    }

    /// Flip a roster entry between `user` and `admin`.
    ///
    /// # Errors
    ///
    /// See [`update_user`](Self::update_user).
    pub fn toggle_user_role(&mut self, id: &UserId) -> Result<User> {
        self.require_admin()?;
        let mut user = self
            .users
            .iter()
            .find(|u| &u.id == id)
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))?;
        user.role = user.role.toggled();
        self.update_user(user)
    }

    /// Dashboard headline numbers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`].
    pub fn dashboard(&self) -> Result<DashboardStats> {
        self.require_admin()?;
        Ok(DashboardStats {
            revenue: self
                .orders
                .iter()
                .filter(|o| o.status != OrderStatus::Cancelled)
                .map(|o| o.total)
                .sum(),
            order_count: self.orders.len(),
            product_count: self.products.len(),
            user_count: self.users.len(),
            low_stock_count: self.products.iter().filter(|p| p.is_low_stock()).count(),
        })
    }

    /// Audit log, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`].
    pub fn admin_logs(&self) -> Result<&[AdminLog]> {
        self.require_admin()?;
        Ok(self.logs.entries())
    }

    /// The user roster.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`].
    pub fn users(&self) -> Result<&[User]> {
        self.require_admin()?;
        Ok(&self.users)
    }

    /// Every order across all users.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`].
    pub fn orders(&self) -> Result<&[Order]> {
        self.require_admin()?;
        Ok(&self.orders)
    }

    /// Marketing copy for the product editor.
    ///
    /// Falls back to a fixed sentence when no generator is configured.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] / [`StoreError::SignInRequired`].
    pub async fn generate_description(&self, name: &str, category: Category) -> Result<String> {
        self.require_admin()?;
        Ok(match &self.describer {
            Some(describer) => describer.describe(name, category).await,
            None => ERROR_FALLBACK.to_owned(),
        })
    }
}
