//! Session state container.
//!
//! [`Store`] is an explicit context object: it owns the signed-in user, the
//! catalog, orders, the user roster, the admin log and the cart. Every
//! mutation updates memory, writes the affected cache entries, then mirrors
//! the change to the remote API without waiting for it.
//!
//! Operations are grouped by area:
//! - [`cart`] - cart lines, coupons and the cart summary
//! - [`catalog`] - browsing, search, ratings, reviews, wishlist and profile
//! - [`orders`] - checkout, cancellation and order history
//! - [`admin`] - catalog CRUD, order status, roster, dashboard and audit log

mod admin;
mod cart;
mod catalog;
mod orders;

pub use admin::DashboardStats;
pub use cart::{AppliedCoupon, CartItem, CartLine, CartSummary};
pub use catalog::{ProductQuery, SortOrder};
pub use orders::{Checkout, OrderFilter};

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};
use uhsin_core::{
    AdminLog, AdminLogId, LogBook, LogSeverity, Order, Product, User, View, initial_products,
};

use crate::cache::{CacheKey, StateCache, StateCacheExt};
use crate::describe::DescriptionClient;
use crate::error::{Result, StoreError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::remote::{RemoteClient, RemoteSnapshot, SyncOp};

/// Seeded products get a random rating count in this range.
const SEED_RATING_COUNTS: std::ops::Range<u32> = 10..110;

/// Session state for one storefront client.
pub struct Store {
    cache: Arc<dyn StateCache>,
    remote: Option<RemoteClient>,
    describer: Option<DescriptionClient>,
    user: Option<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
    users: Vec<User>,
    logs: LogBook,
    cart: Vec<CartItem>,
    coupon: Option<AppliedCoupon>,
    view: View,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("user", &self.user.as_ref().map(|u| &u.id))
            .field("products", &self.products.len())
            .field("orders", &self.orders.len())
            .field("users", &self.users.len())
            .field("logs", &self.logs.len())
            .field("cart", &self.cart.len())
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Load the session from the cache.
    ///
    /// A missing catalog is seeded with the starter products, and a missing
    /// roster is seeded from the stored user. Corrupt entries are treated as
    /// missing. A cached empty catalog stays empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cache`] if the seeded state cannot be written.
    #[instrument(skip_all)]
    pub fn open(cache: Arc<dyn StateCache>, remote: Option<RemoteClient>) -> Result<Self> {
        let user: Option<User> = cache.load(CacheKey::User);
        let orders: Vec<Order> = cache.load(CacheKey::Orders).unwrap_or_default();
        let logs = cache
            .load::<Vec<AdminLog>>(CacheKey::AdminLogs)
            .map(LogBook::from_entries)
            .unwrap_or_default();

        let (products, seeded_products) = match cache.load::<Vec<Product>>(CacheKey::Products) {
            Some(products) => (products, false),
            None => {
                let mut rng = rand::rng();
                (
                    initial_products(|| rng.random_range(SEED_RATING_COUNTS)),
                    true,
                )
            }
        };

        let (users, seeded_users) = match cache.load::<Vec<User>>(CacheKey::Users) {
            Some(users) => (users, false),
            None => (user.iter().cloned().collect(), true),
        };

        let store = Self {
            cache,
            remote,
            describer: None,
            user,
            products,
            orders,
            users,
            logs,
            cart: Vec::new(),
            coupon: None,
            view: View::Home,
        };

        if seeded_products {
            info!(count = store.products.len(), "seeded starter catalog");
            store.write(CacheKey::Products)?;
        }
        if seeded_users {
            store.write(CacheKey::Users)?;
        }
        if let Some(user) = &store.user {
            set_sentry_user(&user.id, Some(user.email.as_str()));
        }

        debug!(store = ?store, "store opened");
        Ok(store)
    }

    /// Attach a description generator for the admin product editor.
    #[must_use]
    pub fn with_describer(mut self, describer: DescriptionClient) -> Self {
        self.describer = Some(describer);
        self
    }

    /// The remote client, if remote sync is enabled.
    #[must_use]
    pub const fn remote(&self) -> Option<&RemoteClient> {
        self.remote.as_ref()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn write(&self, key: CacheKey) -> Result<()> {
        let cache = self.cache.as_ref();
        match key {
            CacheKey::Products => cache.save(key, &self.products)?,
            CacheKey::Orders => cache.save(key, &self.orders)?,
            CacheKey::Users => cache.save(key, &self.users)?,
            CacheKey::AdminLogs => cache.save(key, &self.logs)?,
            CacheKey::User => match &self.user {
                Some(user) => cache.save(key, user)?,
                None => cache.remove(key)?,
            },
            // The token is written by `set_token` and evicted on sign-out
            CacheKey::Token => {}
        }
        Ok(())
    }

    /// Write the given entries, logging failures instead of returning them.
    ///
    /// The in-memory mutation has already happened; a failed write only
    /// means the change will not survive a restart.
    fn persist_keys(&self, keys: &[CacheKey]) {
        for key in keys {
            if let Err(e) = self.write(*key) {
                warn!(key = %key, error = %e, "failed to persist cache entry");
            }
        }
    }

    /// Write every entry to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cache`] on the first failed write.
    pub fn persist(&self) -> Result<()> {
        for key in CacheKey::ALL {
            self.write(key)?;
        }
        Ok(())
    }

    /// Persist and end the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cache`] if the final write fails.
    pub fn close(self) -> Result<()> {
        self.persist()?;
        debug!("store closed");
        Ok(())
    }

    /// Mirror a write to the remote API, if enabled.
    fn sync(&self, op: SyncOp) {
        if let Some(remote) = &self.remote {
            remote.dispatch(op);
        }
    }

    // =========================================================================
    // Remote pull
    // =========================================================================

    /// Pull products and orders from the remote API.
    ///
    /// Returns `true` if local state was replaced. Failures leave local state
    /// untouched.
    pub async fn refresh_from_remote(&mut self) -> bool {
        let Some(remote) = self.remote.clone() else {
            return false;
        };
        match remote.fetch_snapshot().await {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            Err(e) => {
                warn!(error = %e, "remote refresh failed, keeping cached state");
                false
            }
        }
    }

    /// Overwrite products and orders wholesale. No merge is attempted.
    pub fn apply_snapshot(&mut self, snapshot: RemoteSnapshot) {
        info!(
            products = snapshot.products.len(),
            orders = snapshot.orders.len(),
            "applying remote snapshot"
        );
        self.products = snapshot.products;
        self.orders = snapshot.orders;
        self.persist_keys(&[CacheKey::Products, CacheKey::Orders]);
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Make `user` the signed-in user and add them to the roster.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub fn sign_in(&mut self, user: User) {
        set_sentry_user(&user.id, Some(user.email.as_str()));
        add_breadcrumb("session", "signed in", &[("role", &user.role.to_string())]);

        self.upsert_roster(&user);
        self.user = Some(user);
        self.view = View::Home;
        self.persist_keys(&[CacheKey::User, CacheKey::Users]);
        info!("user signed in");
    }

    /// Store the bearer token used for remote calls.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Cache`] if the token cannot be written.
    pub fn set_token(&self, token: &SecretString) -> Result<()> {
        self.cache.set(CacheKey::Token, token.expose_secret())?;
        Ok(())
    }

    /// End the session: clears the user, token, cart and coupon.
    ///
    /// The cart and coupon are reset even when nobody is signed in.
    pub fn sign_out(&mut self) {
        self.cart.clear();
        self.coupon = None;
        self.view = View::Home;

        if self.user.take().is_none() {
            return;
        }
        clear_sentry_user();
        add_breadcrumb("session", "signed out", &[]);

        if let Err(e) = self.cache.remove(CacheKey::Token) {
            warn!(error = %e, "failed to clear session token");
        }
        self.persist_keys(&[CacheKey::User]);
        info!("user signed out");
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// Move to a view, redirecting when the session may not see it.
    ///
    /// Account views need a signed-in user; the admin console needs the
    /// admin role. Returns the view actually shown.
    pub fn navigate(&mut self, view: View) -> View {
        let target = match view {
            View::Orders | View::Profile if self.user.is_none() => View::Auth,
            View::Admin if self.user.is_none() => View::Auth,
            View::Admin if !self.user.as_ref().is_some_and(User::is_admin) => View::Home,
            other => other,
        };
        self.view = target;
        target
    }

    fn require_user(&self) -> Result<&User> {
        self.user.as_ref().ok_or(StoreError::SignInRequired)
    }

    fn require_user_mut(&mut self) -> Result<&mut User> {
        self.user.as_mut().ok_or(StoreError::SignInRequired)
    }

    fn require_admin(&self) -> Result<&User> {
        let user = self.require_user()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(StoreError::Forbidden)
        }
    }

    /// Insert or replace a user in the roster.
    fn upsert_roster(&mut self, user: &User) {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(entry) => *entry = user.clone(),
            None => self.users.push(user.clone()),
        }
    }

    /// Mirror the signed-in user into the roster and persist both.
    fn commit_current_user(&mut self) {
        if let Some(user) = self.user.clone() {
            self.upsert_roster(&user);
            self.persist_keys(&[CacheKey::User, CacheKey::Users]);
            self.sync(SyncOp::UpdateUser(user));
        }
    }

    // =========================================================================
    // Admin log
    // =========================================================================

    /// Append an audit entry attributed to the signed-in user.
    ///
    /// A no-op when nobody is signed in.
    pub fn record_log(
        &mut self,
        action: impl Into<String>,
        target: impl Into<String>,
        severity: LogSeverity,
    ) {
        let Some(actor) = &self.user else {
            return;
        };
        let entry = AdminLog {
            id: AdminLogId::generate(),
            admin_id: actor.id.clone(),
            admin_name: actor.name.clone(),
            action: action.into(),
            target: target.into(),
            timestamp: Utc::now(),
            severity,
        };
        debug!(action = %entry.action, target = %entry.target, "admin log entry");
        self.logs.push(entry.clone());
        self.persist_keys(&[CacheKey::AdminLogs]);
        self.sync(SyncOp::AppendLog(entry));
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use uhsin_core::ProductId;

    use super::testing::*;
    use super::*;
    use crate::cache::MemoryCache;

    #[test]
    fn test_open_seeds_catalog_and_persists_it() {
        let cache = Arc::new(MemoryCache::new());
        let store = Store::open(cache.clone(), None).unwrap();
        assert_eq!(store.products.len(), 5);
        assert!(
            store
                .products
                .iter()
                .all(|p| SEED_RATING_COUNTS.contains(&p.rating_count))
        );
        let cached: Vec<Product> = cache.load(CacheKey::Products).unwrap();
        assert_eq!(cached.len(), 5);
    }

    #[test]
    fn test_reopen_restores_user_and_roster() {
        let cache = Arc::new(MemoryCache::new());
        let mut store = Store::open(cache.clone(), None).unwrap();
        let user = shopper();
        store.sign_in(user.clone());
        drop(store);

        let store = Store::open(cache, None).unwrap();
        assert_eq!(store.user().map(|u| &u.id), Some(&user.id));
        assert_eq!(store.users.len(), 1);
    }

    #[test]
    fn test_sign_out_clears_session() {
        let cache = Arc::new(MemoryCache::new());
        let mut store = Store::open(cache.clone(), None).unwrap();
        store.sign_in(shopper());
        store.set_token(&SecretString::from("jwt")).unwrap();
        let id = store.products[0].id.clone();
        store.add_to_cart(&id).unwrap();

        store.sign_out();
        assert!(store.user().is_none());
        assert!(store.cart().is_empty());
        assert_eq!(cache.get(CacheKey::Token).unwrap(), None);
        assert_eq!(cache.get(CacheKey::User).unwrap(), None);
    }

    #[test]
    fn test_sign_out_without_user_resets_cart() {
        let mut store = offline_store();
        let id = store.products[0].id.clone();
        store.add_to_cart(&id).unwrap();
        store.apply_coupon("SAVE10").unwrap();
        store.navigate(View::Products);

        store.sign_out();
        assert!(store.cart().is_empty());
        assert!(store.cart_summary().coupon.is_none());
        assert_eq!(store.view(), View::Home);
    }

    #[test]
    fn test_deleted_catalog_stays_empty_after_reopen() {
        let cache = Arc::new(MemoryCache::new());
        let mut store = Store::open(cache.clone(), None).unwrap();
        store.sign_in(admin());
        let ids: Vec<ProductId> = store.products.iter().map(|p| p.id.clone()).collect();
        for id in &ids {
            store.delete_product(id).unwrap();
        }
        store.close().unwrap();

        let store = Store::open(cache.clone(), None).unwrap();
        assert!(store.products().is_empty());
        let cached: Vec<Product> = cache.load(CacheKey::Products).unwrap();
        assert!(cached.is_empty());
    }

    #[test]
    fn test_corrupt_catalog_is_reseeded() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(CacheKey::Products, "[{ broken").unwrap();
        let store = Store::open(cache, None).unwrap();
        assert_eq!(store.products().len(), 5);
    }

    #[test]
    fn test_navigation_guards() {
        let mut store = offline_store();
        assert_eq!(store.navigate(View::Orders), View::Auth);
        store.sign_in(shopper());
        assert_eq!(store.navigate(View::Admin), View::Home);
        assert_eq!(store.navigate(View::Orders), View::Orders);
        assert_eq!(store.view(), View::Orders);
    }

    #[test]
    fn test_record_log_requires_user() {
        let mut store = offline_store();
        store.record_log("Updated Product", "Anything", LogSeverity::Info);
        assert!(store.logs.is_empty());

        store.sign_in(admin());
        store.record_log("Updated Product", "Anything", LogSeverity::Info);
        assert_eq!(store.logs.len(), 1);
        assert_eq!(store.logs.latest().unwrap().admin_name, "Store Admin");
    }

    #[test]
    fn test_apply_snapshot_overwrites() {
        let mut store = offline_store();
        store.apply_snapshot(RemoteSnapshot {
            products: Vec::new(),
            orders: Vec::new(),
        });
        assert!(store.products().is_empty());
    }
}
