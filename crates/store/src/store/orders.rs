//! Checkout, cancellation and order history.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};
use uhsin_core::{Address, LogSeverity, Order, OrderId, OrderLine, OrderStatus, View};

use super::Store;
use crate::cache::CacheKey;
use crate::error::{Result, StoreError, add_breadcrumb};
use crate::remote::SyncOp;

/// Outcome of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub order: Order,
    /// Whether the remote API accepted the order. The order is kept locally
    /// either way.
    pub synced: bool,
}

/// Filters for the order history view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Earliest order date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest order date, inclusive through the end of that day.
    pub to: Option<NaiveDate>,
}

impl OrderFilter {
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        let day = order.date.date_naive();
        self.status.is_none_or(|s| order.status == s)
            && self.from.is_none_or(|from| day >= from)
            && self.to.is_none_or(|to| day <= to)
    }
}

impl Store {
    /// Turn the cart into an order.
    ///
    /// Each line snapshots the product's current name and price. The order is
    /// committed locally first; the remote create is awaited only to report
    /// [`Checkout::synced`]. On success the cart and coupon are cleared and
    /// the view moves to order history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SignInRequired`], [`StoreError::EmptyCart`],
    /// [`StoreError::IncompleteAddress`], or [`StoreError::ProductNotFound`]
    /// if a cart line refers to a deleted product.
    #[instrument(skip(self, shipping_address))]
    pub async fn checkout(
        &mut self,
        payment_method: &str,
        shipping_address: Address,
    ) -> Result<Checkout> {
        let user_id = self.require_user()?.id.clone();
        if self.cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }
        if !shipping_address.is_complete() {
            return Err(StoreError::IncompleteAddress);
        }

        let items = self
            .cart
            .iter()
            .map(|item| {
                self.product(&item.product_id)
                    .map(|product| OrderLine::snapshot(product, item.quantity))
                    .ok_or_else(|| StoreError::ProductNotFound(item.product_id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let order = Order::place(user_id, items, payment_method, shipping_address);
        self.orders.insert(0, order.clone());
        self.cart.clear();
        self.coupon = None;
        self.view = View::Orders;
        self.persist_keys(&[CacheKey::Orders]);

        add_breadcrumb("checkout", "order placed", &[
            ("order_id", order.id.as_str()),
            ("total", &order.total.to_string()),
        ]);
        info!(order_id = %order.id, total = %order.total, lines = order.items.len(), "order placed");

        let synced = match &self.remote {
            Some(remote) => match remote.apply(SyncOp::CreateOrder(order.clone())).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(order_id = %order.id, error = %e, "order saved locally only");
                    false
                }
            },
            None => false,
        };

        Ok(Checkout { order, synced })
    }

    /// Cancel one of the signed-in user's orders.
    ///
    /// Only orders still in `Processing` can be cancelled by their owner.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SignInRequired`], [`StoreError::OrderNotFound`]
    /// for unknown orders or orders owned by someone else, or
    /// [`StoreError::Transition`] once the order has shipped.
    pub fn cancel_order(&mut self, id: &OrderId) -> Result<&Order> {
        let user_id = self.require_user()?.id.clone();
        let order = self
            .orders
            .iter_mut()
            .find(|o| &o.id == id && o.user_id == user_id)
            .ok_or_else(|| StoreError::OrderNotFound(id.clone()))?;
        order.status = order.status.customer_cancel()?;
        let snapshot = order.clone();

        info!(order_id = %id, "order cancelled by customer");
        self.persist_keys(&[CacheKey::Orders]);
        self.record_log("Cancelled Order", id.as_str(), LogSeverity::Warning);
        self.sync(SyncOp::UpdateOrder(snapshot));
        self.order(id)
    }

    fn order(&self, id: &OrderId) -> Result<&Order> {
        self.orders
            .iter()
            .find(|o| &o.id == id)
            .ok_or_else(|| StoreError::OrderNotFound(id.clone()))
    }

    /// The signed-in user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SignInRequired`] when signed out.
    pub fn my_orders(&self, filter: &OrderFilter) -> Result<Vec<&Order>> {
        let user = self.require_user()?;
        let mut orders: Vec<&Order> = self
            .orders
            .iter()
            .filter(|o| o.user_id == user.id && filter.matches(o))
            .collect();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use uhsin_core::{Price, ProductId, TransitionError};

    use super::super::testing::{offline_store, shopper, signed_in};
    use super::*;

    fn address() -> Address {
        Address {
            street: "12 MG Road".to_owned(),
            city: "Pune".to_owned(),
            state: "MH".to_owned(),
            zip: "411001".to_owned(),
            ..Address::default()
        }
    }

    fn priced_store() -> Store {
        let mut store = signed_in(shopper());
        store.products[0].price = Price::new(dec!(10));
        store.products[1].price = Price::new(dec!(25));
        store
    }

    #[tokio::test]
    async fn test_checkout_scenario_total() {
        let mut store = priced_store();
        let a = ProductId::new("1");
        let b = ProductId::new("2");
        store.add_to_cart(&a).unwrap();
        store.add_to_cart(&a).unwrap();
        store.add_to_cart(&b).unwrap();

        let checkout = store.checkout("Credit Card", address()).await.unwrap();
        assert_eq!(checkout.order.total, Price::new(dec!(45.00)));
        assert_eq!(checkout.order.status, OrderStatus::Processing);
        assert!(!checkout.synced);
        assert!(store.cart().is_empty());
        assert_eq!(store.view(), View::Orders);

        store.products[0].price = Price::new(dec!(99));
        let orders = store.my_orders(&OrderFilter::default()).unwrap();
        assert_eq!(orders[0].items[0].price_at_purchase, Price::new(dec!(10)));
    }

    #[tokio::test]
    async fn test_checkout_validation() {
        let mut store = offline_store();
        let err = store.checkout("Paytm", address()).await.unwrap_err();
        assert!(matches!(err, StoreError::SignInRequired));

        store.sign_in(shopper());
        let err = store.checkout("Paytm", address()).await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyCart));

        store.add_to_cart(&ProductId::new("1")).unwrap();
        let err = store.checkout("Paytm", Address::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::IncompleteAddress));
        assert_eq!(store.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_rejects_deleted_product() {
        let mut store = signed_in(shopper());
        store.add_to_cart(&ProductId::new("1")).unwrap();
        store.products.retain(|p| p.id.as_str() != "1");
        let err = store.checkout("Paytm", address()).await.unwrap_err();
        assert!(matches!(err, StoreError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_cancel_only_while_processing() {
        let mut store = priced_store();
        store.add_to_cart(&ProductId::new("1")).unwrap();
        let order = store.checkout("Paytm", address()).await.unwrap().order;

        let cancelled = store.cancel_order(&order.id).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        let log = store.logs.latest().unwrap();
        assert_eq!(log.action, "Cancelled Order");
        assert_eq!(log.severity, LogSeverity::Warning);

        let err = store.cancel_order(&order.id).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Transition(TransitionError {
                from: OrderStatus::Cancelled,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_cancel_other_users_order_is_not_found() {
        let mut store = priced_store();
        store.add_to_cart(&ProductId::new("1")).unwrap();
        let order = store.checkout("Paytm", address()).await.unwrap().order;
        store.orders[0].user_id = uhsin_core::UserId::new("someone-else");
        let err = store.cancel_order(&order.id).unwrap_err();
        assert!(matches!(err, StoreError::OrderNotFound(_)));
    }

    #[tokio::test]
    async fn test_my_orders_date_filter_includes_end_day() {
        let mut store = priced_store();
        store.add_to_cart(&ProductId::new("1")).unwrap();
        store.checkout("Paytm", address()).await.unwrap();
        store.add_to_cart(&ProductId::new("2")).unwrap();
        store.checkout("Paytm", address()).await.unwrap();
        store.orders[1].date = Utc::now() - Duration::days(10);

        let today = Utc::now().date_naive();
        let filter = OrderFilter {
            to: Some(today),
            from: Some(today),
            ..OrderFilter::default()
        };
        assert_eq!(store.my_orders(&filter).unwrap().len(), 1);

        let filter = OrderFilter {
            status: Some(OrderStatus::Shipped),
            ..OrderFilter::default()
        };
        assert!(store.my_orders(&filter).unwrap().is_empty());
    }
}
