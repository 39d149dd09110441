//! Orders and their frozen line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, Price, ProductId, UserId, tracking_number};

use super::product::Product;
use super::user::Address;

/// One purchased line, snapshotted at checkout.
///
/// Name and price are copies; later catalog edits do not reach them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price_at_purchase: Price,
}

impl OrderLine {
    /// Snapshot a product at the given quantity.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity,
            price_at_purchase: product.price,
        }
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.price_at_purchase.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub total: Price,
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    pub tracking_number: String,
    pub payment_method: String,
    pub shipping_address: Address,
}

impl Order {
    /// Place a new order in `Processing`.
    ///
    /// The total is the sum of the line totals; no tax or shipping.
    #[must_use]
    pub fn place(
        user_id: UserId,
        items: Vec<OrderLine>,
        payment_method: impl Into<String>,
        shipping_address: Address,
    ) -> Self {
        let total = items.iter().map(OrderLine::total).sum();
        Self {
            id: OrderId::generate_order(),
            user_id,
            items,
            total,
            status: OrderStatus::Processing,
            date: Utc::now(),
            tracking_number: tracking_number(),
            payment_method: payment_method.into(),
            shipping_address,
        }
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::types::Category;

    fn product(id: &str, price: Price) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price,
            description: String::new(),
            image: String::new(),
            category: Category::Input,
            rating: 4.5,
            rating_count: 3,
            stock: 5,
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_place_sums_line_totals() {
        let a = product("a", Price::new(dec!(10)));
        let b = product("b", Price::new(dec!(25)));
        let order = Order::place(
            UserId::new("u1"),
            vec![OrderLine::snapshot(&a, 2), OrderLine::snapshot(&b, 1)],
            "Credit Card",
            Address::default(),
        );
        assert_eq!(order.total, Price::new(dec!(45)));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.unit_count(), 3);
        assert!(order.id.as_str().starts_with("ORD-"));
        assert!(order.tracking_number.starts_with("TRK"));
    }

    #[test]
    fn test_snapshot_is_frozen() {
        let mut a = product("a", Price::new(dec!(10)));
        let line = OrderLine::snapshot(&a, 1);
        a.price = Price::new(dec!(99));
        a.name = "Renamed".to_owned();
        assert_eq!(line.price_at_purchase, Price::new(dec!(10)));
        assert_eq!(line.name, "Product a");
    }

    #[test]
    fn test_wire_field_names() {
        let order = Order::place(
            UserId::new("u1"),
            Vec::new(),
            "Paytm",
            Address::default(),
        );
        let value = serde_json::to_value(&order).unwrap();
        assert!(value.get("trackingNumber").is_some());
        assert!(value.get("shippingAddress").is_some());
        assert_eq!(value.get("status").unwrap(), "Processing");
    }
}
