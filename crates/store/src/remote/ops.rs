//! Outbound writes mirrored to the remote API.

use uhsin_core::{AdminLog, Order, Product, ProductId, User};

/// One write to mirror remotely.
#[derive(Debug, Clone)]
pub enum SyncOp {
    CreateOrder(Order),
    UpdateOrder(Order),
    CreateProduct(Product),
    UpdateProduct(Product),
    DeleteProduct(ProductId),
    AppendLog(AdminLog),
    UpdateUser(User),
}

impl SyncOp {
    /// Short name for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreateOrder(_) => "create_order",
            Self::UpdateOrder(_) => "update_order",
            Self::CreateProduct(_) => "create_product",
            Self::UpdateProduct(_) => "update_product",
            Self::DeleteProduct(_) => "delete_product",
            Self::AppendLog(_) => "append_log",
            Self::UpdateUser(_) => "update_user",
        }
    }

    /// Request path relative to the API base.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::CreateOrder(_) => "/orders".to_string(),
            Self::UpdateOrder(order) => format!("/orders/{}", order.id),
            Self::CreateProduct(_) => "/products".to_string(),
            Self::UpdateProduct(product) => format!("/products/{}", product.id),
            Self::DeleteProduct(id) => format!("/products/{id}"),
            Self::AppendLog(_) => "/logs".to_string(),
            Self::UpdateUser(user) => format!("/users/{}", user.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use uhsin_core::{Address, UserId};

    use super::*;

    #[test]
    fn test_paths() {
        let order = Order::place(UserId::new("u1"), Vec::new(), "Paytm", Address::default());
        let id = order.id.clone();
        assert_eq!(SyncOp::CreateOrder(order.clone()).path(), "/orders");
        assert_eq!(SyncOp::UpdateOrder(order).path(), format!("/orders/{id}"));
        assert_eq!(
            SyncOp::DeleteProduct(ProductId::new("7")).path(),
            "/products/7"
        );
    }
}
