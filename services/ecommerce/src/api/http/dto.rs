//! 响应体定义

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shop_common::{OrderId, ProductId, UserId};

use crate::domain::{Order, Product, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub address: String,
    pub email: String,
    pub orders: Vec<OrderId>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            address: user.address,
            email: user.email,
            orders: user.order_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub product_name: String,
    pub price: f64,
    pub orders: Vec<OrderId>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            product_name: product.product_name,
            price: product.price,
            orders: product.order_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: OrderId,
    /// `YYYY-MM-DDTHH:MM:SS`，不带时区
    pub order_date: NaiveDateTime,
    pub user_id: UserId,
    pub products: Vec<ProductId>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_date: order.order_date,
            user_id: order.user_id,
            products: order.product_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 批量转换
pub fn collect<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}
