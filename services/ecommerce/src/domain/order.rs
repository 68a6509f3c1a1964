//! 订单实体

use chrono::NaiveDateTime;
use shop_common::{OrderId, ProductId, UserId};
use validator::Validate;

/// 订单实体
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub order_date: NaiveDateTime,
    pub user_id: UserId,
    /// 订单包含的商品
    pub product_ids: Vec<ProductId>,
}

impl Order {
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.product_ids.contains(&product_id)
    }
}

/// 创建订单时提交的字段
///
/// 用户是否存在由外键约束保证。
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewOrder {
    pub user_id: UserId,
    pub order_date: NaiveDateTime,
}

impl NewOrder {
    pub fn new(user_id: UserId, order_date: NaiveDateTime) -> Self {
        Self {
            user_id,
            order_date,
        }
    }

    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            order_date: self.order_date,
            user_id: self.user_id,
            product_ids: Vec::new(),
        }
    }
}
