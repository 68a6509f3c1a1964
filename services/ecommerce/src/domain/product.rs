//! 商品实体

use shop_common::{OrderId, ProductId};
use validator::Validate;

/// 商品实体
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub price: f64,
    /// 包含该商品的订单
    pub order_ids: Vec<OrderId>,
}

/// 创建或整体更新商品时提交的字段
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 200, message = "Length must be between 1 and 200."))]
    pub product_name: String,
    #[validate(range(min = 0.0, message = "Must be greater than or equal to 0."))]
    pub price: f64,
}

impl NewProduct {
    pub fn new(product_name: impl Into<String>, price: f64) -> Self {
        Self {
            product_name: product_name.into(),
            price,
        }
    }

    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            product_name: self.product_name,
            price: self.price,
            order_ids: Vec::new(),
        }
    }
}
