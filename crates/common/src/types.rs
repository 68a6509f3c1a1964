//! 通用类型定义
//!
//! 所有实体都使用数据库分配的自增整数作为代理主键，
//! 这里为每种实体包一层 newtype，避免把订单 ID 当成用户 ID 传递。

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
        )]
        #[serde(transparent)]
        #[display("{_0}")]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }
    };
}

surrogate_id!(
    /// 用户 ID
    UserId
);

surrogate_id!(
    /// 商品 ID
    ProductId
);

surrogate_id!(
    /// 订单 ID
    OrderId
);
