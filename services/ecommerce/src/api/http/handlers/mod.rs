//! 路由处理函数

pub mod orders;
pub mod products;
pub mod system;
pub mod users;
