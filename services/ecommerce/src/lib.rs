//! 电商记录服务：用户、商品、订单及订单商品关联

pub mod api;
pub mod domain;
pub mod infrastructure;
