//! 领域层：实体、写入模型、仓储接口

pub mod order;
pub mod product;
pub mod repository;
pub mod user;

pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product};
pub use repository::{OrderRepository, ProductRepository, UserRepository};
pub use user::{NewUser, User};
