//! 仓储接口

use async_trait::async_trait;
use shop_common::{OrderId, ProductId, UserId};
use shop_errors::AppResult;

use super::order::{NewOrder, Order};
use super::product::{NewProduct, Product};
use super::user::{NewUser, User};

/// 用户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 列出所有用户，按 ID 升序
    async fn list_all(&self) -> AppResult<Vec<User>>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// 创建用户，邮箱重复时返回 Conflict
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// 整体覆盖用户字段，用户不存在时返回 `None`
    async fn update(&self, id: UserId, user: NewUser) -> AppResult<Option<User>>;

    /// 删除用户，返回是否删除了记录
    ///
    /// 用户仍有订单时返回 Conflict。
    async fn delete(&self, id: UserId) -> AppResult<bool>;
}

/// 商品仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 列出所有商品，按 ID 升序
    async fn list_all(&self) -> AppResult<Vec<Product>>;

    /// 根据 ID 查找商品
    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 创建商品
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// 整体覆盖商品字段，商品不存在时返回 `None`
    async fn update(&self, id: ProductId, product: NewProduct) -> AppResult<Option<Product>>;

    /// 删除商品及其订单关联，返回是否删除了记录
    async fn delete(&self, id: ProductId) -> AppResult<bool>;
}

/// 订单仓储接口，包含订单与商品的关联维护
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 根据 ID 查找订单
    async fn find_by_id(&self, id: OrderId) -> AppResult<Option<Order>>;

    /// 创建订单，用户不存在时返回 Validation
    async fn create(&self, order: NewOrder) -> AppResult<Order>;

    /// 列出用户的所有订单
    async fn list_by_user(&self, user_id: UserId) -> AppResult<Vec<Order>>;

    /// 列出订单包含的商品
    async fn list_products(&self, order_id: OrderId) -> AppResult<Vec<Product>>;

    /// 订单是否已包含商品
    async fn contains_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool>;

    /// 将商品加入订单，已存在时返回 `false`
    async fn add_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool>;

    /// 将商品移出订单，不存在关联时返回 `false`
    async fn remove_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool>;
}
