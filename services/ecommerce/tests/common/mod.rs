//! 测试用内存存储
//!
//! 与 PostgreSQL 实现保持相同的约束：邮箱唯一、订单必须属于已存在的用户、
//! 有订单的用户不能删除、删除商品时一并删除订单关联。

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use ecommerce::api::http::{AppState, ReadinessProbe, router};
use ecommerce::domain::{
    NewOrder, NewProduct, NewUser, Order, OrderRepository, Product, ProductRepository, User,
    UserRepository,
};
use shop_common::{OrderId, ProductId, UserId};
use shop_config::ServerConfig;
use shop_errors::{AppError, AppResult};

const USERS: usize = 0;
const PRODUCTS: usize = 1;
const ORDERS: usize = 2;

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, NewUser>,
    products: BTreeMap<ProductId, NewProduct>,
    orders: BTreeMap<OrderId, NewOrder>,
    /// (order_id, product_id)
    links: BTreeSet<(OrderId, ProductId)>,
    /// 每张表各自的自增序列
    sequences: [i64; 3],
}

impl Tables {
    fn next_id(&mut self, table: usize) -> i64 {
        self.sequences[table] += 1;
        self.sequences[table]
    }

    fn user(&self, id: UserId) -> Option<User> {
        let user = self.users.get(&id)?.clone().into_user(id);
        let order_ids = self
            .orders
            .iter()
            .filter(|(_, order)| order.user_id == id)
            .map(|(order_id, _)| *order_id)
            .collect();
        Some(User { order_ids, ..user })
    }

    fn product(&self, id: ProductId) -> Option<Product> {
        let product = self.products.get(&id)?.clone().into_product(id);
        let order_ids = self
            .links
            .iter()
            .filter(|(_, product_id)| *product_id == id)
            .map(|(order_id, _)| *order_id)
            .collect();
        Some(Product { order_ids, ..product })
    }

    fn order(&self, id: OrderId) -> Option<Order> {
        let order = self.orders.get(&id)?.clone().into_order(id);
        let product_ids = self
            .links
            .range((id, ProductId(i64::MIN))..=(id, ProductId(i64::MAX)))
            .map(|(_, product_id)| *product_id)
            .collect();
        Some(Order { product_ids, ..order })
    }

    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .iter()
            .any(|(id, user)| user.email == email && Some(*id) != except)
    }
}

/// 三个仓储共享同一份数据
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::internal("In-memory store poisoned"))
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().map(|t| t.users.len()).unwrap_or_default()
    }

    pub fn app(&self) -> axum::Router {
        let store = Arc::new(self.clone());
        let state = AppState::new(store.clone(), store.clone(), store.clone())
            .with_readiness(store);
        router(state, &ServerConfig::default())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list_all(&self) -> AppResult<Vec<User>> {
        let tables = self.lock()?;
        Ok(tables.users.keys().filter_map(|id| tables.user(*id)).collect())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.lock()?.user(id))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.lock()?;
        if tables.email_taken(&user.email, None) {
            return Err(AppError::conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        let id = UserId(tables.next_id(USERS));
        tables.users.insert(id, user.clone());
        Ok(user.into_user(id))
    }

    async fn update(&self, id: UserId, user: NewUser) -> AppResult<Option<User>> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if tables.email_taken(&user.email, Some(id)) {
            return Err(AppError::conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        tables.users.insert(id, user);
        Ok(tables.user(id))
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let mut tables = self.lock()?;
        if tables.orders.values().any(|order| order.user_id == id) {
            return Err(AppError::conflict(format!("User {} still owns orders", id)));
        }
        Ok(tables.users.remove(&id).is_some())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list_all(&self) -> AppResult<Vec<Product>> {
        let tables = self.lock()?;
        Ok(tables
            .products
            .keys()
            .filter_map(|id| tables.product(*id))
            .collect())
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        Ok(self.lock()?.product(id))
    }

    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let mut tables = self.lock()?;
        let id = ProductId(tables.next_id(PRODUCTS));
        tables.products.insert(id, product.clone());
        Ok(product.into_product(id))
    }

    async fn update(&self, id: ProductId, product: NewProduct) -> AppResult<Option<Product>> {
        let mut tables = self.lock()?;
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        tables.products.insert(id, product);
        Ok(tables.product(id))
    }

    async fn delete(&self, id: ProductId) -> AppResult<bool> {
        let mut tables = self.lock()?;
        tables.links.retain(|(_, product_id)| *product_id != id);
        Ok(tables.products.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_by_id(&self, id: OrderId) -> AppResult<Option<Order>> {
        Ok(self.lock()?.order(id))
    }

    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let mut tables = self.lock()?;
        if !tables.users.contains_key(&order.user_id) {
            return Err(AppError::validation(format!("User {} not found", order.user_id)));
        }
        let id = OrderId(tables.next_id(ORDERS));
        tables.orders.insert(id, order.clone());
        Ok(order.into_order(id))
    }

    async fn list_by_user(&self, user_id: UserId) -> AppResult<Vec<Order>> {
        let tables = self.lock()?;
        Ok(tables
            .orders
            .iter()
            .filter(|(_, order)| order.user_id == user_id)
            .filter_map(|(id, _)| tables.order(*id))
            .collect())
    }

    async fn list_products(&self, order_id: OrderId) -> AppResult<Vec<Product>> {
        let tables = self.lock()?;
        let product_ids = tables
            .order(order_id)
            .map(|order| order.product_ids)
            .unwrap_or_default();
        Ok(product_ids
            .into_iter()
            .filter_map(|id| tables.product(id))
            .collect())
    }

    async fn contains_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool> {
        Ok(self.lock()?.links.contains(&(order_id, product_id)))
    }

    async fn add_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool> {
        Ok(self.lock()?.links.insert((order_id, product_id)))
    }

    async fn remove_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool> {
        Ok(self.lock()?.links.remove(&(order_id, product_id)))
    }
}

#[async_trait]
impl ReadinessProbe for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn check(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }
}
