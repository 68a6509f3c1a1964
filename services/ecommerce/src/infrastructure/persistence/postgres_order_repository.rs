//! PostgreSQL 订单仓储实现

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shop_adapter_postgres::{ConstraintViolation, constraint_violation, map_sqlx_error};
use shop_common::{OrderId, ProductId, UserId};
use shop_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::debug;

use super::postgres_product_repository::ProductRow;
use crate::domain::{NewOrder, Order, OrderRepository, Product};

pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: OrderId) -> AppResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.order_date, o.user_id,
                   ARRAY(SELECT op.product_id FROM order_products op WHERE op.order_id = o.id ORDER BY op.product_id) AS product_ids
            FROM orders o
            WHERE o.id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    /// 返回数据库实际保存的行，`TIMESTAMP` 只保留到微秒
    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (order_date, user_id)
            VALUES ($1, $2)
            RETURNING id, order_date, user_id, ARRAY[]::BIGINT[] AS product_ids
            "#,
        )
        .bind(order.order_date)
        .bind(order.user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match constraint_violation(&e) {
            Some(ConstraintViolation::ForeignKey(_)) => {
                AppError::validation(format!("User {} not found", order.user_id))
            }
            _ => map_sqlx_error(e),
        })?;

        Ok(row.into())
    }

    async fn list_by_user(&self, user_id: UserId) -> AppResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.order_date, o.user_id,
                   ARRAY(SELECT op.product_id FROM order_products op WHERE op.order_id = o.id ORDER BY op.product_id) AS product_ids
            FROM orders o
            WHERE o.user_id = $1
            ORDER BY o.id
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_products(&self, order_id: OrderId) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.product_name, p.price,
                   ARRAY(SELECT x.order_id FROM order_products x WHERE x.product_id = p.id ORDER BY x.order_id) AS order_ids
            FROM products p
            INNER JOIN order_products op ON p.id = op.product_id
            WHERE op.order_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(order_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn contains_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM order_products WHERE order_id = $1 AND product_id = $2)",
        )
        .bind(order_id.0)
        .bind(product_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(exists)
    }

    async fn add_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool> {
        // 复合主键保证同一对 (order, product) 至多一行
        let result = sqlx::query(
            r#"
            INSERT INTO order_products (order_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (order_id, product_id) DO NOTHING
            "#,
        )
        .bind(order_id.0)
        .bind(product_id.0)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let inserted = result.rows_affected() == 1;
        debug!(%order_id, %product_id, inserted, "Order membership insert");
        Ok(inserted)
    }

    async fn remove_product(&self, order_id: OrderId, product_id: ProductId) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM order_products WHERE order_id = $1 AND product_id = $2")
                .bind(order_id.0)
                .bind(product_id.0)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_date: NaiveDateTime,
    user_id: i64,
    product_ids: Vec<i64>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: OrderId(row.id),
            order_date: row.order_date,
            user_id: UserId(row.user_id),
            product_ids: row.product_ids.into_iter().map(ProductId).collect(),
        }
    }
}
