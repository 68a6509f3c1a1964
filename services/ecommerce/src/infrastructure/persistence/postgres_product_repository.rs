//! PostgreSQL 商品仓储实现

use async_trait::async_trait;
use shop_adapter_postgres::map_sqlx_error;
use shop_common::{OrderId, ProductId};
use shop_errors::AppResult;
use sqlx::PgPool;

use crate::domain::{NewProduct, Product, ProductRepository};

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list_all(&self) -> AppResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.product_name, p.price,
                   ARRAY(SELECT op.order_id FROM order_products op WHERE op.product_id = p.id ORDER BY op.order_id) AS order_ids
            FROM products p
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT p.id, p.product_name, p.price,
                   ARRAY(SELECT op.order_id FROM order_products op WHERE op.product_id = p.id ORDER BY op.order_id) AS order_ids
            FROM products p
            WHERE p.id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO products (product_name, price)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(&product.product_name)
        .bind(product.price)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(product.into_product(ProductId(id)))
    }

    async fn update(&self, id: ProductId, product: NewProduct) -> AppResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            WITH updated AS (
                UPDATE products
                SET product_name = $2, price = $3
                WHERE id = $1
                RETURNING id, product_name, price
            )
            SELECT p.id, p.product_name, p.price,
                   ARRAY(SELECT op.order_id FROM order_products op WHERE op.product_id = p.id ORDER BY op.order_id) AS order_ids
            FROM updated p
            "#,
        )
        .bind(id.0)
        .bind(&product.product_name)
        .bind(product.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: ProductId) -> AppResult<bool> {
        // order_products 上的外键为 ON DELETE CASCADE，关联行随之删除
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
pub(super) struct ProductRow {
    id: i64,
    product_name: String,
    price: f64,
    order_ids: Vec<i64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            product_name: row.product_name,
            price: row.price,
            order_ids: row.order_ids.into_iter().map(OrderId).collect(),
        }
    }
}
