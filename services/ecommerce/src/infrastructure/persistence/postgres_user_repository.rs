//! PostgreSQL 用户仓储实现

use async_trait::async_trait;
use shop_adapter_postgres::{ConstraintViolation, constraint_violation, map_sqlx_error};
use shop_common::{OrderId, UserId};
use shop_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::domain::{NewUser, User, UserRepository};

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 邮箱唯一约束冲突时给出可读信息
fn map_write_error(e: sqlx::Error, email: &str) -> AppError {
    match constraint_violation(&e) {
        Some(ConstraintViolation::Unique(_)) => {
            AppError::conflict(format!("Email {} is already registered", email))
        }
        _ => map_sqlx_error(e),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn list_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.name, u.address, u.email,
                   ARRAY(SELECT o.id FROM orders o WHERE o.user_id = u.id ORDER BY o.id) AS order_ids
            FROM users u
            ORDER BY u.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.name, u.address, u.email,
                   ARRAY(SELECT o.id FROM orders o WHERE o.user_id = u.id ORDER BY o.id) AS order_ids
            FROM users u
            WHERE u.id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO users (name, address, email)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.address)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email))?;

        Ok(user.into_user(UserId(id)))
    }

    async fn update(&self, id: UserId, user: NewUser) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            WITH updated AS (
                UPDATE users
                SET name = $2, address = $3, email = $4
                WHERE id = $1
                RETURNING id, name, address, email
            )
            SELECT u.id, u.name, u.address, u.email,
                   ARRAY(SELECT o.id FROM orders o WHERE o.user_id = u.id ORDER BY o.id) AS order_ids
            FROM updated u
            "#,
        )
        .bind(id.0)
        .bind(&user.name)
        .bind(&user.address)
        .bind(&user.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &user.email))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| match constraint_violation(&e) {
                Some(ConstraintViolation::ForeignKey(_)) => {
                    AppError::conflict(format!("User {} still owns orders", id))
                }
                _ => map_sqlx_error(e),
            })?;

        Ok(result.rows_affected() > 0)
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    address: String,
    email: String,
    order_ids: Vec<i64>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            name: row.name,
            address: row.address,
            email: row.email,
            order_ids: row.order_ids.into_iter().map(OrderId).collect(),
        }
    }
}
