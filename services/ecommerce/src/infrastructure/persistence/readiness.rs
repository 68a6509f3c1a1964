//! 数据库就绪检查

use async_trait::async_trait;
use shop_adapter_postgres::check_connection;
use shop_errors::AppResult;
use sqlx::PgPool;

use crate::api::http::ReadinessProbe;

pub struct PostgresReadiness {
    pool: PgPool,
}

impl PostgresReadiness {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadinessProbe for PostgresReadiness {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn check(&self) -> AppResult<()> {
        check_connection(&self.pool).await
    }
}
