//! 请求共享状态
//!
//! 每个 handler 通过 `State` 提取器显式拿到存储句柄，不依赖进程级全局变量。

use std::sync::Arc;

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;
use shop_errors::AppResult;

use crate::domain::{OrderRepository, ProductRepository, UserRepository};

/// 就绪检查
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub readiness: Vec<Arc<dyn ReadinessProbe>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            users,
            products,
            orders,
            readiness: Vec::new(),
            metrics: None,
        }
    }

    pub fn with_readiness(mut self, probe: Arc<dyn ReadinessProbe>) -> Self {
        self.readiness.push(probe);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
