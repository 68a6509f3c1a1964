//! 路由定义

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};
use shop_config::ServerConfig;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::http::handlers::{orders, products, system, users};
use crate::api::http::middleware::track_metrics;
use crate::api::http::state::AppState;

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(system::home))
        .route("/health", get(system::health_check))
        .route("/ready", get(system::readiness_check))
        .route("/metrics", get(system::metrics))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/orders", axum::routing::post(orders::create_order))
        .route("/orders/{order_id}", get(orders::get_order))
        .route(
            "/orders/{order_id}/add_product/{product_id}",
            put(orders::add_product),
        )
        .route(
            "/orders/{order_id}/remove_product/{product_id}",
            delete(orders::remove_product),
        )
        .route("/orders/user/{user_id}", get(orders::list_user_orders))
        .route("/orders/{order_id}/products", get(orders::list_order_products))
        .layer(middleware::from_fn(track_metrics))
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
