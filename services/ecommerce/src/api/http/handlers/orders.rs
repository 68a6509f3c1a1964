//! 订单接口及订单与商品的关联维护

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use shop_common::{OrderId, ProductId, UserId};
use shop_errors::AppError;
use tracing::{debug, info};

use crate::api::http::dto::{self, MessageResponse, OrderResponse, ProductResponse};
use crate::api::http::error::ApiError;
use crate::api::http::schema::load;
use crate::api::http::state::AppState;
use crate::domain::NewOrder;

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let new_order: NewOrder = load(&body)?;
    let order = state.orders.create(new_order).await?;

    info!(order_id = %order.id, user_id = %order.user_id, "Order created");
    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .orders
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    Ok(Json(order.into()))
}

/// 订单和商品都必须存在，缺失时按订单优先报错
async fn ensure_order_and_product(
    state: &AppState,
    order_id: OrderId,
    product_id: ProductId,
) -> Result<(), AppError> {
    if state.orders.find_by_id(order_id).await?.is_none() {
        return Err(AppError::validation("Order not found"));
    }
    if state.products.find_by_id(product_id).await?.is_none() {
        return Err(AppError::validation("Product not found"));
    }
    Ok(())
}

/// PUT /orders/{order_id}/add_product/{product_id}
pub async fn add_product(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(OrderId, ProductId)>,
) -> Result<Json<MessageResponse>, ApiError> {
    ensure_order_and_product(&state, order_id, product_id).await?;

    if state.orders.contains_product(order_id, product_id).await? {
        return Err(AppError::validation("Product already added").into());
    }
    // 并发请求可能在检查之后抢先插入
    if !state.orders.add_product(order_id, product_id).await? {
        debug!(%order_id, %product_id, "Concurrent add lost the race");
        return Err(AppError::validation("Product already added").into());
    }

    info!(%order_id, %product_id, "Product added to order");
    Ok(Json(MessageResponse::new("Product added successfully")))
}

/// DELETE /orders/{order_id}/remove_product/{product_id}
pub async fn remove_product(
    State(state): State<AppState>,
    Path((order_id, product_id)): Path<(OrderId, ProductId)>,
) -> Result<Json<MessageResponse>, ApiError> {
    ensure_order_and_product(&state, order_id, product_id).await?;

    if !state.orders.remove_product(order_id, product_id).await? {
        return Err(AppError::validation("Product not in this order").into());
    }

    info!(%order_id, %product_id, "Product removed from order");
    Ok(Json(MessageResponse::new("Product removed successfully")))
}

/// GET /orders/user/{user_id}
pub async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    if state.users.find_by_id(user_id).await?.is_none() {
        return Err(AppError::validation("User not found").into());
    }

    let orders = state.orders.list_by_user(user_id).await?;
    Ok(Json(dto::collect(orders)))
}

/// GET /orders/{order_id}/products
pub async fn list_order_products(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    if state.orders.find_by_id(order_id).await?.is_none() {
        return Err(AppError::validation("Order not found").into());
    }

    let products = state.orders.list_products(order_id).await?;
    Ok(Json(dto::collect(products)))
}
