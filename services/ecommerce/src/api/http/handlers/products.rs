//! 商品接口

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use shop_common::ProductId;
use shop_errors::AppError;
use tracing::info;

use crate::api::http::dto::{self, MessageResponse, ProductResponse};
use crate::api::http::error::ApiError;
use crate::api::http::schema::load;
use crate::api::http::state::AppState;
use crate::domain::NewProduct;

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.products.list_all().await?;
    Ok(Json(dto::collect(products)))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product.into()))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let new_product: NewProduct = load(&body)?;
    let product = state.products.create(new_product).await?;

    info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /products/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    body: Bytes,
) -> Result<Json<ProductResponse>, ApiError> {
    if state.products.find_by_id(id).await?.is_none() {
        return Err(AppError::validation("Invalid product id").into());
    }

    let new_product: NewProduct = load(&body)?;
    let product = state
        .products
        .update(id, new_product)
        .await?
        .ok_or_else(|| AppError::validation("Invalid product id"))?;

    info!(product_id = %id, "Product updated");
    Ok(Json(product.into()))
}

/// DELETE /products/{id}
///
/// 商品所在订单的关联行一并删除，订单本身保留。
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.products.delete(id).await? {
        return Err(AppError::validation("Invalid product id").into());
    }

    info!(product_id = %id, "Product deleted");
    Ok(Json(MessageResponse::new(format!("Product {} deleted successfully", id))))
}
