//! Product listing routes, staff-only and store-scoped.
//!
//! Marketplace tags in payloads are parsed strictly: an unknown name is
//! a 400, unlike the lenient ingestion path where provenance degrades
//! to null.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use sellerdesk_core::{Marketplace, ProductId};

use crate::db::{ProductDraft, ProductRepository};
use crate::error::ApiError;
use crate::middleware::RequireStaff;
use crate::models::Product;
use crate::state::AppState;

/// Parse marketplace tags strictly, rejecting unknown names.
fn parse_marketplaces(raw: &[String]) -> Result<Vec<Marketplace>, ApiError> {
    raw.iter()
        .map(|s| {
            s.parse::<Marketplace>()
                .map_err(|e| ApiError::Validation(e.to_string()))
        })
        .collect()
}

/// List the products of the caller's store.
///
/// `GET /api/products`
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(current): RequireStaff,
) -> Result<Json<Vec<Product>>, ApiError> {
    let store = super::resolve_store(&state, &current).await?;
    let products = ProductRepository::new(state.pool()).list(store.id).await?;
    Ok(Json(products))
}

/// Request body for creating or updating a product.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specifications: Option<serde_json::Value>,
    #[serde(default)]
    pub marketplaces: Vec<String>,
}

/// Create a product in the caller's store.
///
/// `POST /api/products`
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(current): RequireStaff,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let store = super::resolve_store(&state, &current).await?;

    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("Title must not be empty".to_string()));
    }
    let marketplaces = parse_marketplaces(&req.marketplaces)?;
    let specifications = req
        .specifications
        .unwrap_or_else(|| serde_json::json!({}));

    let product = ProductRepository::new(state.pool())
        .create(
            store.id,
            ProductDraft {
                title: &req.title,
                description: &req.description,
                specifications: &specifications,
                marketplaces: &marketplaces,
            },
            Some(current.id),
        )
        .await?;

    tracing::info!(
        product_id = product.id.as_i32(),
        store_id = store.id.as_i32(),
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// Get one product of the caller's store.
///
/// `GET /api/products/{id}`
pub async fn show(
    State(state): State<AppState>,
    RequireStaff(current): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    let store = super::resolve_store(&state, &current).await?;
    let product = ProductRepository::new(state.pool())
        .get(store.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;
    Ok(Json(product))
}

/// Replace a product's fields.
///
/// `PUT /api/products/{id}`
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(current): RequireStaff,
    Path(id): Path<ProductId>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>, ApiError> {
    let store = super::resolve_store(&state, &current).await?;

    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("Title must not be empty".to_string()));
    }
    let marketplaces = parse_marketplaces(&req.marketplaces)?;
    let specifications = req
        .specifications
        .unwrap_or_else(|| serde_json::json!({}));

    let product = ProductRepository::new(state.pool())
        .update(
            store.id,
            id,
            ProductDraft {
                title: &req.title,
                description: &req.description,
                specifications: &specifications,
                marketplaces: &marketplaces,
            },
        )
        .await?;
    Ok(Json(product))
}

/// Delete a product from the caller's store.
///
/// `DELETE /api/products/{id}`
pub async fn remove(
    State(state): State<AppState>,
    RequireStaff(current): RequireStaff,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, ApiError> {
    let store = super::resolve_store(&state, &current).await?;
    let deleted = ProductRepository::new(state.pool())
        .delete(store.id, id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    tracing::info!(
        product_id = id.as_i32(),
        store_id = store.id.as_i32(),
        "Product deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
