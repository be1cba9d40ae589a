//! Stateless identifier-resolution utilities.
//!
//! A miss is a valid outcome, not an error: unresolved references return
//! `{"data": null}` with 200 and the caller decides whether that is fatal.

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use stampd_core::resolver::{
    resolve_vendor_design_id, resolve_vendor_product_id, DesignRef, ProductRef, VendorDesignRef,
    VendorProductRef,
};

use crate::error::AppResult;
use crate::response::DataResponse;

/// Body for resolving a product reference.
#[derive(Debug, Deserialize)]
pub struct ResolveProductRequest {
    pub product: ProductRef,
    pub vendor_products: Vec<VendorProductRef>,
}

/// Body for resolving a design reference.
#[derive(Debug, Deserialize)]
pub struct ResolveDesignRequest {
    pub design: DesignRef,
    pub vendor_designs: Vec<VendorDesignRef>,
}

/// POST /resolve/vendor-product
pub async fn resolve_product(
    Json(input): Json<ResolveProductRequest>,
) -> AppResult<impl IntoResponse> {
    let resolved = resolve_vendor_product_id(&input.product, &input.vendor_products);
    Ok(Json(DataResponse { data: resolved }))
}

/// POST /resolve/vendor-design
pub async fn resolve_design(
    Json(input): Json<ResolveDesignRequest>,
) -> AppResult<impl IntoResponse> {
    let resolved = resolve_vendor_design_id(&input.design, &input.vendor_designs);
    Ok(Json(DataResponse { data: resolved }))
}
