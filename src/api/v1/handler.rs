use super::error::*;
use crate::application_port::{ProductPage, ProductService};
use crate::domain_model::{Product, ProductDraft, SearchParams};
use serde::Serialize;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "Error";

/// Envelope shared by every response: `data` on success, `message` (and for
/// uncategorized failures `error`) otherwise.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            status: STATUS_SUCCESS,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        ApiResponse {
            status: STATUS_ERROR,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn err_with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiResponse {
            error: Some(detail.into()),
            ..Self::err(message)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductData {
    pub product: Product,
}

fn json_with_status<T: Serialize>(body: &ApiResponse<T>, status: StatusCode) -> Response {
    reply::with_status(reply::json(body), status).into_response()
}

pub async fn create_product(
    body: ProductDraft,
    product_service: Arc<dyn ProductService>,
) -> Result<Response, ApiError> {
    let product = product_service.create(body).await?;

    let response = ApiResponse::ok(ProductData { product });
    Ok(json_with_status(&response, StatusCode::CREATED))
}

pub async fn search_products(
    query: SearchParams,
    product_service: Arc<dyn ProductService>,
) -> Result<Response, ApiError> {
    let page: ProductPage = product_service.search(query).await?;

    Ok(json_with_status(&ApiResponse::ok(page), StatusCode::OK))
}

pub async fn get_product_by_id(
    id: String,
    product_service: Arc<dyn ProductService>,
) -> Result<Response, ApiError> {
    let Some(product) = product_service.get_by_id(&id).await? else {
        let response = ApiResponse::<()>::err("Product Not Found");
        return Ok(json_with_status(&response, StatusCode::NOT_FOUND));
    };

    Ok(json_with_status(
        &ApiResponse::ok(ProductData { product }),
        StatusCode::OK,
    ))
}
