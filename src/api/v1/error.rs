use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use crate::domain_model::CastKind;
use std::convert::Infallible;
use std::future::Future;
use thiserror::Error;
use tracing::warn;
use warp::Rejection;
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};

/// A handler failure, already classified into the response it produces.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Invalid ID")]
    InvalidId,
    #[error("Resource not found")]
    ResourceNotFound,
    #[error("A resource with the same {field} '{value}' already exists")]
    Conflict { field: String, value: String },
    #[error("{0}")]
    Validation(String),
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiError {
        warn!("Internal error: {}", error);
        ApiError::Internal(error.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidId | ApiError::ResourceNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ApiResponse<()> {
        match self {
            ApiError::Internal(detail) => ApiResponse::err_with_detail(self.to_string(), detail),
            _ => ApiResponse::err(self.to_string()),
        }
    }
}

impl Reply for ApiError {
    fn into_response(self) -> Response {
        reply::with_status(reply::json(&self.body()), self.status()).into_response()
    }
}

impl From<ProductError> for ApiError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::Cast(ref cast) if cast.kind == CastKind::Id => ApiError::InvalidId,
            ProductError::DocumentNotFound => ApiError::ResourceNotFound,
            ProductError::DuplicateKey { field, value } => ApiError::Conflict { field, value },
            ProductError::Validation(e) => ApiError::Validation(e.to_string()),
            ProductError::InvalidParam(msg) => ApiError::Validation(msg),
            other => ApiError::internal(other),
        }
    }
}

/// Runs a handler and turns whatever it fails with into exactly one response.
pub async fn catch_errors<F, R>(handler: F) -> Result<Response, Infallible>
where
    F: Future<Output = Result<R, ApiError>>,
    R: Reply,
{
    match handler.await {
        Ok(reply) => Ok(reply.into_response()),
        Err(err) => Ok(err.into_response()),
    }
}

/// Failures warp raises before a handler runs.
pub async fn recover_error(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::LengthRequired>() {
        (StatusCode::LENGTH_REQUIRED, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::PayloadTooLarge>() {
        (StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
    } else {
        warn!("Unhandled rejection: {:?}", err);
        return Ok(ApiError::Internal(format!("Unhandled rejection: {:?}", err)).into_response());
    };

    let json = reply::json(&ApiResponse::<()>::err(message));
    Ok(reply::with_status(json, status).into_response())
}
