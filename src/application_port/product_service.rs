use crate::domain_model::*;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("{0}")]
    Cast(CastError),
    #[error("No document found for query")]
    DocumentNotFound,
    #[error("duplicate key error: {field} '{value}' already exists")]
    DuplicateKey { field: String, value: String },
    #[error("{0}")]
    Validation(ValidationError),
    #[error("invalid query parameter: {0}")]
    InvalidParam(String),
    #[error("store error: {0}")]
    Store(String),
}

impl From<CastError> for ProductError {
    fn from(err: CastError) -> Self {
        ProductError::Cast(err)
    }
}

impl From<ValidationError> for ProductError {
    fn from(err: ValidationError) -> Self {
        ProductError::Validation(err)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    /// Matches for the filter, ignoring pagination.
    pub count: u64,
    pub products: Vec<Product>,
}

#[async_trait::async_trait]
pub trait ProductService: Send + Sync {
    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductError>;
    async fn search(&self, params: SearchParams) -> Result<ProductPage, ProductError>;
    /// `Ok(None)` when the id is well formed but nothing matches.
    async fn get_by_id(&self, id: &str) -> Result<Option<Product>, ProductError>;
}
