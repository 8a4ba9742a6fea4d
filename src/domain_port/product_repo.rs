use crate::application_port::*;
use crate::domain_model::*;

/// Document-store operations the catalog needs. Implementations own id
/// assignment, schema validation and id casting.
#[async_trait::async_trait]
pub trait ProductRepo: Send + Sync {
    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductError>;

    /// Fails with a [`CastKind::Id`] cast error when `id` is not a key.
    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, ProductError>;

    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, ProductError>;

    async fn count_documents(&self, filter: &ProductFilter) -> Result<u64, ProductError>;
}
