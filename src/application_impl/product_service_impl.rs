use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::ProductRepo;
use crate::logger::*;
use std::sync::Arc;

pub struct RealProductService {
    product_repo: Arc<dyn ProductRepo>,
    policy: ParamPolicy,
}

impl RealProductService {
    pub fn new(product_repo: Arc<dyn ProductRepo>, policy: ParamPolicy) -> RealProductService {
        RealProductService {
            product_repo,
            policy,
        }
    }
}

#[async_trait::async_trait]
impl ProductService for RealProductService {
    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductError> {
        let product = self.product_repo.create(draft).await?;
        debug!(id = %product.id, "product created");
        Ok(product)
    }

    async fn search(&self, params: SearchParams) -> Result<ProductPage, ProductError> {
        let query = params.to_query(&self.policy)?;
        debug!(?query, "searching products");

        let products = self.product_repo.find(&query).await?;
        let count = self.product_repo.count_documents(&query.filter).await?;

        Ok(ProductPage { count, products })
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Product>, ProductError> {
        self.product_repo.find_by_id(id).await
    }
}
