use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::ParamPolicy;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::{Settings, Storage};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

pub struct Server {
    pub product_service: Arc<dyn ProductService>,
    pool: Option<MySqlPool>,
}

/// A product store plus the pool backing it, if any.
pub struct ProductStore {
    pub repo: Arc<dyn ProductRepo>,
    pub pool: Option<MySqlPool>,
}

pub async fn open_product_store(storage: &Storage) -> anyhow::Result<ProductStore> {
    match storage.backend.as_str() {
        "memory" => {
            let repo = if storage.unique_names {
                MemoryProductRepo::with_unique_names()
            } else {
                MemoryProductRepo::new()
            };
            Ok(ProductStore {
                repo: Arc::new(repo),
                pool: None,
            })
        }
        "mysql" => {
            let dsn = storage
                .dsn
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("storage.dsn is required for the mysql backend"))?;
            let pool = MySqlPoolOptions::new()
                .max_connections(storage.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
                .connect(dsn)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("mysql product store ready");

            Ok(ProductStore {
                repo: Arc::new(MySqlProductRepo::new(pool.clone())),
                pool: Some(pool),
            })
        }
        other => Err(anyhow::anyhow!("Unknown storage backend: {}", other)),
    }
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let store = open_product_store(&settings.storage).await?;
        let policy = ParamPolicy {
            strict: settings.query.strict_params,
            max_limit: settings.query.max_limit,
        };

        let server = Self::with_repo(store.repo, policy);
        info!(backend = %settings.storage.backend, strict = policy.strict, "server started");

        Ok(Self {
            pool: store.pool,
            ..server
        })
    }

    pub fn with_repo(product_repo: Arc<dyn ProductRepo>, policy: ParamPolicy) -> Self {
        let product_service: Arc<dyn ProductService> =
            Arc::new(RealProductService::new(product_repo, policy));

        Self {
            product_service,
            pool: None,
        }
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
