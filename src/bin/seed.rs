use catalog::domain_model::ProductDraft;
use catalog::logger::*;
use catalog::server::open_product_store;
use catalog::settings::*;
use serde_json::json;

/// Fills the configured store with a small demo catalog.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    let store = open_product_store(&project_settings.storage).await?;

    let samples = [
        json!({"name": "Oak Desk", "description": "Solid oak, 140cm", "price": 320.0, "category": "furniture"}),
        json!({"name": "Desk Lamp", "description": "LED, dimmable", "price": 24.99, "category": "lighting"}),
        json!({"name": "Floor Lamp", "price": 79.5, "category": "lighting"}),
        json!({"name": "Bar Stool", "price": 45.0, "category": "furniture"}),
        json!({"name": "Ceramic Mug", "description": "350ml", "price": 8.0, "category": "kitchen"}),
        json!({"name": "Kettle", "price": 29.0, "category": "kitchen"}),
        json!({"name": "Wall Clock", "price": 19.0}),
    ];

    for sample in samples {
        let draft: ProductDraft = serde_json::from_value(sample)?;
        match store.repo.create(draft).await {
            Ok(product) => info!(id = %product.id, name = %product.name, "seeded"),
            Err(e) => warn!("skipping sample: {}", e),
        }
    }

    if let Some(pool) = store.pool {
        pool.close().await;
    }
    Ok(())
}
