use super::util::{is_dup_key, parse_dup_entry};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};

const SELECT_PRODUCT: &str = "SELECT product_id, name, description, price, category FROM product";

pub struct MySqlProductRepo {
    pool: MySqlPool,
}

impl MySqlProductRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlProductRepo { pool }
    }

    fn row_to_product(row: &MySqlRow) -> Result<Product, ProductError> {
        Ok(Product {
            id: row.try_get("product_id").map_err(store_err)?,
            name: row.try_get("name").map_err(store_err)?,
            description: row.try_get("description").map_err(store_err)?,
            price: row.try_get("price").map_err(store_err)?,
            category: row.try_get("category").map_err(store_err)?,
        })
    }

    async fn fetch(&self, id: ProductId) -> Result<Option<Product>, ProductError> {
        let row = sqlx::query(&format!("{SELECT_PRODUCT} WHERE product_id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_err)?;

        row.as_ref().map(Self::row_to_product).transpose()
    }
}

fn store_err(e: sqlx::Error) -> ProductError {
    ProductError::Store(e.to_string())
}

fn push_filter(qb: &mut QueryBuilder<'_, MySql>, filter: &ProductFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(pattern) = &filter.name_pattern {
        qb.push(" AND REGEXP_LIKE(name, ")
            .push_bind(pattern.clone())
            .push(", 'i')");
    }
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(range) = filter.price {
        if let Some(min) = range.min {
            qb.push(" AND price >= ").push_bind(min);
        }
        if let Some(max) = range.max {
            qb.push(" AND price <= ").push_bind(max);
        }
    }
}

fn select_products(query: &ProductQuery, window: Window) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new(SELECT_PRODUCT);
    push_filter(&mut qb, &query.filter);
    qb.push(match query.sort {
        SortOrder::Ascending => " ORDER BY price ASC, seq ASC",
        SortOrder::Descending => " ORDER BY price DESC, seq ASC",
    });
    // MySQL has no OFFSET without LIMIT
    qb.push(" LIMIT ")
        .push_bind(window.take.unwrap_or(u64::MAX))
        .push(" OFFSET ")
        .push_bind(window.skip);
    qb
}

fn count_products(filter: &ProductFilter) -> QueryBuilder<'static, MySql> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM product");
    push_filter(&mut qb, filter);
    qb
}

#[async_trait::async_trait]
impl ProductRepo for MySqlProductRepo {
    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductError> {
        let new = draft.validate()?;
        let id = ProductId::new();

        let res = sqlx::query(
            r#"
INSERT INTO product (product_id, name, description, price, category)
VALUES (?, ?, ?, ?, ?)
"#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => {}
            Err(e) if is_dup_key(&e) => {
                let message = e
                    .as_database_error()
                    .map(|db| db.message().to_string())
                    .unwrap_or_default();
                let (field, value) =
                    parse_dup_entry(&message).unwrap_or_else(|| ("name".to_string(), new.name.clone()));
                return Err(ProductError::DuplicateKey { field, value });
            }
            Err(e) => return Err(store_err(e)),
        }

        // read back what the store kept
        self.fetch(id).await?.ok_or(ProductError::DocumentNotFound)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, ProductError> {
        let id = ProductId::cast(id)?;
        self.fetch(id).await
    }

    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, ProductError> {
        let window = query.window()?;

        let mut qb = select_products(query, window);
        let rows = qb.build().fetch_all(&self.pool).await.map_err(store_err)?;
        rows.iter().map(Self::row_to_product).collect()
    }

    async fn count_documents(&self, filter: &ProductFilter) -> Result<u64, ProductError> {
        let mut qb = count_products(filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(store_err)?;

        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_select() {
        let query = ProductQuery::find(ProductFilter::default()).limit(10);
        let qb = select_products(&query, query.window().unwrap());
        assert_eq!(
            qb.sql(),
            format!("{SELECT_PRODUCT} WHERE 1 = 1 ORDER BY price DESC, seq ASC LIMIT ? OFFSET ?")
        );
    }

    #[test]
    fn filtered_select_binds_every_condition() {
        let filter = ProductFilter {
            name_pattern: Some("lamp".into()),
            category: Some("Lighting".into()),
            price: Some(PriceRange {
                min: Some(5.0),
                max: Some(50.0),
            }),
        };
        let query = ProductQuery::find(filter)
            .limit(0)
            .skip(20)
            .sort(SortOrder::Ascending);
        let qb = select_products(&query, query.window().unwrap());
        assert_eq!(
            qb.sql(),
            format!(
                "{SELECT_PRODUCT} WHERE 1 = 1 AND REGEXP_LIKE(name, ?, 'i') AND category = ? \
                 AND price >= ? AND price <= ? ORDER BY price ASC, seq ASC LIMIT ? OFFSET ?"
            )
        );
    }

    #[test]
    fn count_uses_only_the_filter() {
        let filter = ProductFilter {
            price: Some(PriceRange {
                min: None,
                max: Some(9.5),
            }),
            ..ProductFilter::default()
        };
        let qb = count_products(&filter);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM product WHERE 1 = 1 AND price <= ?");
    }
}
