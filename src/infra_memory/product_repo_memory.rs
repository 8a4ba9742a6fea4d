use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

#[derive(Debug, Clone)]
struct StoredProduct {
    seq: u64,
    product: Product,
}

/// Process-local product store. Insertion order breaks price ties.
#[derive(Debug, Default)]
pub struct MemoryProductRepo {
    products: DashMap<ProductId, StoredProduct>,
    next_seq: AtomicU64,
    /// `Some` when names carry a unique index.
    names: Option<DashMap<String, ProductId>>,
}

impl MemoryProductRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unique_names() -> Self {
        MemoryProductRepo {
            names: Some(DashMap::new()),
            ..Self::default()
        }
    }

    fn claim_name(&self, name: &str, id: ProductId) -> Result<(), ProductError> {
        let Some(names) = &self.names else {
            return Ok(());
        };
        match names.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ProductError::DuplicateKey {
                field: "name".to_string(),
                value: name.to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    fn matching(&self, filter: &ProductFilter) -> Result<Vec<StoredProduct>, ProductError> {
        let matcher = Matcher::compile(filter)?;
        Ok(self
            .products
            .iter()
            .filter(|entry| matcher.matches(&entry.product))
            .map(|entry| entry.value().clone())
            .collect())
    }
}

struct Matcher<'f> {
    filter: &'f ProductFilter,
    name: Option<Regex>,
}

impl<'f> Matcher<'f> {
    fn compile(filter: &'f ProductFilter) -> Result<Self, ProductError> {
        let name = filter
            .name_pattern
            .as_deref()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ProductError::Store(format!("invalid regular expression: {e}")))
            })
            .transpose()?;
        Ok(Matcher { filter, name })
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(re) = &self.name {
            if !re.is_match(&product.name) {
                return false;
            }
        }
        if let Some(category) = &self.filter.category {
            if product.category.as_ref() != Some(category) {
                return false;
            }
        }
        if let Some(range) = &self.filter.price {
            if !range.contains(product.price) {
                return false;
            }
        }
        true
    }
}

fn by_price(sort: SortOrder) -> impl Fn(&StoredProduct, &StoredProduct) -> Ordering {
    move |a: &StoredProduct, b: &StoredProduct| {
        let by_price = a.product.price.total_cmp(&b.product.price);
        let by_price = match sort {
            SortOrder::Ascending => by_price,
            SortOrder::Descending => by_price.reverse(),
        };
        by_price.then(a.seq.cmp(&b.seq))
    }
}

#[async_trait::async_trait]
impl ProductRepo for MemoryProductRepo {
    async fn create(&self, draft: ProductDraft) -> Result<Product, ProductError> {
        let new = draft.validate()?;
        let id = ProductId::new();
        self.claim_name(&new.name, id)?;

        let product = Product::from_new(id, new);
        let seq = self.next_seq.fetch_add(1, AtomicOrdering::Relaxed);
        self.products.insert(
            id,
            StoredProduct {
                seq,
                product: product.clone(),
            },
        );
        Ok(product)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, ProductError> {
        let id = ProductId::cast(id)?;
        Ok(self.products.get(&id).map(|entry| entry.product.clone()))
    }

    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, ProductError> {
        let window = query.window()?;
        let mut hits = self.matching(&query.filter)?;
        hits.sort_by(by_price(query.sort));

        let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
        let take = window
            .take
            .map(|t| usize::try_from(t).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        Ok(hits
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|stored| stored.product)
            .collect())
    }

    async fn count_documents(&self, filter: &ProductFilter) -> Result<u64, ProductError> {
        Ok(self.matching(filter)?.len() as u64)
    }
}
