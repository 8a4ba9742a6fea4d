use crate::application_port::ProductError;
use crate::domain_model::*;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Inclusive bounds on `price`. At least one side is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive pattern over `name`.
    pub name_pattern: Option<String>,
    pub category: Option<String>,
    pub price: Option<PriceRange>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: SortOrder,
    pub skip: i64,
    pub limit: i64,
}

/// How a store interprets `skip`/`limit`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Window {
    pub skip: u64,
    pub take: Option<u64>,
}

impl ProductQuery {
    pub fn find(filter: ProductFilter) -> Self {
        ProductQuery {
            filter,
            sort: SortOrder::default(),
            skip: 0,
            limit: 0,
        }
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn skip(mut self, skip: i64) -> Self {
        self.skip = skip;
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// A zero limit means "no limit" and a negative one is taken by magnitude.
    /// Negative skips are refused.
    pub fn window(&self) -> Result<Window, ProductError> {
        if self.skip < 0 {
            return Err(ProductError::Store(format!(
                "skip must be a non-negative number, got {}",
                self.skip
            )));
        }
        let take = match self.limit {
            0 => None,
            n => Some(n.unsigned_abs()),
        };
        Ok(Window {
            skip: self.skip as u64,
            take,
        })
    }
}

/// Raw search/list query string. Values are untrusted and unparsed.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParamPolicy {
    /// Reject malformed or out-of-range parameters instead of passing them on.
    pub strict: bool,
    pub max_limit: Option<u32>,
}

impl ParamPolicy {
    fn reject_cast(&self, err: CastError) -> ProductError {
        if self.strict {
            ProductError::InvalidParam(err.to_string())
        } else {
            ProductError::Cast(err)
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl SearchParams {
    /// Builds params from decoded query pairs. A repeated key keeps its last
    /// value and unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = SearchParams::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "search" => &mut params.search,
                "category" => &mut params.category,
                "sort" => &mut params.sort,
                "minPrice" => &mut params.min_price,
                "maxPrice" => &mut params.max_price,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }

    pub fn to_query(&self, policy: &ParamPolicy) -> Result<ProductQuery, ProductError> {
        let page = present(&self.page)
            .map(|raw| parse_integer("page", raw))
            .transpose()
            .map_err(|e| policy.reject_cast(e))?
            .unwrap_or(DEFAULT_PAGE);
        let limit = present(&self.limit)
            .map(|raw| parse_integer("limit", raw))
            .transpose()
            .map_err(|e| policy.reject_cast(e))?
            .unwrap_or(DEFAULT_LIMIT);
        let min = present(&self.min_price)
            .map(|raw| parse_number("price", raw))
            .transpose()
            .map_err(|e| policy.reject_cast(e))?;
        let max = present(&self.max_price)
            .map(|raw| parse_number("price", raw))
            .transpose()
            .map_err(|e| policy.reject_cast(e))?;

        if policy.strict {
            if page < 1 {
                return Err(ProductError::InvalidParam(format!(
                    "page must be a positive integer, got {}",
                    page
                )));
            }
            if limit < 1 {
                return Err(ProductError::InvalidParam(format!(
                    "limit must be a positive integer, got {}",
                    limit
                )));
            }
            if let Some(max_limit) = policy.max_limit {
                if limit > i64::from(max_limit) {
                    return Err(ProductError::InvalidParam(format!(
                        "limit must not exceed {}, got {}",
                        max_limit, limit
                    )));
                }
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(ProductError::InvalidParam(format!(
                        "minPrice ({}) must not exceed maxPrice ({})",
                        min, max
                    )));
                }
            }
        }

        let skip = page.checked_sub(1).and_then(|p| p.checked_mul(limit)).ok_or_else(|| {
            let msg = format!("page {} with limit {} is out of range", page, limit);
            if policy.strict {
                ProductError::InvalidParam(msg)
            } else {
                ProductError::Store(msg)
            }
        })?;

        let price = match (min, max) {
            (None, None) => None,
            (min, max) => Some(PriceRange { min, max }),
        };
        let filter = ProductFilter {
            name_pattern: present(&self.search).map(str::to_string),
            category: present(&self.category).map(str::to_string),
            price,
        };
        let sort = match self.sort.as_deref() {
            Some("asc") => SortOrder::Ascending,
            _ => SortOrder::Descending,
        };

        Ok(ProductQuery::find(filter).limit(limit).skip(skip).sort(sort))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        SearchParams::from_pairs(pairs.iter().copied())
    }

    const LENIENT: ParamPolicy = ParamPolicy {
        strict: false,
        max_limit: None,
    };
    const STRICT: ParamPolicy = ParamPolicy {
        strict: true,
        max_limit: Some(100),
    };

    #[test]
    fn defaults() {
        let q = params(&[]).to_query(&LENIENT).unwrap();
        assert_eq!(q.filter, ProductFilter::default());
        assert_eq!(q.sort, SortOrder::Descending);
        assert_eq!((q.skip, q.limit), (0, DEFAULT_LIMIT));
    }

    #[test]
    fn pagination_arithmetic() {
        let q = params(&[("page", "3"), ("limit", "5")]).to_query(&LENIENT).unwrap();
        assert_eq!((q.skip, q.limit), (10, 5));
    }

    #[test]
    fn filters_from_text_params() {
        let q = params(&[("search", "lamp"), ("category", "Lighting"), ("sort", "asc")])
            .to_query(&LENIENT)
            .unwrap();
        assert_eq!(q.filter.name_pattern.as_deref(), Some("lamp"));
        assert_eq!(q.filter.category.as_deref(), Some("Lighting"));
        assert_eq!(q.sort, SortOrder::Ascending);
    }

    #[test]
    fn only_exact_asc_sorts_ascending() {
        for s in ["ASC", "desc", "ascending", ""] {
            let q = params(&[("sort", s)]).to_query(&LENIENT).unwrap();
            assert_eq!(q.sort, SortOrder::Descending, "sort={s}");
        }
    }

    #[test]
    fn price_bounds() {
        let both = params(&[("minPrice", "10"), ("maxPrice", "20")])
            .to_query(&LENIENT)
            .unwrap();
        assert_eq!(
            both.filter.price,
            Some(PriceRange {
                min: Some(10.0),
                max: Some(20.0)
            })
        );

        let lower = params(&[("minPrice", "0")]).to_query(&LENIENT).unwrap();
        assert_eq!(
            lower.filter.price,
            Some(PriceRange {
                min: Some(0.0),
                max: None
            })
        );

        let upper = params(&[("maxPrice", "5.5")]).to_query(&LENIENT).unwrap();
        assert_eq!(
            upper.filter.price,
            Some(PriceRange {
                min: None,
                max: Some(5.5)
            })
        );
    }

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let p = params(&[("page", "1"), ("limit", "5"), ("page", "2"), ("color", "red")]);
        assert_eq!(p.page.as_deref(), Some("2"));
        let q = p.to_query(&LENIENT).unwrap();
        assert_eq!((q.skip, q.limit), (5, 5));
    }

    #[test]
    fn empty_values_count_as_absent() {
        let q = params(&[("search", ""), ("minPrice", ""), ("page", "")])
            .to_query(&LENIENT)
            .unwrap();
        assert_eq!(q.filter, ProductFilter::default());
        assert_eq!(q.skip, 0);
    }

    #[test]
    fn lenient_passes_bad_values_through_as_casts() {
        let err = params(&[("minPrice", "cheap")]).to_query(&LENIENT).unwrap_err();
        assert!(matches!(err, ProductError::Cast(ref c) if c.kind == CastKind::Number));

        // inverted range and page 0 are left for the store to deal with
        let q = params(&[("minPrice", "20"), ("maxPrice", "10"), ("page", "0")])
            .to_query(&LENIENT)
            .unwrap();
        assert_eq!(q.skip, -DEFAULT_LIMIT);
        assert!(q.window().is_err());
    }

    #[test]
    fn strict_rejects_up_front() {
        let cases: &[&[(&str, &str)]] = &[
            &[("page", "0")],
            &[("limit", "-1")],
            &[("limit", "101")],
            &[("page", "x")],
            &[("minPrice", "20"), ("maxPrice", "10")],
        ];
        for case in cases {
            let err = params(case).to_query(&STRICT).unwrap_err();
            assert!(matches!(err, ProductError::InvalidParam(_)), "{case:?}");
        }
    }

    #[test]
    fn skip_overflow() {
        let page = i64::MAX.to_string();
        let p = params(&[("page", page.as_str()), ("limit", "10")]);
        assert!(matches!(p.to_query(&LENIENT), Err(ProductError::Store(_))));
        assert!(matches!(p.to_query(&STRICT), Err(ProductError::InvalidParam(_))));

        let lowest = i64::MIN.to_string();
        let p = params(&[("page", lowest.as_str())]);
        assert!(matches!(p.to_query(&LENIENT), Err(ProductError::Store(_))));
        assert!(matches!(p.to_query(&STRICT), Err(ProductError::InvalidParam(_))));
    }

    #[test]
    fn window_semantics() {
        let q = ProductQuery::find(ProductFilter::default());
        assert_eq!(q.clone().limit(0).window().unwrap().take, None);
        assert_eq!(q.clone().limit(-3).window().unwrap().take, Some(3));
        assert_eq!(
            q.limit(5).skip(10).window().unwrap(),
            Window {
                skip: 10,
                take: Some(5)
            }
        );
    }
}
