//! Listing queries over a catalog snapshot: category filter, name search, pagination.
//!
//! All inputs arrive as raw query-string values; nothing here fails on malformed
//! numbers or blank filters, they fall back to "match everything" / defaults.
//! The one exception is [`search_by_name`], which requires a term.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::json;

use storefront_core::{DomainError, DomainResult};

use crate::product::Product;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Set of lower-cased category names. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    categories: BTreeSet<String>,
}

impl CategoryFilter {
    /// Parse a comma-separated list (`"Electronics, kitchen"`).
    pub fn parse(raw: Option<&str>) -> Self {
        let categories = raw
            .unwrap_or_default()
            .split(',')
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.is_empty() || self.categories.contains(&product.category().to_lowercase())
    }
}

/// Case-insensitive substring test on the product name. An absent or empty term matches.
pub fn name_matches(product: &Product, term: Option<&str>) -> bool {
    match term {
        Some(term) if !term.is_empty() => product
            .name()
            .to_lowercase()
            .contains(&term.to_lowercase()),
        _ => true,
    }
}

/// 1-based page window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Coerce raw query values. Anything without a leading integer, or below 1,
    /// falls back to the default for that field.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            limit: positive_or(limit, DEFAULT_LIMIT),
        }
    }

    fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn positive_or(raw: Option<&str>, default: usize) -> usize {
    match raw.and_then(leading_integer) {
        Some(v) if v >= 1 => v as usize,
        _ => default,
    }
}

/// Lenient integer parse: leading whitespace, optional sign, then digits; trailing
/// garbage is ignored (`"2abc"` → 2). Values beyond `i64` saturate.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
    pub limit: usize,
}

/// Paginated listing envelope: `{ metadata, data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub metadata: PageMetadata,
    pub data: Vec<T>,
}

/// Slice `items` to the requested page. Out-of-range pages yield an empty `data`.
pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Paginated<T> {
    let total = items.len();
    let total_pages = total.div_ceil(pagination.limit).max(1);
    let data = items
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.limit)
        .collect();

    Paginated {
        metadata: PageMetadata {
            total,
            total_pages,
            page: pagination.page,
            limit: pagination.limit,
        },
        data,
    }
}

/// Untyped listing parameters, exactly as they appear in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    /// Build from raw `key=value` pairs. A repeated key keeps its first value;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "category" => &mut query.category,
                "q" => &mut query.q,
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Category filter AND name search, then pagination, in that order.
pub fn list_products(products: &[Product], query: &ListQuery) -> Paginated<Product> {
    let filter = CategoryFilter::parse(query.category.as_deref());
    let term = query.q.as_deref();

    let matching = products
        .iter()
        .filter(|p| filter.matches(p) && name_matches(p, term))
        .cloned()
        .collect::<Vec<_>>();

    paginate(
        matching,
        Pagination::from_raw(query.page.as_deref(), query.limit.as_deref()),
    )
}

/// Dedicated name search. Unlike the listing, a missing or empty term is an error.
pub fn search_by_name(products: &[Product], term: Option<&str>) -> DomainResult<Vec<Product>> {
    let term = match term {
        Some(t) if !t.is_empty() => t,
        _ => {
            return Err(DomainError::validation_with(
                "Search term is required",
                json!({ "name": "query parameter is required" }),
            ));
        }
    };

    Ok(products
        .iter()
        .filter(|p| name_matches(p, Some(term)))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::seed_catalog;
    use storefront_core::Entity;

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id().as_str()).collect()
    }

    fn query(category: Option<&str>, q: Option<&str>, page: Option<&str>, limit: Option<&str>) -> ListQuery {
        ListQuery {
            category: category.map(str::to_string),
            q: q.map(str::to_string),
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn category_filter_ignores_case_whitespace_and_empty_entries() {
        let filter = CategoryFilter::parse(Some(" Electronics ,, KITCHEN ,"));
        let seed = seed_catalog();
        assert!(seed.iter().all(|p| filter.matches(p)));

        let filter = CategoryFilter::parse(Some(" ,  ,"));
        assert!(filter.is_empty());
    }

    #[test]
    fn category_filter_variants_give_identical_results() {
        let seed = seed_catalog();
        let a = list_products(&seed, &query(Some("Electronics"), None, None, None));
        let b = list_products(&seed, &query(Some(" electronics "), None, None, None));
        assert_eq!(a, b);
        assert_eq!(ids(&a.data), vec!["1", "2"]);
    }

    #[test]
    fn name_search_is_case_insensitive_substring() {
        let seed = seed_catalog();
        let hits = seed.iter().filter(|p| name_matches(p, Some("PHONE"))).count();
        assert_eq!(hits, 1);
        assert!(seed.iter().all(|p| name_matches(p, Some(""))));
        assert!(seed.iter().all(|p| name_matches(p, None)));
    }

    #[test]
    fn filter_and_search_compose_conjunctively() {
        let seed = seed_catalog();
        let page = list_products(&seed, &query(Some("electronics"), Some("lap"), None, None));
        assert_eq!(ids(&page.data), vec!["1"]);

        let page = list_products(&seed, &query(Some("kitchen"), Some("lap"), None, None));
        assert!(page.data.is_empty());
        assert_eq!(page.metadata.total_pages, 1);
    }

    #[test]
    fn electronics_first_page_of_one() {
        let seed = seed_catalog();
        let page = list_products(&seed, &query(Some("electronics"), None, Some("1"), Some("1")));

        assert_eq!(
            page.metadata,
            PageMetadata {
                total: 2,
                total_pages: 2,
                page: 1,
                limit: 1
            }
        );
        assert_eq!(ids(&page.data), vec!["1"]);
    }

    #[test]
    fn repeated_keys_keep_their_first_value() {
        let pairs = [("page", "1"), ("page", "2"), ("category", "kitchen"), ("sort", "x"), ("category", "toys")]
            .map(|(k, v)| (k.to_string(), v.to_string()));
        let parsed = ListQuery::from_pairs(pairs);

        assert_eq!(parsed, query(Some("kitchen"), None, Some("1"), None));
    }

    #[test]
    fn pagination_coerces_bad_values_to_defaults() {
        assert_eq!(Pagination::from_raw(None, None), Pagination::default());
        assert_eq!(Pagination::from_raw(Some("abc"), Some("0")), Pagination::default());
        assert_eq!(Pagination::from_raw(Some("-2"), Some("")), Pagination::default());
        assert_eq!(
            Pagination::from_raw(Some("3xyz"), Some(" 5")),
            Pagination { page: 3, limit: 5 }
        );
    }

    #[test]
    fn out_of_range_page_is_empty_not_an_error() {
        let seed = seed_catalog();
        let page = list_products(&seed, &query(None, None, Some("9"), Some("2")));
        assert!(page.data.is_empty());
        assert_eq!(page.metadata.total, 3);
        assert_eq!(page.metadata.total_pages, 2);
        assert_eq!(page.metadata.page, 9);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let page = paginate(vec![1, 2, 3], Pagination::from_raw(Some("99999999999999999999999"), Some("10")));
        assert!(page.data.is_empty());
    }

    #[test]
    fn search_requires_a_term() {
        let seed = seed_catalog();
        for term in [None, Some("")] {
            match search_by_name(&seed, term) {
                Err(DomainError::Validation { details, .. }) => assert!(details.is_some()),
                other => panic!("expected validation error, got {other:?}"),
            }
        }

        let hits = search_by_name(&seed, Some("coffee")).unwrap();
        assert_eq!(ids(&hits), vec!["3"]);
    }

    mod proptest_tests {
        use super::*;
        use crate::test_support::catalog_strategy;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a page never exceeds `limit` and `totalPages` follows the ceil formula.
            #[test]
            fn page_is_bounded_by_limit(
                catalog in catalog_strategy(),
                page in 1usize..20,
                limit in 1usize..15,
            ) {
                let result = list_products(
                    &catalog,
                    &ListQuery {
                        page: Some(page.to_string()),
                        limit: Some(limit.to_string()),
                        ..ListQuery::default()
                    },
                );

                prop_assert!(result.data.len() <= limit);
                prop_assert_eq!(result.metadata.total, catalog.len());
                prop_assert_eq!(result.metadata.total_pages, catalog.len().div_ceil(limit).max(1));
            }

            /// Property: filtering an already-filtered set by the same criteria is a no-op.
            #[test]
            fn filtering_is_idempotent(
                catalog in catalog_strategy(),
                category in prop::sample::select(vec!["electronics", "kitchen", "toys,garden", ""]),
                q in "[a-z]{0,2}",
            ) {
                let everything = "1000000".to_string();
                let query = ListQuery {
                    category: Some(category.to_string()),
                    q: Some(q),
                    page: None,
                    limit: Some(everything),
                };

                let once = list_products(&catalog, &query).data;
                let twice = list_products(&once, &query).data;
                prop_assert_eq!(once, twice);
            }

            /// Property: category matching ignores case and surrounding whitespace.
            #[test]
            fn category_filter_is_case_and_space_insensitive(
                catalog in catalog_strategy(),
                category in prop::sample::select(vec!["electronics", "kitchen", "toys"]),
                pad in " {0,3}",
            ) {
                let plain = CategoryFilter::parse(Some(category));
                let noisy_raw = format!("{pad}{}{pad}", category.to_uppercase());
                let noisy = CategoryFilter::parse(Some(noisy_raw.as_str()));
                prop_assert_eq!(&plain, &noisy);
                for p in &catalog {
                    prop_assert_eq!(plain.matches(p), noisy.matches(p));
                }
            }
        }
    }
}
