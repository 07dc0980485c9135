//! Aggregate statistics over the whole (unfiltered) catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::product::Product;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_products: usize,
    /// Keyed by the category exactly as stored on the records.
    pub by_category_count: BTreeMap<String, usize>,
    pub in_stock_count: usize,
    pub out_of_stock_count: usize,
    /// `None` (serialised as `null`) when the catalog is empty.
    pub average_price: Option<f64>,
}

impl CatalogStats {
    pub fn compute(products: &[Product]) -> Self {
        let mut by_category_count = BTreeMap::new();
        let mut in_stock_count = 0;
        let mut price_sum = 0.0;

        for p in products {
            *by_category_count.entry(p.category().to_string()).or_insert(0) += 1;
            if p.in_stock() {
                in_stock_count += 1;
            }
            price_sum += p.price();
        }

        let total_products = products.len();
        let average_price = (total_products > 0).then(|| price_sum / total_products as f64);

        Self {
            total_products,
            by_category_count,
            in_stock_count,
            out_of_stock_count: total_products - in_stock_count,
            average_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::seed_catalog;

    #[test]
    fn seed_catalog_stats() {
        let stats = CatalogStats::compute(&seed_catalog());

        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.by_category_count.get("electronics"), Some(&2));
        assert_eq!(stats.by_category_count.get("kitchen"), Some(&1));
        assert_eq!(stats.in_stock_count, 2);
        assert_eq!(stats.out_of_stock_count, 1);

        let avg = stats.average_price.unwrap();
        assert!((avg - 683.333_333).abs() < 1e-3, "avg={avg}");
    }

    #[test]
    fn counts_are_consistent() {
        let stats = CatalogStats::compute(&seed_catalog());
        assert_eq!(stats.by_category_count.values().sum::<usize>(), stats.total_products);
        assert_eq!(stats.in_stock_count + stats.out_of_stock_count, stats.total_products);
    }

    #[test]
    fn empty_catalog_has_no_average() {
        let stats = CatalogStats::compute(&[]);
        assert_eq!(stats.total_products, 0);
        assert!(stats.by_category_count.is_empty());
        assert_eq!(stats.average_price, None);

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["averagePrice"].is_null());
        assert_eq!(json["outOfStockCount"], 0);
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

            /// Property: per-category counts and stock counts both add up to the total.
            #[test]
            fn counts_partition_the_catalog(catalog in catalog_strategy()) {
                let stats = CatalogStats::compute(&catalog);

                prop_assert_eq!(stats.total_products, catalog.len());
                prop_assert_eq!(stats.by_category_count.values().sum::<usize>(), stats.total_products);
                prop_assert_eq!(stats.in_stock_count + stats.out_of_stock_count, stats.total_products);
                prop_assert_eq!(stats.average_price.is_some(), !catalog.is_empty());
            }
        }
    }
}
