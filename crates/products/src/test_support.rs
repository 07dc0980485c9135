//! Generators shared by the property tests.

use proptest::prelude::*;

use storefront_core::ProductId;

use crate::product::{Product, ProductDraft};

/// Catalogs of up to 40 records with mixed-case categories and sequential ids.
pub(crate) fn catalog_strategy() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec(
        (
            "[A-Za-z ]{1,12}",
            prop::sample::select(vec!["electronics", "Kitchen", "TOYS", "garden"]),
            0.0f64..5000.0,
            any::<bool>(),
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (name, category, price, in_stock))| {
                ProductDraft {
                    name,
                    description: "generated".to_string(),
                    price,
                    category: category.to_string(),
                    in_stock,
                }
                .into_product(ProductId::from(i.to_string().as_str()))
            })
            .collect()
    })
}
