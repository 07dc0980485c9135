use serde::{Deserialize, Serialize};

use storefront_core::{Entity, ProductId};

/// Catalog record.
///
/// `id` is assigned once at creation and never changes; everything else is
/// replaced wholesale by [`Product::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: f64,
    category: String,
    in_stock: bool,
}

/// The mutable fields of a product (everything except its id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl ProductDraft {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock,
        }
    }
}

impl Product {
    pub fn new(id: ProductId, draft: ProductDraft) -> Self {
        draft.into_product(id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    /// Replace every mutable field with the draft's values. The id is preserved.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.category = draft.category;
        self.in_stock = draft.in_stock;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn seeded(id: &str, name: &str, description: &str, price: f64, category: &str, in_stock: bool) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        in_stock,
    }
}

/// The catalog every process starts with.
pub fn seed_catalog() -> Vec<Product> {
    vec![
        seeded("1", "Laptop", "High-performance laptop with 16GB RAM", 1200.0, "electronics", true),
        seeded("2", "Smartphone", "Latest model with 128GB storage", 800.0, "electronics", true),
        seeded("3", "Coffee Maker", "Programmable coffee maker with timer", 50.0, "kitchen", false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: "desc".to_string(),
            price: 10.0,
            category: "tools".to_string(),
            in_stock: false,
        }
    }

    #[test]
    fn apply_replaces_fields_but_keeps_id() {
        let mut product = Product::new(ProductId::from("42"), draft("Hammer"));
        product.apply(draft("Mallet"));

        assert_eq!(product.id().as_str(), "42");
        assert_eq!(product.name(), "Mallet");
    }

    #[test]
    fn serializes_in_camel_case() {
        let product = Product::new(ProductId::from("1"), draft("Hammer"));
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["id"], "1");
        assert_eq!(json["inStock"], false);
        assert!(json.get("in_stock").is_none());
    }

    #[test]
    fn seed_catalog_has_unique_ids() {
        let seed = seed_catalog();
        assert_eq!(seed.len(), 3);
        let ids: BTreeSet<_> = seed.iter().map(|p| p.id().clone()).collect();
        assert_eq!(ids.len(), seed.len());
    }
}
