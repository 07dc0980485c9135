use serde::{Deserialize, Serialize};

use storefront_products::{Product, ProductDraft};

// -------------------------
// Request DTOs
// -------------------------

/// `POST /products` body. `id` is optional; the server generates one when absent.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub id: Option<String>,
    #[serde(flatten)]
    pub product: ProductDraft,
}

/// `PUT /products/:id` body: every mutable field, replaced wholesale.
pub type UpdateProductRequest = ProductDraft;

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

impl SearchQuery {
    /// First `name` wins when the key is repeated.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let name = pairs.into_iter().find_map(|(k, v)| (k == "name").then_some(v));
        Self { name }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub message: &'static str,
    pub product: Product,
}

impl DeleteProductResponse {
    pub fn new(product: Product) -> Self {
        Self {
            message: "Product deleted successfully",
            product,
        }
    }
}
