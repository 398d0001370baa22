//! Read-only product catalog and the routine prompt built from a selection

use serde::{Deserialize, Serialize};

pub type ProductId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Decode a `{ "products": [...] }` document
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in `category`, catalog order. An empty category shows nothing.
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        if category.is_empty() {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Resolve ids in the given order, skipping unknown ones
    pub fn resolve<'a>(&'a self, ids: &[ProductId]) -> Vec<&'a Product> {
        ids.iter().filter_map(|id| self.find(*id)).collect()
    }
}

/// User turn sent when asking for a routine over the selected products
pub fn routine_prompt(products: &[&Product]) -> String {
    let lines = products
        .iter()
        .map(|p| {
            format!(
                "- {} — {} (category: {}). {}",
                p.brand, p.name, p.category, p.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Create a concise personalized routine using these selected products:\n{}",
        lines
    )
}
