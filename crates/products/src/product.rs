use serde::{Deserialize, Serialize};

use storecart_core::{Entity, ProductId};

/// Storefront department a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Fashion,
    Food,
    Handicraft,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Fashion => "Fashion",
            Category::Food => "Food",
            Category::Handicraft => "Handicraft",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price in the storefront's display unit.
    pub price: f64,
    pub image: String,
    pub category: Category,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: f64,
        image: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: image.into(),
            category,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
