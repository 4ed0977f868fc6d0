use storecart_core::{DomainError, DomainResult, ProductId};

use crate::product::{Category, Product};

/// Ordered product listing with lookup by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The storefront's built-in product listing.
    pub fn storefront() -> Self {
        use Category::*;

        let listing = |id: u64, name: &str, price: f64, image: &str, category: Category| {
            Product::new(ProductId::new(id), name, price, image, category)
        };

        Self::new(vec![
            listing(1, "Premium Headphones", 2999.0, "images/product-1.jpg", Electronics),
            listing(2, "Smart Watch", 4999.0, "images/product-2.jpg", Electronics),
            listing(3, "Running Shoes", 2499.0, "images/product-3.jpg", Fashion),
            listing(4, "Wireless Speaker", 1999.0, "images/product-4.jpg", Electronics),
            listing(5, "Designer Bag", 3499.0, "images/product-5.jpg", Fashion),
            listing(6, "Sunglasses", 1299.0, "images/product-6.jpg", Fashion),
            listing(7, "Laptop Stand", 899.0, "images/product-7.jpg", Electronics),
            listing(8, "Phone Case", 499.0, "images/product-8.jpg", Electronics),
            listing(9, "Traditional Saree", 3999.0, "images/bd-product-saree.jpg", Fashion),
            listing(10, "Premium Tea", 299.0, "images/bd-product-tea.jpg", Food),
            listing(11, "Jute Bag", 499.0, "images/bd-product-jute-bag.jpg", Handicraft),
            listing(12, "Jamdani Saree", 5999.0, "images/bd-product-jamdani.jpg", Fashion),
        ])
    }

    pub fn get(&self, id: ProductId) -> DomainResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| p.category == category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_catalog_has_unique_ids() {
        let catalog = Catalog::storefront();
        let mut ids: Vec<_> = catalog.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(catalog.len(), 12);
    }

    #[test]
    fn get_returns_not_found_for_unknown_id() {
        let catalog = Catalog::storefront();
        assert_eq!(catalog.get(ProductId::new(8)).unwrap().name, "Phone Case");

        let err = catalog.get(ProductId::new(999)).unwrap_err();
        assert_eq!(err, DomainError::NotFound("product 999".to_string()));
    }

    #[test]
    fn filters_by_category_in_listing_order() {
        let catalog = Catalog::storefront();
        let fashion: Vec<_> = catalog
            .by_category(Category::Fashion)
            .map(|p| p.id.get())
            .collect();
        assert_eq!(fashion, vec![3, 5, 6, 9, 12]);
    }

    #[test]
    fn products_serialize_with_numeric_ids() {
        let catalog = Catalog::storefront();
        let json = serde_json::to_value(catalog.get(ProductId::new(10)).unwrap()).unwrap();
        assert_eq!(json["id"], 10);
        assert_eq!(json["category"], "Food");
    }
}
