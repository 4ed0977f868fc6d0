use serde::{Deserialize, Deserializer, Serialize};

use storecart_core::{Entity, ProductId};
use storecart_products::Product;

/// One product the shopper has selected, with a quantity.
///
/// `quantity` is at least 1 for any line held by a [`Cart`](crate::Cart).
/// Name, price and image are copied in when the line is first created and are
/// never validated. A non-finite price is written as `null` and read back as
/// NaN, so one odd line never makes the rest of a saved cart unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(deserialize_with = "price_or_nan")]
    pub price: f64,
    pub image: String,
    pub quantity: u64,
}

fn price_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl LineItem {
    pub fn new(id: ProductId, name: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: image.into(),
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: u64) -> Self {
        self.quantity = quantity;
        self
    }

    /// `price * quantity` in floating point.
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

impl From<&Product> for LineItem {
    fn from(product: &Product) -> Self {
        Self::new(product.id, product.name.clone(), product.price, product.image.clone())
    }
}

impl Entity for LineItem {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storecart_products::Catalog;

    #[test]
    fn subtotal_multiplies_price_by_quantity() {
        let line = LineItem::new(ProductId::new(8), "Phone Case", 499.0, "").with_quantity(3);
        assert_eq!(line.subtotal(), 1497.0);
    }

    #[test]
    fn lines_built_from_products_start_at_one() {
        let catalog = Catalog::storefront();
        let line = LineItem::from(catalog.get(ProductId::new(1)).unwrap());
        assert_eq!(line.quantity, 1);
        assert_eq!(line.name, "Premium Headphones");
        assert_eq!(line.image, "images/product-1.jpg");
    }

    #[test]
    fn serializes_to_storefront_shape() {
        let line = LineItem::new(ProductId::new(2), "Smart Watch", 4999.0, "images/product-2.jpg");
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 2,
                "name": "Smart Watch",
                "price": 4999.0,
                "image": "images/product-2.jpg",
                "quantity": 1
            })
        );
    }
}
