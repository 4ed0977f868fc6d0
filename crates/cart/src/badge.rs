use serde::{Deserialize, Serialize};

use storecart_core::ValueObject;

use crate::cart::Cart;

/// Cart indicator state: total quantity, hidden when the cart is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub count: u64,
    pub visible: bool,
}

impl Badge {
    pub fn for_cart(cart: &Cart) -> Self {
        let count = cart.item_count();
        Self {
            count,
            visible: count > 0,
        }
    }
}

impl ValueObject for Badge {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::LineItem;
    use storecart_core::ProductId;

    #[test]
    fn hidden_for_empty_cart() {
        assert_eq!(
            Badge::for_cart(&Cart::new()),
            Badge {
                count: 0,
                visible: false
            }
        );
    }

    #[test]
    fn counts_quantities_not_lines() {
        let cart = Cart::from_items(vec![
            LineItem::new(ProductId::new(1), "a", 1.0, "").with_quantity(2),
            LineItem::new(ProductId::new(2), "b", 1.0, "").with_quantity(3),
        ]);
        let badge = Badge::for_cart(&cart);
        assert_eq!(badge.count, 5);
        assert!(badge.visible);
    }
}
