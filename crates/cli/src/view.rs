//! Plain-text rendering of catalog, cart and notifications.

use std::fmt::Write as _;

use storecart_cart::{Badge, LineItem};
use storecart_events::Notification;
use storecart_products::Product;

pub fn notification(notification: &Notification) -> String {
    format!("[{}] {}", notification.kind, notification.message)
}

pub fn badge(badge: Badge) -> String {
    if badge.visible {
        format!("cart ({})", badge.count)
    } else {
        "cart".to_string()
    }
}

pub fn catalog<'a>(products: impl IntoIterator<Item = &'a Product>) -> String {
    let mut out = String::new();
    for p in products {
        let _ = writeln!(
            out,
            "{:>3}  {:<20} {:>10.2}  {}",
            p.id, p.name, p.price, p.category
        );
    }
    out
}

pub fn cart(items: &[LineItem], total: f64) -> String {
    if items.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:>3}  {:<20} {:>4} x {:>10.2} = {:>12.2}",
            item.id,
            item.name,
            item.quantity,
            item.price,
            item.subtotal()
        );
    }
    let _ = writeln!(out, "{:>58}", format!("total {total:.2}"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use storecart_core::ProductId;
    use storecart_products::Catalog;

    #[test]
    fn empty_cart_has_a_message() {
        assert_eq!(cart(&[], 0.0), "Your cart is empty.\n");
    }

    #[test]
    fn cart_lists_lines_and_total() {
        let items = vec![
            LineItem::new(ProductId::new(1), "Premium Headphones", 2999.0, "").with_quantity(1),
            LineItem::new(ProductId::new(8), "Phone Case", 499.0, "").with_quantity(3),
        ];

        let rendered = cart(&items, 4496.0);

        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("Phone Case"));
        assert!(rendered.contains("1497.00"));
        assert!(rendered.trim_end().ends_with("total 4496.00"));
    }

    #[test]
    fn catalog_has_one_line_per_product() {
        let catalog = Catalog::storefront();
        assert_eq!(super::catalog(catalog.iter()).lines().count(), 12);
    }

    #[test]
    fn badge_hides_count_when_empty() {
        assert_eq!(badge(Badge { count: 0, visible: false }), "cart");
        assert_eq!(badge(Badge { count: 4, visible: true }), "cart (4)");
    }

    #[test]
    fn notifications_show_their_kind() {
        assert_eq!(
            notification(&Notification::success("Product added to cart!")),
            "[success] Product added to cart!"
        );
    }
}
