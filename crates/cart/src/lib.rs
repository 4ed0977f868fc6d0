//! Shopping cart domain module.
//!
//! This crate contains the cart's business rules, implemented purely as
//! deterministic domain logic (no IO, no rendering, no storage).

pub mod badge;
pub mod cart;
pub mod line_item;

pub use badge::Badge;
pub use cart::{
    AddItem, Cart, CartCleared, CartCommand, CartEvent, ClearCart, ItemAdded, ItemRemoved,
    QuantityChanged, QuantityIncremented, RemoveItem, UpdateQuantity,
};
pub use line_item::LineItem;
