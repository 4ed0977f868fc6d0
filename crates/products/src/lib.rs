//! Products available on the storefront.
//!
//! The catalog is static fixture data; the cart copies what it needs from a
//! product at add time and never looks back.

pub mod catalog;
pub mod product;

pub use catalog::Catalog;
pub use product::{Category, Product};
