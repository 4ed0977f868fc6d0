//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity; two instances with the same attribute
/// values are interchangeable. Notifications and badge state are value
/// objects, while a cart line is an entity keyed by its product id.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
