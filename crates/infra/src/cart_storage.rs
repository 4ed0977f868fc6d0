//! Durable storage adapter for the cart.
//!
//! Persists the cart's lines as a JSON array under a single key. Loading fails
//! open: anything unreadable comes back as an empty cart.

use storecart_cart::{Cart, LineItem};

use crate::storage::{KeyValueStore, StorageError};

/// Key the storefront page has always used for its cart blob.
pub const DEFAULT_STORAGE_KEY: &str = "cart";

#[derive(Debug, Clone)]
pub struct CartStorage<K> {
    store: K,
    key: String,
}

impl<K> CartStorage<K> {
    pub fn new(store: K) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: K, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &K {
        &self.store
    }
}

impl<K> CartStorage<K>
where
    K: KeyValueStore,
{
    /// Read the persisted cart.
    ///
    /// A missing blob, a read failure or a blob that does not decode as a
    /// list of lines all yield an empty cart. Decoded lines are normalized
    /// (see [`Cart::from_items`]).
    pub fn load(&self) -> Cart {
        let blob = match self.store.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no saved cart; starting empty");
                return Cart::new();
            }
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "failed to read saved cart; starting empty");
                return Cart::new();
            }
        };

        match serde_json::from_str::<Option<Vec<LineItem>>>(&blob) {
            Ok(items) => {
                let cart = Cart::from_items(items.unwrap_or_default());
                tracing::debug!(key = %self.key, items = cart.len(), "restored saved cart");
                cart
            }
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "saved cart is malformed; starting empty");
                Cart::new()
            }
        }
    }

    /// Overwrite the persisted cart with the full current collection.
    pub fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let blob = serde_json::to_string(cart.items())?;
        self.store.set(&self.key, &blob)?;
        tracing::debug!(key = %self.key, items = cart.len(), bytes = blob.len(), "saved cart");
        Ok(())
    }

    /// Drop the persisted cart entirely.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore, file::scratch_dir};
    use storecart_core::ProductId;

    fn storage() -> CartStorage<InMemoryKeyValueStore> {
        CartStorage::new(InMemoryKeyValueStore::new())
    }

    #[test]
    fn missing_blob_loads_empty() {
        assert!(storage().load().is_empty());
    }

    #[test]
    fn malformed_blobs_load_empty() {
        let storage = storage();
        for blob in ["not json", "{\"id\":1}", "[{\"id\":\"x\"}]", "[{\"id\":1,\"quantity\":-2}]"] {
            storage.store().set(DEFAULT_STORAGE_KEY, blob).unwrap();
            assert!(storage.load().is_empty(), "blob {blob:?} should load empty");
        }
    }

    #[test]
    fn null_blob_loads_empty() {
        let storage = storage();
        storage.store().set(DEFAULT_STORAGE_KEY, "null").unwrap();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn read_failures_load_empty() {
        let dir = scratch_dir();
        assert!(CartStorage::with_key(FileKeyValueStore::new(&dir), "../cart").load().is_empty());

        std::fs::create_dir_all(dir.join("cart.json")).unwrap();
        let storage = CartStorage::new(FileKeyValueStore::new(&dir));
        assert!(matches!(
            storage.store().get(DEFAULT_STORAGE_KEY),
            Err(StorageError::Read { .. })
        ));
        assert!(storage.load().is_empty());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn non_finite_prices_do_not_discard_other_lines() {
        let storage = storage();
        let cart = Cart::from_items(vec![
            LineItem::new(ProductId::new(1), "Premium Headphones", 2999.0, "h.jpg"),
            LineItem::new(ProductId::new(2), "bad", f64::NAN, ""),
            LineItem::new(ProductId::new(3), "worse", f64::INFINITY, "").with_quantity(2),
        ]);

        storage.save(&cart).unwrap();
        let blob = storage.store().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(blob.contains(r#""price":null"#));

        let restored = storage.load();
        let ids: Vec<u64> = restored.items().iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(restored.get(ProductId::new(1)).unwrap().price, 2999.0);
        assert!(restored.get(ProductId::new(2)).unwrap().price.is_nan());
        assert!(restored.get(ProductId::new(3)).unwrap().price.is_nan());
        assert_eq!(restored.get(ProductId::new(3)).unwrap().quantity, 2);
    }

    #[test]
    fn reads_blobs_written_by_the_storefront_page() {
        let storage = storage();
        let blob = r#"[{"id":1,"name":"Premium Headphones","price":2999,"image":"images/product-1.jpg","quantity":2}]"#;
        storage.store().set(DEFAULT_STORAGE_KEY, blob).unwrap();

        let cart = storage.load();
        let line = cart.get(ProductId::new(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.price, 2999.0);
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = storage();
        let cart = Cart::from_items(vec![
            LineItem::new(ProductId::new(5), "Designer Bag", 3499.0, "b.jpg").with_quantity(2),
            LineItem::new(ProductId::new(1), "Premium Headphones", 2999.0, "h.jpg"),
        ]);

        storage.save(&cart).unwrap();

        assert_eq!(storage.load().items(), cart.items());
    }

    #[test]
    fn custom_keys_are_independent() {
        let store = std::sync::Arc::new(InMemoryKeyValueStore::new());
        let a = CartStorage::with_key(store.clone(), "cart-a");
        let b = CartStorage::with_key(store, "cart-b");

        a.save(&Cart::from_items(vec![LineItem::new(ProductId::new(1), "x", 1.0, "")]))
            .unwrap();

        assert_eq!(a.load().len(), 1);
        assert!(b.load().is_empty());
    }

    #[test]
    fn save_surfaces_quota_errors() {
        let storage = CartStorage::new(InMemoryKeyValueStore::with_quota(8));
        let cart = Cart::from_items(vec![LineItem::new(ProductId::new(1), "x", 1.0, "")]);

        assert!(matches!(
            storage.save(&cart),
            Err(StorageError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn clear_removes_the_blob() {
        let storage = storage();
        storage
            .save(&Cart::from_items(vec![LineItem::new(ProductId::new(1), "x", 1.0, "")]))
            .unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.store().get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }
}
