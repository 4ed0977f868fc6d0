//! The cart store: authoritative in-memory cart plus write-through persistence.
//!
//! Every mutator runs the same pipeline:
//!
//! ```text
//! CartCommand
//!   ↓
//! 1. Cart::execute (pure decision + apply)
//!   ↓
//! 2. CartStorage::save (failures logged, never returned)
//!   ↓
//! 3. Listeners receive a CartChange (events + UI signals + badge)
//! ```
//!
//! The in-memory cart stays the source of truth when a write is refused, so
//! reads keep working for the rest of the session and only a reload can lose
//! the unsaved changes.

use chrono::Utc;
use serde::Serialize;

use storecart_cart::{
    AddItem, Badge, Cart, CartCommand, CartEvent, ClearCart, LineItem, RemoveItem,
    UpdateQuantity,
};
use storecart_core::{Aggregate, ProductId};
use storecart_events::{ChangeListener, ListenerId, ListenerRegistry, Notification, UiSignal};
use storecart_products::Product;

use crate::cart_storage::CartStorage;
use crate::storage::KeyValueStore;

pub const ITEM_ADDED_MESSAGE: &str = "Product added to cart!";
pub const ITEM_REMOVED_MESSAGE: &str = "Product removed from cart!";

/// What a single store operation did, delivered to every listener.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartChange {
    /// Domain events applied by the operation (empty for no-ops and reloads).
    pub events: Vec<CartEvent>,
    /// Presentation requests, in the order they should be handled.
    pub signals: Vec<UiSignal>,
    /// Badge state after the operation.
    pub badge: Badge,
    /// Cart total after the operation.
    pub total: f64,
}

impl CartChange {
    pub fn notification(&self) -> Option<&Notification> {
        self.signals.iter().find_map(|signal| match signal {
            UiSignal::Notify(notification) => Some(notification),
            UiSignal::RefreshView => None,
        })
    }

    pub fn requests_refresh(&self) -> bool {
        self.signals.contains(&UiSignal::RefreshView)
    }
}

/// Shopping cart state owned by one browsing context.
///
/// Construct one per context; nothing here is global. The store borrows
/// mutably for every mutation, so callers always read a fresh snapshot after
/// each call.
#[derive(Debug)]
pub struct CartStore<K> {
    storage: CartStorage<K>,
    cart: Cart,
    listeners: ListenerRegistry<CartChange>,
}

impl<K> CartStore<K>
where
    K: KeyValueStore,
{
    /// Restore the cart from storage (empty if nothing usable is saved).
    pub fn open(storage: CartStorage<K>) -> Self {
        let cart = storage.load();
        tracing::debug!(key = storage.key(), items = cart.len(), "cart store opened");
        Self {
            storage,
            cart,
            listeners: ListenerRegistry::new(),
        }
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart only has its quantity bumped; the name,
    /// price and image recorded on first add are kept.
    pub fn add_item(
        &mut self,
        id: ProductId,
        name: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Vec<CartEvent> {
        let events = self.dispatch(CartCommand::AddItem(AddItem {
            id,
            name: name.into(),
            price,
            image: image.into(),
            occurred_at: Utc::now(),
        }));
        self.persist();
        self.publish(
            events,
            vec![UiSignal::Notify(Notification::success(ITEM_ADDED_MESSAGE))],
        )
    }

    pub fn add_product(&mut self, product: &Product) -> Vec<CartEvent> {
        let line = LineItem::from(product);
        self.add_item(line.id, line.name, line.price, line.image)
    }

    /// Remove a product's line. Absent ids leave the cart untouched but still
    /// persist and signal, matching what the storefront page has always done.
    pub fn remove_item(&mut self, id: ProductId) -> Vec<CartEvent> {
        let events = self.dispatch(CartCommand::RemoveItem(RemoveItem {
            id,
            occurred_at: Utc::now(),
        }));
        self.persist();
        self.publish(
            events,
            vec![
                UiSignal::RefreshView,
                UiSignal::Notify(Notification::info(ITEM_REMOVED_MESSAGE)),
            ],
        )
    }

    /// Set a line's quantity exactly; `<= 0` behaves as [`remove_item`].
    ///
    /// Unknown ids are ignored entirely: nothing is saved and no listener runs.
    ///
    /// [`remove_item`]: CartStore::remove_item
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Vec<CartEvent> {
        if !self.cart.contains(id) {
            return Vec::new();
        }
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let events = self.dispatch(CartCommand::UpdateQuantity(UpdateQuantity {
            id,
            quantity,
            occurred_at: Utc::now(),
        }));
        self.persist();
        self.publish(events, vec![UiSignal::RefreshView])
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> Vec<CartEvent> {
        let events = self.dispatch(CartCommand::ClearCart(ClearCart {
            occurred_at: Utc::now(),
        }));
        self.persist();
        self.publish(events, vec![UiSignal::RefreshView])
    }

    /// Discard in-memory state and re-read storage, as a page reload would.
    pub fn reload(&mut self) {
        self.cart = self.storage.load();
        self.publish(Vec::new(), vec![UiSignal::RefreshView]);
    }

    fn dispatch(&mut self, command: CartCommand) -> Vec<CartEvent> {
        let Ok(events) = self.cart.execute(&command);
        events
    }

    fn persist(&self) {
        if let Err(error) = self.storage.save(&self.cart) {
            tracing::warn!(
                key = self.storage.key(),
                %error,
                "failed to persist cart; keeping in-memory state"
            );
        }
    }

    fn publish(&mut self, events: Vec<CartEvent>, signals: Vec<UiSignal>) -> Vec<CartEvent> {
        if self.listeners.is_empty() {
            return events;
        }

        let change = CartChange {
            events,
            signals,
            badge: self.badge(),
            total: self.total(),
        };
        self.listeners.notify(&change);
        change.events
    }
}

impl<K> CartStore<K> {
    /// Register a listener invoked after every mutation (and reload).
    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: ChangeListener<CartChange> + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Sum of `price * quantity`; see [`Cart::total`] for precision notes.
    pub fn total(&self) -> f64 {
        self.cart.total()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn badge(&self) -> Badge {
        Badge::for_cart(&self.cart)
    }

    /// Lines in display order. The borrow ends before the next mutation.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Owned copy of the lines in display order.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.cart.items().to_vec()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn storage(&self) -> &CartStorage<K> {
        &self.storage
    }
}
