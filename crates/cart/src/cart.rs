use core::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storecart_core::{Aggregate, AggregateRoot, ProductId};
use storecart_events::Event;

use crate::line_item::LineItem;

/// Aggregate root: Cart.
///
/// An ordered, id-unique collection of [`LineItem`]s. New lines are appended;
/// quantity changes never move a line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<LineItem>,
    version: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a cart from previously persisted lines.
    ///
    /// Lines with a zero quantity are dropped and repeated ids are folded into
    /// the first occurrence (quantities summed), so the result always upholds
    /// the cart invariants whatever the input looked like.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut normalized: Vec<LineItem> = Vec::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match normalized.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => normalized.push(item),
            }
        }

        Self {
            items: normalized,
            version: 0,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price * quantity` over every line.
    ///
    /// Plain `f64` summation in line order. Prices are not rounded to a
    /// currency precision, so fractional prices can accumulate binary
    /// rounding error; integral prices (as the storefront lists them) are
    /// exact up to 2^53.
    pub fn total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Sum of all quantities, for badge display. Saturates at `u64::MAX`.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |count, item| count.saturating_add(item.quantity))
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

impl AggregateRoot for Cart {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddItem {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateQuantity.
///
/// `quantity` is signed: anything `<= 0` removes the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantity {
    pub id: ProductId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
    UpdateQuantity(UpdateQuantity),
    ClearCart(ClearCart),
}

/// Event: ItemAdded (a new line was appended).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: LineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityIncremented (an add merged into an existing line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityIncremented {
    pub id: ProductId,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged (explicit quantity update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub id: ProductId,
    pub quantity: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    QuantityIncremented(QuantityIncremented),
    ItemRemoved(ItemRemoved),
    QuantityChanged(QuantityChanged),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::QuantityIncremented(_) => "cart.item.quantity_incremented",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
            CartEvent::QuantityChanged(_) => "cart.item.quantity_changed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::QuantityIncremented(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = Infallible;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            CartEvent::QuantityIncremented(QuantityIncremented { id, quantity, .. })
            | CartEvent::QuantityChanged(QuantityChanged { id, quantity, .. }) => {
                if let Some(idx) = self.position(*id) {
                    self.items[idx].quantity = *quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.items.retain(|item| item.id != e.id);
            }
            CartEvent::CartCleared(_) => {
                self.items.clear();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        Ok(match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::RemoveItem(cmd) => self.handle_remove(cmd),
            CartCommand::UpdateQuantity(cmd) => self.handle_update_quantity(cmd),
            CartCommand::ClearCart(cmd) => self.handle_clear(cmd),
        })
    }
}

impl Cart {
    fn handle_add(&self, cmd: &AddItem) -> Vec<CartEvent> {
        // First-seen metadata wins: a repeat add only bumps the quantity.
        if let Some(existing) = self.get(cmd.id) {
            return vec![CartEvent::QuantityIncremented(QuantityIncremented {
                id: cmd.id,
                quantity: existing.quantity.saturating_add(1),
                occurred_at: cmd.occurred_at,
            })];
        }

        vec![CartEvent::ItemAdded(ItemAdded {
            item: LineItem::new(cmd.id, cmd.name.clone(), cmd.price, cmd.image.clone()),
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Vec<CartEvent> {
        if !self.contains(cmd.id) {
            return vec![];
        }

        vec![CartEvent::ItemRemoved(ItemRemoved {
            id: cmd.id,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_update_quantity(&self, cmd: &UpdateQuantity) -> Vec<CartEvent> {
        if !self.contains(cmd.id) {
            return vec![];
        }

        // Non-positive quantities delete the line rather than clamping it.
        match u64::try_from(cmd.quantity) {
            Ok(quantity) if quantity > 0 => {
                vec![CartEvent::QuantityChanged(QuantityChanged {
                    id: cmd.id,
                    quantity,
                    occurred_at: cmd.occurred_at,
                })]
            }
            _ => vec![CartEvent::ItemRemoved(ItemRemoved {
                id: cmd.id,
                occurred_at: cmd.occurred_at,
            })],
        }
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Vec<CartEvent> {
        if self.is_empty() {
            return vec![];
        }

        vec![CartEvent::CartCleared(CartCleared {
            occurred_at: cmd.occurred_at,
        })]
    }
}
