//! Domain events, UI signals and the plumbing that delivers them.

pub mod bus;
pub mod event;
pub mod in_memory_bus;
pub mod listener;
pub mod notification;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use listener::{BusListener, ChangeListener, ListenerId, ListenerRegistry};
pub use notification::{Notification, NotificationKind, UiSignal};
