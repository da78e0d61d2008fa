//! Core framework: the typed event record and the multicast bus that
//! decouples the explorer tree, the save coordinator and the shell.

pub mod bus;
pub mod event;

pub use bus::{EventBus, SubscriberId};
pub use event::{Event, EventKind};
