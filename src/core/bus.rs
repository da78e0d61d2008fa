//! Workspace-scoped multicast event channel.
//!
//! Dispatch is synchronous and depth-first: a handler may publish further
//! events, and those are fully delivered before the outer dispatch resumes.
//! Each publish iterates a snapshot of the registration list, so handlers may
//! subscribe or unsubscribe (including themselves) mid-dispatch without
//! corrupting the list; subscribers removed during a dispatch are skipped.

use std::cell::RefCell;
use std::rc::Rc;

use super::event::Event;

pub type Handler = Rc<dyn Fn(&EventBus, &Event)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct BusInner {
    next_id: u64,
    subscribers: Vec<(SubscriberId, Handler)>,
}

#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn subscribe(&self, handler: impl Fn(&EventBus, &Event) + 'static) -> SubscriberId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriberId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(handler)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Delivers `event` to every live subscriber in registration order.
    pub fn publish(&self, event: Event) {
        tracing::trace!(kind = ?event.kind, arg1 = %event.arg1, "publish");

        let snapshot: Vec<(SubscriberId, Handler)> =
            self.inner.borrow().subscribers.to_vec();

        for (id, handler) in snapshot {
            let live = self
                .inner
                .borrow()
                .subscribers
                .iter()
                .any(|(sid, _)| *sid == id);
            if live {
                handler(self, &event);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/bus.rs"]
mod tests;
