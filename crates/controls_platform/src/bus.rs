//! In-memory input source
//!
//! [`EventBus`] keeps listeners in a slot map and delivers events to them in
//! registration order. Hosts push native events into it; tests use it as a
//! fake event stream.
//!
//! # Serialized delivery
//!
//! Events dispatched while another event is being delivered (for example from
//! inside a listener) are queued and delivered once the current event is
//! done. Listeners therefore always run to completion before the next event
//! starts.
//!
//! ```text
//! dispatch(A) ──► listener 1 ──► dispatch(B)  (queued)
//!             ──► listener 2
//!             ──► drain queue ──► deliver B
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use slotmap::SlotMap;

use crate::input::{InputEvent, KeyCode, KeyboardEvent, Phase, PointerEvent, TargetId};
use crate::source::{InputSource, KeyListener, ListenerId, PointerListener};

/// A registered listener and the events it is scoped to
#[derive(Clone)]
enum Listener {
    Key {
        phase: Phase,
        callback: KeyListener,
    },
    Pointer {
        target: TargetId,
        phase: Phase,
        callback: PointerListener,
    },
}

/// Single-threaded in-memory event source
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<SlotMap<ListenerId, Listener>>,
    /// Registration order (slot map iteration order is not insertion order)
    order: RefCell<Vec<ListenerId>>,
    pending: RefCell<VecDeque<InputEvent>>,
    dispatching: Cell<bool>,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Whether an event is currently being delivered
    pub fn is_dispatching(&self) -> bool {
        self.dispatching.get()
    }

    /// Deliver an event to every matching listener
    ///
    /// Returns whether a listener prevented the default action. Events
    /// dispatched re-entrantly are queued and this returns `false` for them.
    pub fn dispatch(&self, event: InputEvent) -> bool {
        if self.dispatching.get() {
            tracing::trace!("queueing {:?} event dispatched during delivery", event.phase());
            self.pending.borrow_mut().push_back(event);
            return false;
        }

        let _guard = DispatchGuard::enter(self);
        let prevented = self.deliver(event);

        loop {
            // Release the borrow before delivering so listeners can queue more
            let next = self.pending.borrow_mut().pop_front();
            match next {
                Some(queued) => {
                    self.deliver(queued);
                }
                None => break,
            }
        }

        prevented
    }

    /// Dispatch a key-down event for `code`
    pub fn key_down(&self, code: impl Into<KeyCode>) {
        self.dispatch(InputEvent::Key(KeyboardEvent::down(code)));
    }

    /// Dispatch a key-up event for `code`
    pub fn key_up(&self, code: impl Into<KeyCode>) {
        self.dispatch(InputEvent::Key(KeyboardEvent::up(code)));
    }

    /// Dispatch a primary-button pointer-down on `target`
    ///
    /// Returns whether the default action was prevented.
    pub fn pointer_down(&self, target: TargetId) -> bool {
        self.dispatch(InputEvent::Pointer(PointerEvent::down(target)))
    }

    /// Dispatch a primary-button pointer-up on `target`
    ///
    /// Returns whether the default action was prevented.
    pub fn pointer_up(&self, target: TargetId) -> bool {
        self.dispatch(InputEvent::Pointer(PointerEvent::up(target)))
    }

    fn deliver(&self, event: InputEvent) -> bool {
        // Snapshot first so listeners may subscribe or unsubscribe while running
        let snapshot: Vec<(ListenerId, Listener)> = {
            let listeners = self.listeners.borrow();
            self.order
                .borrow()
                .iter()
                .filter_map(|id| listeners.get(*id).map(|l| (*id, l.clone())))
                .collect()
        };

        match event {
            InputEvent::Key(event) => {
                for (id, listener) in snapshot {
                    if let Listener::Key { phase, callback } = listener {
                        if phase == event.phase && self.is_registered(id) {
                            callback(&event);
                        }
                    }
                }
                false
            }
            InputEvent::Pointer(mut event) => {
                for (id, listener) in snapshot {
                    if let Listener::Pointer {
                        target,
                        phase,
                        callback,
                    } = listener
                    {
                        if target == event.target
                            && phase == event.phase
                            && self.is_registered(id)
                        {
                            callback(&mut event);
                        }
                    }
                }
                event.default_prevented()
            }
        }
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.borrow().contains_key(id)
    }

    fn insert(&self, listener: Listener) -> ListenerId {
        let id = self.listeners.borrow_mut().insert(listener);
        self.order.borrow_mut().push(id);
        id
    }
}

/// Marks the bus as dispatching until dropped
///
/// Also runs when a listener panics, so a caught panic leaves the bus usable.
/// Events queued by the interrupted delivery are discarded.
struct DispatchGuard<'a> {
    bus: &'a EventBus,
}

impl<'a> DispatchGuard<'a> {
    fn enter(bus: &'a EventBus) -> Self {
        bus.dispatching.set(true);
        Self { bus }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.bus.dispatching.set(false);
        if let Ok(mut pending) = self.bus.pending.try_borrow_mut() {
            if !pending.is_empty() {
                tracing::warn!("Dropping {} queued input events after a failed dispatch", pending.len());
                pending.clear();
            }
        }
    }
}

impl InputSource for EventBus {
    fn add_key_listener(&self, phase: Phase, listener: KeyListener) -> ListenerId {
        self.insert(Listener::Key {
            phase,
            callback: listener,
        })
    }

    fn add_pointer_listener(
        &self,
        target: TargetId,
        phase: Phase,
        listener: PointerListener,
    ) -> ListenerId {
        self.insert(Listener::Pointer {
            target,
            phase,
            callback: listener,
        })
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.listeners.borrow_mut().remove(id).is_some();
        if removed {
            self.order.borrow_mut().retain(|existing| *existing != id);
        }
        removed
    }
}
