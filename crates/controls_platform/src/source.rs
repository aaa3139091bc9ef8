//! Input source abstraction
//!
//! An [`InputSource`] is the capability a dispatcher subscribes to. Hosts
//! implement it over their native event delivery; tests use the in-memory
//! [`EventBus`](crate::EventBus).

use std::rc::Rc;

use slotmap::new_key_type;

use crate::input::{KeyboardEvent, Phase, PointerEvent, TargetId};

new_key_type! {
    /// Handle to a registered listener, used to unsubscribe
    pub struct ListenerId;
}

/// Listener for global keyboard events
///
/// Uses Rc since input delivery is single-threaded.
pub type KeyListener = Rc<dyn Fn(&KeyboardEvent)>;

/// Listener for pointer events on one target
///
/// Receives the event mutably so it can prevent the default action.
pub type PointerListener = Rc<dyn Fn(&mut PointerEvent)>;

/// A single-threaded stream of keyboard and pointer events
///
/// Sources must deliver events one at a time: a listener must never be
/// invoked while another listener of the same source is still running.
pub trait InputSource {
    /// Subscribe to global key events of one phase
    fn add_key_listener(&self, phase: Phase, listener: KeyListener) -> ListenerId;

    /// Subscribe to pointer events of one phase on one target
    fn add_pointer_listener(
        &self,
        target: TargetId,
        phase: Phase,
        listener: PointerListener,
    ) -> ListenerId;

    /// Unsubscribe a listener
    ///
    /// Returns `false` if the id is unknown (already removed).
    fn remove_listener(&self, id: ListenerId) -> bool;
}
