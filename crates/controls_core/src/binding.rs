//! Key and pointer bindings
//!
//! A binding associates an input (a key code or a pointer target) with up to
//! two callbacks: one for press and one for release. Bindings are built with
//! the builder methods below and become immutable once handed to a
//! [`ControlsManager`](crate::ControlsManager).
//!
//! ```
//! use controls_core::{KeyBinding, PointerBinding};
//! use controls_platform::TargetId;
//!
//! let jump = KeyBinding::new("Space").on_down(|score: &mut u32| *score += 1);
//! let fire = PointerBinding::new(TargetId::new(1))
//!     .suppress_default(true)
//!     .on_up(|event| println!("released at {}, {}", event.x, event.y));
//! # let _ = (jump, fire);
//! ```

use std::fmt;
use std::rc::Rc;

use controls_platform::{KeyCode, PointerEvent, TargetId};

/// Callback for key bindings
///
/// Receives the dispatcher's context. Uses Rc since dispatch is
/// single-threaded.
pub type KeyCallback<C> = Rc<dyn Fn(&mut C)>;

/// Callback for pointer bindings
///
/// Receives the raw pointer event.
pub type PointerCallback = Rc<dyn Fn(&mut PointerEvent)>;

/// Binds a key code to press and release callbacks
pub struct KeyBinding<C> {
    key: KeyCode,
    on_down: Option<KeyCallback<C>>,
    on_up: Option<KeyCallback<C>>,
}

impl<C> KeyBinding<C> {
    /// Create a binding for `key` with no callbacks
    pub fn new(key: impl Into<KeyCode>) -> Self {
        Self {
            key: key.into(),
            on_down: None,
            on_up: None,
        }
    }

    /// Set the callback fired when the key goes down
    pub fn on_down<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut C) + 'static,
    {
        self.on_down = Some(Rc::new(callback));
        self
    }

    /// Set the callback fired when the key goes up
    pub fn on_up<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut C) + 'static,
    {
        self.on_up = Some(Rc::new(callback));
        self
    }

    /// The bound key
    pub fn key(&self) -> &KeyCode {
        &self.key
    }

    /// Whether a press callback is set
    pub fn has_on_down(&self) -> bool {
        self.on_down.is_some()
    }

    /// Whether a release callback is set
    pub fn has_on_up(&self) -> bool {
        self.on_up.is_some()
    }

    pub(crate) fn down_callback(&self) -> Option<&KeyCallback<C>> {
        self.on_down.as_ref()
    }

    pub(crate) fn up_callback(&self) -> Option<&KeyCallback<C>> {
        self.on_up.as_ref()
    }
}

impl<C> Clone for KeyBinding<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            on_down: self.on_down.clone(),
            on_up: self.on_up.clone(),
        }
    }
}

impl<C> fmt::Debug for KeyBinding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding")
            .field("key", &self.key)
            .field("on_down", &self.has_on_down())
            .field("on_up", &self.has_on_up())
            .finish()
    }
}

/// Binds a pointer target to press and release callbacks
#[derive(Clone)]
pub struct PointerBinding {
    target: TargetId,
    on_down: Option<PointerCallback>,
    on_up: Option<PointerCallback>,
    suppress_default: bool,
}

impl PointerBinding {
    /// Create a binding for `target` with no callbacks
    pub fn new(target: TargetId) -> Self {
        Self {
            target,
            on_down: None,
            on_up: None,
            suppress_default: false,
        }
    }

    /// Set the callback fired on pointer down
    pub fn on_down<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut PointerEvent) + 'static,
    {
        self.on_down = Some(Rc::new(callback));
        self
    }

    /// Set the callback fired on pointer up
    pub fn on_up<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut PointerEvent) + 'static,
    {
        self.on_up = Some(Rc::new(callback));
        self
    }

    /// Prevent the host's default action on every down and up event
    ///
    /// Applies even while the dispatcher is disabled.
    pub fn suppress_default(mut self, suppress: bool) -> Self {
        self.suppress_default = suppress;
        self
    }

    /// The bound target
    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Whether default actions are suppressed
    pub fn suppresses_default(&self) -> bool {
        self.suppress_default
    }

    /// Whether a press callback is set
    pub fn has_on_down(&self) -> bool {
        self.on_down.is_some()
    }

    /// Whether a release callback is set
    pub fn has_on_up(&self) -> bool {
        self.on_up.is_some()
    }

    pub(crate) fn down_callback(&self) -> Option<&PointerCallback> {
        self.on_down.as_ref()
    }

    pub(crate) fn up_callback(&self) -> Option<&PointerCallback> {
        self.on_up.as_ref()
    }
}

impl fmt::Debug for PointerBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerBinding")
            .field("target", &self.target)
            .field("on_down", &self.has_on_down())
            .field("on_up", &self.has_on_up())
            .field("suppress_default", &self.suppress_default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_binding_builder() {
        let binding: KeyBinding<i32> = KeyBinding::new("KeyA").on_up(|n: &mut i32| *n -= 1);

        assert_eq!(binding.key(), "KeyA");
        assert!(!binding.has_on_down());
        assert!(binding.has_on_up());

        let mut value = 3;
        if let Some(callback) = binding.up_callback() {
            callback(&mut value);
        }
        assert_eq!(value, 2);
    }

    #[test]
    fn test_pointer_binding_defaults() {
        let binding = PointerBinding::new(TargetId::new(9));

        assert_eq!(binding.target(), TargetId::new(9));
        assert!(!binding.suppresses_default());
        assert!(!binding.has_on_down());
        assert!(!binding.has_on_up());
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let binding: KeyBinding<()> = KeyBinding::new("Space").on_down(|_| {});
        let rendered = format!("{binding:?}");
        assert!(rendered.contains("\"Space\""));
        assert!(rendered.contains("on_down: true"));
    }
}
