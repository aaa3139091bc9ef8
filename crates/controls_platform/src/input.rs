//! Input event types for keyboard and pointer devices

use std::borrow::Borrow;
use std::fmt;

/// Whether an input went down (press) or up (release)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Key or button was pressed
    Down,
    /// Key or button was released
    Up,
}

/// Input events delivered by an [`InputSource`](crate::InputSource)
#[derive(Clone, Debug)]
pub enum InputEvent {
    /// Keyboard event (global, not scoped to a target)
    Key(KeyboardEvent),
    /// Pointer event scoped to a target
    Pointer(PointerEvent),
}

impl InputEvent {
    /// Get the phase of the wrapped event
    pub fn phase(&self) -> Phase {
        match self {
            InputEvent::Key(event) => event.phase,
            InputEvent::Pointer(event) => event.phase,
        }
    }
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Physical key identifier
///
/// Uses the W3C UI Events `code` names (`"Space"`, `"KeyA"`, `"ArrowLeft"`,
/// `"Digit1"`), so identifiers are layout independent. Two codes are equal
/// only if their strings are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(String);

impl KeyCode {
    /// Create a key code from its identifier
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for KeyCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for KeyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for KeyCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for KeyCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for KeyCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The physical key
    pub code: KeyCode,
    /// Whether the key went down or up
    pub phase: Phase,
    /// Modifier keys held during this event
    pub modifiers: Modifiers,
    /// Set by the host when this is an OS auto-repeat of a held key
    pub repeat: bool,
}

impl KeyboardEvent {
    /// Create a key-down event with no modifiers
    pub fn down(code: impl Into<KeyCode>) -> Self {
        Self::new(code, Phase::Down)
    }

    /// Create a key-up event with no modifiers
    pub fn up(code: impl Into<KeyCode>) -> Self {
        Self::new(code, Phase::Up)
    }

    fn new(code: impl Into<KeyCode>, phase: Phase) -> Self {
        Self {
            code: code.into(),
            phase,
            modifiers: Modifiers::default(),
            repeat: false,
        }
    }

    /// Set the modifier state
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark this event as an auto-repeat
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held (Option on macOS)
    pub alt: bool,
    /// Meta key is held (Command on macOS, Windows key on Windows)
    pub meta: bool,
}

impl Modifiers {
    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

// ============================================================================
// Pointer Events
// ============================================================================

/// Opaque handle to a surface that emits pointer events
///
/// Hosts decide what a target is: a window, a widget, a screen region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    /// Create a target handle from a raw host identifier
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw host identifier
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button (also primary touch contact)
    #[default]
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Back button (side button)
    Back,
    /// Forward button (side button)
    Forward,
    /// Other button with index
    Other(u16),
}

/// Kind of device that produced a pointer event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// Mouse or trackpad
    #[default]
    Mouse,
    /// Finger on a touchscreen
    Touch,
    /// Stylus
    Pen,
}

/// Pointer event on a target
///
/// Listeners receive it mutably so they can call
/// [`prevent_default`](PointerEvent::prevent_default).
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// The surface the event was delivered to
    pub target: TargetId,
    /// Whether the pointer went down or up
    pub phase: Phase,
    /// Which button changed state
    pub button: MouseButton,
    /// Device kind
    pub pointer_type: PointerType,
    /// X position in target coordinates
    pub x: f32,
    /// Y position in target coordinates
    pub y: f32,
    /// Modifier keys held during this event
    pub modifiers: Modifiers,
    default_prevented: bool,
}

impl PointerEvent {
    /// Create a primary-button pointer-down event at the origin
    pub fn down(target: TargetId) -> Self {
        Self::new(target, Phase::Down)
    }

    /// Create a primary-button pointer-up event at the origin
    pub fn up(target: TargetId) -> Self {
        Self::new(target, Phase::Up)
    }

    fn new(target: TargetId, phase: Phase) -> Self {
        Self {
            target,
            phase,
            button: MouseButton::Left,
            pointer_type: PointerType::Mouse,
            x: 0.0,
            y: 0.0,
            modifiers: Modifiers::default(),
            default_prevented: false,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the button
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Set the device kind
    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Set the modifier state
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Ask the host not to perform its default action for this event
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether any listener called [`prevent_default`](Self::prevent_default)
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_code_lookup_by_str() {
        let mut held: HashSet<KeyCode> = HashSet::new();
        held.insert(KeyCode::from("Space"));

        assert!(held.contains("Space"));
        assert!(!held.contains("space"));
        assert_eq!(KeyCode::new("KeyA"), "KeyA");
    }

    #[test]
    fn test_prevent_default_sticks() {
        let mut event = PointerEvent::down(TargetId::new(3)).with_position(4.0, 5.0);
        assert!(!event.default_prevented());

        event.prevent_default();
        event.prevent_default();
        assert!(event.default_prevented());
        assert_eq!(event.phase, Phase::Down);
        assert_eq!((event.x, event.y), (4.0, 5.0));
    }

    #[test]
    fn test_target_display() {
        assert_eq!(TargetId::new(42).to_string(), "target#42");
        assert_eq!(TargetId::new(42).raw(), 42);
    }

    #[test]
    fn test_modifiers_empty() {
        assert!(Modifiers::default().is_empty());
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert!(!shift.is_empty());
    }
}
