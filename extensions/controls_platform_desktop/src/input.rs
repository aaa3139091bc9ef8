//! Desktop input conversion (winit -> controls_platform)

use controls_platform::{KeyCode, KeyboardEvent, Modifiers, MouseButton, Phase};
use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

/// Convert winit mouse button to controls MouseButton
pub fn convert_mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(n) => MouseButton::Other(n),
    }
}

/// Convert winit element state to a controls Phase
pub fn convert_phase(state: ElementState) -> Phase {
    match state {
        ElementState::Pressed => Phase::Down,
        ElementState::Released => Phase::Up,
    }
}

/// Convert a touch phase to a pointer Phase
///
/// Moves and cancellations have no down/up counterpart.
pub fn convert_touch_phase(phase: TouchPhase) -> Option<Phase> {
    match phase {
        TouchPhase::Started => Some(Phase::Down),
        TouchPhase::Ended => Some(Phase::Up),
        TouchPhase::Moved | TouchPhase::Cancelled => None,
    }
}

/// Convert winit modifiers to controls Modifiers
pub fn convert_modifiers(modifiers: ModifiersState) -> Modifiers {
    Modifiers {
        shift: modifiers.shift_key(),
        ctrl: modifiers.control_key(),
        alt: modifiers.alt_key(),
        meta: modifiers.super_key(),
    }
}

/// Convert a physical key to its W3C `code` identifier
///
/// winit names its key codes after the W3C UI Events codes, so the variant
/// name is the identifier. The Super keys are the one rename ("MetaLeft").
/// Returns `None` for keys winit could not identify.
pub fn convert_key_code(key: &PhysicalKey) -> Option<KeyCode> {
    match key {
        PhysicalKey::Code(WinitKeyCode::SuperLeft) => Some(KeyCode::from("MetaLeft")),
        PhysicalKey::Code(WinitKeyCode::SuperRight) => Some(KeyCode::from("MetaRight")),
        PhysicalKey::Code(code) => Some(KeyCode::new(format!("{code:?}"))),
        PhysicalKey::Unidentified(native) => {
            tracing::trace!("Ignoring unidentified key {:?}", native);
            None
        }
    }
}

/// Convert winit keyboard input to a controls KeyboardEvent
pub fn convert_keyboard_event(
    key: &PhysicalKey,
    state: ElementState,
    repeat: bool,
    modifiers: ModifiersState,
) -> Option<KeyboardEvent> {
    let code = convert_key_code(key)?;
    Some(KeyboardEvent {
        code,
        phase: convert_phase(state),
        modifiers: convert_modifiers(modifiers),
        repeat,
    })
}
