//! winit-backed input source

use std::cell::Cell;

use controls_platform::{
    EventBus, InputEvent, InputSource, KeyListener, ListenerId, Phase, PointerEvent,
    PointerListener, PointerType, TargetId,
};
use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{ModifiersState, PhysicalKey};
use winit::window::WindowId;

use crate::input;

/// Pointer target for a window
///
/// On desktop each window is one interactive surface.
pub fn target_for_window(window_id: WindowId) -> TargetId {
    TargetId::new(u64::from(window_id))
}

/// Input source fed by winit window events
///
/// Keyboard input becomes global key events. Mouse buttons and touches become
/// pointer events targeted at the window they happened in, positioned at the
/// last known cursor (or touch) location.
pub struct DesktopInput {
    bus: EventBus,
    modifiers: Cell<ModifiersState>,
    cursor: Cell<(f32, f32)>,
}

impl Default for DesktopInput {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopInput {
    /// Create a source with no listeners
    pub fn new() -> Self {
        Self {
            bus: EventBus::new(),
            modifiers: Cell::new(ModifiersState::empty()),
            cursor: Cell::new((0.0, 0.0)),
        }
    }

    /// The underlying bus, for injecting synthetic events
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Feed a winit window event
    ///
    /// Returns whether a listener prevented the default action.
    pub fn handle_window_event(&self, window_id: WindowId, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(mods) => {
                self.modifiers.set(mods.state());
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.key_input(&event.physical_key, event.state, event.repeat);
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32);
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(target_for_window(window_id), *state, *button)
            }
            WindowEvent::Touch(touch) => self.touch_input(
                target_for_window(window_id),
                touch.phase,
                touch.location.x as f32,
                touch.location.y as f32,
            ),
            WindowEvent::Focused(false) => {
                self.modifiers.set(ModifiersState::empty());
                false
            }
            _ => false,
        }
    }

    /// Deliver a physical key press or release
    pub fn key_input(&self, key: &PhysicalKey, state: ElementState, repeat: bool) {
        if let Some(event) =
            input::convert_keyboard_event(key, state, repeat, self.modifiers.get())
        {
            self.bus.dispatch(InputEvent::Key(event));
        }
    }

    /// Record the cursor position used for subsequent mouse button events
    pub fn cursor_moved(&self, x: f32, y: f32) {
        self.cursor.set((x, y));
    }

    /// Record the modifier state used for subsequent events
    pub fn set_modifiers(&self, modifiers: ModifiersState) {
        self.modifiers.set(modifiers);
    }

    /// Deliver a mouse button press or release on `target`
    pub fn mouse_input(
        &self,
        target: TargetId,
        state: ElementState,
        button: WinitMouseButton,
    ) -> bool {
        let (x, y) = self.cursor.get();
        let event = self
            .pointer_event(target, input::convert_phase(state), x, y)
            .with_button(input::convert_mouse_button(button));
        self.bus.dispatch(InputEvent::Pointer(event))
    }

    /// Deliver a touch on `target`; moves and cancellations are ignored
    pub fn touch_input(&self, target: TargetId, phase: TouchPhase, x: f32, y: f32) -> bool {
        let Some(phase) = input::convert_touch_phase(phase) else {
            return false;
        };
        self.cursor.set((x, y));
        let event = self
            .pointer_event(target, phase, x, y)
            .with_pointer_type(PointerType::Touch);
        self.bus.dispatch(InputEvent::Pointer(event))
    }

    fn pointer_event(&self, target: TargetId, phase: Phase, x: f32, y: f32) -> PointerEvent {
        let event = match phase {
            Phase::Down => PointerEvent::down(target),
            Phase::Up => PointerEvent::up(target),
        };
        event
            .with_position(x, y)
            .with_modifiers(input::convert_modifiers(self.modifiers.get()))
    }
}

impl InputSource for DesktopInput {
    fn add_key_listener(&self, phase: Phase, listener: KeyListener) -> ListenerId {
        self.bus.add_key_listener(phase, listener)
    }

    fn add_pointer_listener(
        &self,
        target: TargetId,
        phase: Phase,
        listener: PointerListener,
    ) -> ListenerId {
        self.bus.add_pointer_listener(target, phase, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.bus.remove_listener(id)
    }
}
