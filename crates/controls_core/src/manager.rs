//! Binding dispatcher
//!
//! [`ControlsManager`] subscribes to an [`InputSource`] on construction and
//! routes every key event to at most one key binding. Pointer bindings never
//! shadow each other: every binding on a target sees its events.
//!
//! # Routing
//!
//! ```text
//! key down K ──► first key binding with key K
//!                  ├─ disabled?            stop
//!                  ├─ K held (no repeat)?  stop
//!                  ├─ mark K held (no repeat)
//!                  └─ on_down(&mut context)
//!
//! key up K   ──► first key binding with key K
//!                  ├─ unmark K (no repeat), even when disabled
//!                  ├─ disabled?            stop
//!                  └─ on_up(&mut context)
//!
//! pointer down/up on T ──► each binding registered for T, in order
//!                  ├─ suppress_default?    prevent_default, even when disabled
//!                  ├─ disabled?            stop
//!                  └─ on_down / on_up(&mut event)
//! ```

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use controls_platform::{InputSource, KeyCode, KeyboardEvent, ListenerId, Phase, PointerEvent};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::binding::{KeyBinding, KeyCallback, PointerBinding};
use crate::config::{ControlsConfig, ControlsFlags};

/// State shared between the manager, its listeners and its handles
struct DispatcherState<C> {
    enabled: Cell<bool>,
    debug: Cell<bool>,
    allow_key_repeat: Cell<bool>,
    context: RefCell<C>,
    key_maps: Vec<KeyBinding<C>>,
    pointer_maps: Vec<PointerBinding>,
    /// Keys between press and release; always empty while repeat is allowed
    held_keys: RefCell<FxHashSet<KeyCode>>,
}

impl<C> DispatcherState<C> {
    fn on_key_down(&self, event: &KeyboardEvent) {
        let code = &event.code;
        if self.debug.get() {
            tracing::info!("keydown: {code}");
        }

        let Some(binding) = self.key_maps.iter().find(|b| b.key() == code) else {
            return;
        };

        if !self.enabled.get() {
            return;
        }

        if !self.allow_key_repeat.get() {
            let mut held = self.held_keys.borrow_mut();
            if held.contains(code) {
                return;
            }
            held.insert(code.clone());
        }

        if let Some(callback) = binding.down_callback() {
            if self.debug.get() {
                tracing::info!("{code} actionDown triggered");
            }
            self.invoke(callback);
        }
    }

    fn on_key_up(&self, event: &KeyboardEvent) {
        let code = &event.code;
        if self.debug.get() {
            tracing::info!("keyup: {code}");
        }

        let Some(binding) = self.key_maps.iter().find(|b| b.key() == code) else {
            return;
        };

        if !self.allow_key_repeat.get() {
            self.held_keys.borrow_mut().remove(code);
        }

        if !self.enabled.get() {
            return;
        }

        if let Some(callback) = binding.up_callback() {
            if self.debug.get() {
                tracing::info!("{code} actionUp triggered");
            }
            self.invoke(callback);
        }
    }

    fn on_pointer(&self, index: usize, event: &mut PointerEvent) {
        let Some(binding) = self.pointer_maps.get(index) else {
            return;
        };

        if binding.suppresses_default() {
            event.prevent_default();
        }

        if !self.enabled.get() {
            return;
        }

        let (name, action, callback) = match event.phase {
            Phase::Down => ("pointerdown", "actionDown", binding.down_callback()),
            Phase::Up => ("pointerup", "actionUp", binding.up_callback()),
        };

        if self.debug.get() {
            tracing::info!("{name}: {}", binding.target());
        }

        let Some(callback) = callback else {
            return;
        };

        if self.debug.get() {
            tracing::info!("{} {action} triggered", binding.target());
        }
        callback(event);
    }

    fn invoke(&self, callback: &KeyCallback<C>) {
        match self.context.try_borrow_mut() {
            Ok(mut context) => callback(&mut *context),
            Err(_) => {
                tracing::warn!("Controls context is already borrowed; skipping key callback");
            }
        }
    }

    fn set_allow_key_repeat(&self, allow: bool) {
        self.allow_key_repeat.set(allow);
        if allow {
            self.held_keys.borrow_mut().clear();
        }
    }

    fn is_key_held(&self, code: &str) -> bool {
        self.held_keys.borrow().contains(code)
    }
}

/// Registers key and pointer bindings against an input source
///
/// Construction subscribes one key-down and one key-up listener, plus a
/// pointer-down and a pointer-up listener for every pointer binding. The
/// listeners stay registered until [`dispose`](Self::dispose) is called or the
/// manager is dropped.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use controls_core::{ControlsConfig, ControlsManager, KeyBinding};
/// use controls_platform::EventBus;
///
/// let bus = Rc::new(EventBus::new());
/// let controls = ControlsManager::new(
///     bus.clone(),
///     ControlsConfig::new(0u32).key_map(KeyBinding::new("Space").on_down(|jumps: &mut u32| *jumps += 1)),
/// );
///
/// bus.key_down("Space");
/// bus.key_down("Space"); // held, suppressed
/// assert_eq!(*controls.context(), 1);
/// ```
#[must_use = "dropping a ControlsManager unsubscribes its bindings"]
pub struct ControlsManager<C: 'static = ()> {
    state: Rc<DispatcherState<C>>,
    source: Rc<dyn InputSource>,
    listeners: SmallVec<[ListenerId; 4]>,
}

impl<C: 'static> ControlsManager<C> {
    /// Create a manager and subscribe it to `source`
    pub fn new(source: Rc<dyn InputSource>, config: ControlsConfig<C>) -> Self {
        let ControlsConfig {
            debug,
            enabled,
            allow_key_repeat,
            context,
            key_maps,
            pointer_maps,
        } = config;

        let state = Rc::new(DispatcherState {
            enabled: Cell::new(enabled),
            debug: Cell::new(debug),
            allow_key_repeat: Cell::new(allow_key_repeat),
            context: RefCell::new(context),
            key_maps,
            pointer_maps,
            held_keys: RefCell::new(FxHashSet::default()),
        });

        let mut listeners = SmallVec::new();

        let down_state = Rc::clone(&state);
        listeners.push(source.add_key_listener(
            Phase::Down,
            Rc::new(move |event: &KeyboardEvent| down_state.on_key_down(event)),
        ));
        let up_state = Rc::clone(&state);
        listeners.push(source.add_key_listener(
            Phase::Up,
            Rc::new(move |event: &KeyboardEvent| up_state.on_key_up(event)),
        ));

        for (index, binding) in state.pointer_maps.iter().enumerate() {
            for phase in [Phase::Down, Phase::Up] {
                let pointer_state = Rc::clone(&state);
                listeners.push(source.add_pointer_listener(
                    binding.target(),
                    phase,
                    Rc::new(move |event: &mut PointerEvent| pointer_state.on_pointer(index, event)),
                ));
            }
        }

        tracing::debug!(
            "Controls subscribed: {} key bindings, {} pointer bindings",
            state.key_maps.len(),
            state.pointer_maps.len()
        );

        Self {
            state,
            source,
            listeners,
        }
    }

    /// Whether callbacks are invoked
    pub fn is_enabled(&self) -> bool {
        self.state.enabled.get()
    }

    /// Enable or disable callback invocation, effective on the next event
    pub fn set_enabled(&self, enabled: bool) {
        self.state.enabled.set(enabled);
    }

    /// Shorthand for `set_enabled(true)`
    pub fn enable(&self) {
        self.set_enabled(true);
    }

    /// Shorthand for `set_enabled(false)`
    pub fn disable(&self) {
        self.set_enabled(false);
    }

    /// Whether every event is traced
    pub fn is_debug(&self) -> bool {
        self.state.debug.get()
    }

    /// Turn event tracing on or off
    pub fn set_debug(&self, debug: bool) {
        self.state.debug.set(debug);
    }

    /// Whether held keys fire their press callback repeatedly
    pub fn allows_key_repeat(&self) -> bool {
        self.state.allow_key_repeat.get()
    }

    /// Allow or suppress key repeat
    ///
    /// Allowing repeat forgets every held key.
    pub fn set_allow_key_repeat(&self, allow: bool) {
        self.state.set_allow_key_repeat(allow);
    }

    /// Current flag values
    pub fn flags(&self) -> ControlsFlags {
        ControlsFlags {
            debug: self.is_debug(),
            enabled: self.is_enabled(),
            allow_key_repeat: self.allows_key_repeat(),
        }
    }

    /// Borrow the context
    ///
    /// Panics if called from inside a key callback.
    pub fn context(&self) -> Ref<'_, C> {
        self.state.context.borrow()
    }

    /// Mutably borrow the context
    ///
    /// Panics if called from inside a key callback.
    pub fn context_mut(&self) -> RefMut<'_, C> {
        self.state.context.borrow_mut()
    }

    /// Replace the context, returning the previous one
    pub fn set_context(&self, context: C) -> C {
        self.state.context.replace(context)
    }

    /// Whether `code` is currently held
    pub fn is_key_held(&self, code: &str) -> bool {
        self.state.is_key_held(code)
    }

    /// Snapshot of the held keys, sorted
    pub fn held_keys(&self) -> Vec<KeyCode> {
        let mut keys: Vec<KeyCode> = self.state.held_keys.borrow().iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Key bindings in priority order
    pub fn key_maps(&self) -> &[KeyBinding<C>] {
        &self.state.key_maps
    }

    /// Pointer bindings, in the order they fire
    pub fn pointer_maps(&self) -> &[PointerBinding] {
        &self.state.pointer_maps
    }

    /// Number of listeners still registered with the source
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether [`dispose`](Self::dispose) has run
    pub fn is_disposed(&self) -> bool {
        self.listeners.is_empty()
    }

    /// A clonable handle for toggling flags, usable from inside callbacks
    pub fn handle(&self) -> ControlsHandle<C> {
        ControlsHandle {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Unsubscribe every listener registered at construction
    ///
    /// Safe to call more than once. Held keys are forgotten.
    pub fn dispose(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        for id in self.listeners.drain(..) {
            if !self.source.remove_listener(id) {
                tracing::warn!("Controls listener {id:?} was already removed from its source");
            }
        }
        self.state.held_keys.borrow_mut().clear();
        tracing::debug!("Controls disposed");
    }
}

impl<C: 'static> Drop for ControlsManager<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Weak handle to a manager's flags
///
/// Holding a handle does not keep the manager's state alive, so callbacks
/// can capture one without creating a reference cycle. Once the manager is
/// dropped, setters do nothing and queries report `false`.
pub struct ControlsHandle<C> {
    state: Weak<DispatcherState<C>>,
}

impl<C> Clone for ControlsHandle<C> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<C> ControlsHandle<C> {
    /// Whether the manager still exists
    pub fn is_alive(&self) -> bool {
        self.state.strong_count() > 0
    }

    /// Whether callbacks are invoked
    pub fn is_enabled(&self) -> bool {
        self.state.upgrade().is_some_and(|s| s.enabled.get())
    }

    /// Enable or disable callback invocation, effective on the next event
    pub fn set_enabled(&self, enabled: bool) {
        if let Some(state) = self.state.upgrade() {
            state.enabled.set(enabled);
        }
    }

    /// Whether every event is traced
    pub fn is_debug(&self) -> bool {
        self.state.upgrade().is_some_and(|s| s.debug.get())
    }

    /// Turn event tracing on or off
    pub fn set_debug(&self, debug: bool) {
        if let Some(state) = self.state.upgrade() {
            state.debug.set(debug);
        }
    }

    /// Allow or suppress key repeat; allowing forgets every held key
    pub fn set_allow_key_repeat(&self, allow: bool) {
        if let Some(state) = self.state.upgrade() {
            state.set_allow_key_repeat(allow);
        }
    }

    /// Whether `code` is currently held
    pub fn is_key_held(&self, code: &str) -> bool {
        self.state.upgrade().is_some_and(|s| s.is_key_held(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use controls_platform::{EventBus, InputEvent, KeyListener, PointerListener, TargetId};

    #[derive(Default, Debug, PartialEq)]
    struct Counts {
        down: u32,
        up: u32,
    }

    fn counting(key: &str) -> KeyBinding<Counts> {
        KeyBinding::new(key)
            .on_down(|c: &mut Counts| c.down += 1)
            .on_up(|c: &mut Counts| c.up += 1)
    }

    fn setup(config: ControlsConfig<Counts>) -> (Rc<EventBus>, ControlsManager<Counts>) {
        let bus = Rc::new(EventBus::new());
        let manager = ControlsManager::new(bus.clone(), config);
        (bus, manager)
    }

    #[test]
    fn test_repeat_suppressed_while_held() {
        let (bus, controls) = setup(ControlsConfig::default().key_map(counting("Space")));

        bus.key_down("Space");
        assert_eq!(controls.context().down, 1);
        assert_eq!(controls.held_keys(), vec![KeyCode::from("Space")]);

        bus.key_down("Space");
        assert_eq!(controls.context().down, 1);

        bus.key_up("Space");
        assert!(controls.held_keys().is_empty());
        assert_eq!(controls.context().up, 1);

        bus.key_down("Space");
        assert_eq!(controls.context().down, 2);
    }

    #[test]
    fn test_repeat_allowed() {
        let (bus, controls) = setup(
            ControlsConfig::default()
                .allow_key_repeat(true)
                .key_map(counting("KeyW")),
        );

        bus.key_down("KeyW");
        bus.key_down("KeyW");

        assert_eq!(controls.context().down, 2);
        assert!(controls.held_keys().is_empty());
        assert!(!controls.is_key_held("KeyW"));
    }

    #[test]
    fn test_os_repeat_flag_does_not_bypass_suppression() {
        let (bus, controls) = setup(ControlsConfig::default().key_map(counting("KeyD")));

        bus.dispatch(InputEvent::Key(KeyboardEvent::down("KeyD")));
        bus.dispatch(InputEvent::Key(KeyboardEvent::down("KeyD").with_repeat(true)));

        assert_eq!(controls.context().down, 1);
    }

    #[test]
    fn test_disabled_down_does_not_mark_held() {
        let (bus, controls) = setup(
            ControlsConfig::default()
                .enabled(false)
                .key_map(counting("KeyA")),
        );

        bus.key_down("KeyA");

        assert_eq!(*controls.context(), Counts::default());
        assert!(!controls.is_key_held("KeyA"));
    }

    #[test]
    fn test_disabled_up_still_releases_held_key() {
        let (bus, controls) = setup(ControlsConfig::default().key_map(counting("KeyA")));

        bus.key_down("KeyA");
        assert!(controls.is_key_held("KeyA"));

        controls.disable();
        bus.key_up("KeyA");

        assert!(!controls.is_key_held("KeyA"));
        assert_eq!(controls.context().up, 0);

        // Re-enabled, the next press is a fresh press
        controls.enable();
        bus.key_down("KeyA");
        assert_eq!(controls.context().down, 2);
    }

    #[test]
    fn test_first_match_wins() {
        let first = KeyBinding::new("KeyK").on_down(|c: &mut Vec<&'static str>| c.push("first"));
        let second = KeyBinding::new("KeyK").on_down(|c: &mut Vec<&'static str>| c.push("second"));
        let bus = Rc::new(EventBus::new());
        let controls = ControlsManager::new(
            bus.clone(),
            ControlsConfig::new(Vec::new()).key_maps([first, second]),
        );

        bus.key_down("KeyK");
        bus.key_up("KeyK");
        bus.key_down("KeyK");

        assert_eq!(*controls.context(), vec!["first", "first"]);
    }

    #[test]
    fn test_shadowing_binding_without_callback_still_tracks_held() {
        let bus = Rc::new(EventBus::new());
        let controls = ControlsManager::new(
            bus.clone(),
            ControlsConfig::default().key_maps([KeyBinding::new("KeyX"), counting("KeyX")]),
        );

        bus.key_down("KeyX");

        assert_eq!(controls.context().down, 0);
        assert!(controls.is_key_held("KeyX"));
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let (bus, controls) = setup(ControlsConfig::default().key_map(counting("KeyA")));

        bus.key_down("KeyB");
        bus.key_up("KeyB");

        assert_eq!(*controls.context(), Counts::default());
        assert!(controls.held_keys().is_empty());
    }

    #[test]
    fn test_enabling_repeat_clears_held_keys() {
        let (bus, controls) = setup(
            ControlsConfig::default()
                .key_map(counting("KeyA"))
                .key_map(counting("KeyS")),
        );

        bus.key_down("KeyA");
        bus.key_down("KeyS");
        assert_eq!(
            controls.held_keys(),
            vec![KeyCode::from("KeyA"), KeyCode::from("KeyS")]
        );

        controls.set_allow_key_repeat(true);
        assert!(controls.held_keys().is_empty());

        bus.key_down("KeyA");
        bus.key_down("KeyA");
        assert_eq!(controls.context().down, 4);
        assert!(controls.held_keys().is_empty());
    }

    #[test]
    fn test_debug_does_not_change_dispatch() {
        let (bus, controls) = setup(
            ControlsConfig::default()
                .debug(true)
                .key_map(counting("Enter")),
        );

        bus.key_down("Enter");
        bus.key_down("Escape");
        bus.key_up("Enter");

        assert_eq!(*controls.context(), Counts { down: 1, up: 1 });
        assert!(controls.flags().debug);
    }

    #[test]
    fn test_pointer_suppress_default_when_disabled() {
        let target = TargetId::new(1);
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let (bus, controls) = setup(
            ControlsConfig::default().enabled(false).pointer_map(
                PointerBinding::new(target)
                    .suppress_default(true)
                    .on_down(move |_| hits_clone.set(hits_clone.get() + 1)),
            ),
        );

        assert!(bus.pointer_down(target));
        assert!(bus.pointer_up(target));
        assert_eq!(hits.get(), 0);

        controls.enable();
        assert!(bus.pointer_down(target));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_pointer_callbacks_receive_raw_event() {
        let target = TargetId::new(5);
        let seen: Rc<RefCell<Vec<(Phase, f32, f32)>>> = Rc::new(RefCell::new(Vec::new()));
        let down_seen = seen.clone();
        let up_seen = seen.clone();
        let (bus, _controls) = setup(
            ControlsConfig::default().pointer_map(
                PointerBinding::new(target)
                    .on_down(move |e| down_seen.borrow_mut().push((e.phase, e.x, e.y)))
                    .on_up(move |e| up_seen.borrow_mut().push((e.phase, e.x, e.y))),
            ),
        );

        let prevented =
            bus.dispatch(InputEvent::Pointer(PointerEvent::down(target).with_position(10.0, 20.0)));
        bus.dispatch(InputEvent::Pointer(PointerEvent::up(target).with_position(11.0, 21.0)));

        assert!(!prevented);
        assert_eq!(
            *seen.borrow(),
            vec![(Phase::Down, 10.0, 20.0), (Phase::Up, 11.0, 21.0)]
        );
    }

    #[test]
    fn test_pointer_events_on_other_targets_ignored() {
        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let (bus, _controls) = setup(
            ControlsConfig::default().pointer_map(
                PointerBinding::new(TargetId::new(1))
                    .suppress_default(true)
                    .on_down(move |_| hits_clone.set(hits_clone.get() + 1)),
            ),
        );

        assert!(!bus.pointer_down(TargetId::new(2)));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_pointer_missing_callback_skipped() {
        let target = TargetId::new(3);
        let (bus, _controls) = setup(
            ControlsConfig::default()
                .pointer_map(PointerBinding::new(target).on_up(|e| e.prevent_default())),
        );

        assert!(!bus.pointer_down(target));
        assert!(bus.pointer_up(target));
    }

    #[test]
    fn test_listener_registration_counts() {
        let (bus, controls) = setup(
            ControlsConfig::default()
                .key_map(counting("KeyA"))
                .pointer_maps([
                    PointerBinding::new(TargetId::new(1)),
                    PointerBinding::new(TargetId::new(2)),
                ]),
        );

        assert_eq!(controls.listener_count(), 6);
        assert_eq!(bus.listener_count(), 6);
    }

    #[test]
    fn test_dispose_unsubscribes() {
        let (bus, mut controls) = setup(
            ControlsConfig::default()
                .key_map(counting("KeyA"))
                .pointer_map(PointerBinding::new(TargetId::new(1)).suppress_default(true)),
        );

        bus.key_down("KeyA");
        controls.dispose();
        controls.dispose();

        assert!(controls.is_disposed());
        assert_eq!(bus.listener_count(), 0);
        assert!(controls.held_keys().is_empty());

        bus.key_up("KeyA");
        bus.key_down("KeyA");
        assert!(!bus.pointer_down(TargetId::new(1)));
        assert_eq!(*controls.context(), Counts { down: 1, up: 0 });
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = Rc::new(EventBus::new());
        let handle = {
            let controls = ControlsManager::new(
                bus.clone(),
                ControlsConfig::<Counts>::default().key_map(counting("KeyA")),
            );
            assert_eq!(bus.listener_count(), 2);
            controls.handle()
        };

        assert_eq!(bus.listener_count(), 0);
        assert!(!handle.is_alive());
        assert!(!handle.is_enabled());
        handle.set_enabled(true);
    }

    #[test]
    fn test_handle_toggles_from_callback() {
        let bus = Rc::new(EventBus::new());
        let handle_slot: Rc<RefCell<Option<ControlsHandle<Counts>>>> = Rc::new(RefCell::new(None));
        let pause_slot = handle_slot.clone();

        let controls = ControlsManager::new(
            bus.clone(),
            ControlsConfig::default()
                .key_map(KeyBinding::new("KeyP").on_down(move |_: &mut Counts| {
                    if let Some(handle) = pause_slot.borrow().as_ref() {
                        handle.set_enabled(!handle.is_enabled());
                    }
                }))
                .key_map(counting("KeyA")),
        );
        *handle_slot.borrow_mut() = Some(controls.handle());

        bus.key_down("KeyP");
        assert!(!controls.is_enabled());

        bus.key_down("KeyA");
        assert_eq!(controls.context().down, 0);
        assert!(!controls.is_key_held("KeyA"));
    }

    #[test]
    fn test_context_replace_and_mutate() {
        let (bus, controls) = setup(ControlsConfig::default().key_map(counting("KeyA")));

        bus.key_down("KeyA");
        let previous = controls.set_context(Counts { down: 10, up: 0 });
        assert_eq!(previous, Counts { down: 1, up: 0 });

        controls.context_mut().up = 5;
        bus.key_up("KeyA");

        assert_eq!(*controls.context(), Counts { down: 10, up: 6 });
    }

    #[test]
    fn test_nested_dispatch_is_serialized() {
        let bus = Rc::new(EventBus::new());
        let weak_bus = Rc::downgrade(&bus);
        let controls = ControlsManager::new(
            bus.clone(),
            ControlsConfig::new(Vec::<String>::new())
                .key_map(KeyBinding::new("KeyR").on_down(move |log: &mut Vec<String>| {
                    log.push("reload".into());
                    if let Some(bus) = weak_bus.upgrade() {
                        bus.key_down("KeyF");
                    }
                    log.push("reload done".into());
                }))
                .key_map(
                    KeyBinding::new("KeyF")
                        .on_down(|log: &mut Vec<String>| log.push("fire".into())),
                ),
        );

        bus.key_down("KeyR");

        assert_eq!(*controls.context(), vec!["reload", "reload done", "fire"]);
    }

    #[test]
    fn test_pointer_bindings_sharing_target_all_fire() {
        let target = TargetId::new(9);
        let fired: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let first = fired.clone();
        let second = fired.clone();
        let (bus, _controls) = setup(
            ControlsConfig::default()
                .pointer_map(
                    PointerBinding::new(target)
                        .on_down(move |_: &mut PointerEvent| first.borrow_mut().push("first")),
                )
                .pointer_map(
                    PointerBinding::new(target)
                        .suppress_default(true)
                        .on_down(move |_: &mut PointerEvent| second.borrow_mut().push("second")),
                ),
        );

        // The second binding's suppression applies even though the first also matched
        assert!(bus.pointer_down(target));
        assert_eq!(*fired.borrow(), vec!["first", "second"]);
    }

    /// Source that calls key listeners immediately, even from inside a listener
    #[derive(Default)]
    struct DirectSource {
        key_listeners: RefCell<Vec<(Phase, KeyListener)>>,
    }

    impl DirectSource {
        fn emit(&self, event: KeyboardEvent) {
            let listeners = self.key_listeners.borrow().clone();
            for (phase, listener) in listeners {
                if phase == event.phase {
                    listener(&event);
                }
            }
        }
    }

    impl InputSource for DirectSource {
        fn add_key_listener(&self, phase: Phase, listener: KeyListener) -> ListenerId {
            self.key_listeners.borrow_mut().push((phase, listener));
            ListenerId::default()
        }

        fn add_pointer_listener(&self, _: TargetId, _: Phase, _: PointerListener) -> ListenerId {
            ListenerId::default()
        }

        fn remove_listener(&self, _: ListenerId) -> bool {
            false
        }
    }

    #[test]
    fn test_reentrant_key_callback_skipped_without_serializing_source() {
        let source = Rc::new(DirectSource::default());
        let weak_source = Rc::downgrade(&source);
        let controls = ControlsManager::new(
            source.clone(),
            ControlsConfig::new(Vec::<String>::new())
                .key_map(KeyBinding::new("KeyR").on_down(move |log: &mut Vec<String>| {
                    log.push("reload".into());
                    if let Some(source) = weak_source.upgrade() {
                        source.emit(KeyboardEvent::down("KeyF"));
                    }
                    log.push("reload done".into());
                }))
                .key_map(
                    KeyBinding::new("KeyF")
                        .on_down(|log: &mut Vec<String>| log.push("fire".into())),
                ),
        );

        source.emit(KeyboardEvent::down("KeyR"));
        assert_eq!(*controls.context(), vec!["reload", "reload done"]);

        // The skipped press still counts as held until released
        assert!(controls.is_key_held("KeyF"));
        source.emit(KeyboardEvent::up("KeyF"));
        source.emit(KeyboardEvent::down("KeyF"));
        assert_eq!(*controls.context(), vec!["reload", "reload done", "fire"]);
    }
}
