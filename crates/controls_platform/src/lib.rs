//! Controls Platform Layer
//!
//! Platform-neutral input types and the [`InputSource`] capability that
//! binding dispatchers subscribe to.
//!
//! # Architecture
//!
//! - [`InputSource`] - subscribe and unsubscribe keyboard and pointer listeners
//! - [`EventBus`] - in-memory, single-threaded source; hosts push native
//!   events into it and tests drive it directly
//! - [`KeyboardEvent`] / [`PointerEvent`] - the events listeners receive
//!
//! # Host Implementations
//!
//! - `controls_platform_desktop` - macOS, Windows and Linux using winit
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use controls_platform::prelude::*;
//!
//! let bus = EventBus::new();
//! bus.add_key_listener(
//!     Phase::Down,
//!     Rc::new(|event: &KeyboardEvent| assert_eq!(event.code, "Space")),
//! );
//! bus.key_down("Space");
//! ```

mod bus;
mod error;
mod event;
mod input;
mod source;
mod window;

// Re-export all public types
pub use bus::EventBus;
pub use error::{PlatformError, Result};
pub use event::{ControlFlow, LoopEvent};
pub use input::{
    InputEvent, KeyCode, KeyboardEvent, Modifiers, MouseButton, Phase, PointerEvent, PointerType,
    TargetId,
};
pub use source::{InputSource, KeyListener, ListenerId, PointerListener};
pub use window::WindowConfig;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bus::EventBus;
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{ControlFlow, LoopEvent};
    pub use crate::input::{
        InputEvent, KeyCode, KeyboardEvent, Modifiers, MouseButton, Phase, PointerEvent,
        PointerType, TargetId,
    };
    pub use crate::source::{InputSource, KeyListener, ListenerId, PointerListener};
    pub use crate::window::WindowConfig;
}
