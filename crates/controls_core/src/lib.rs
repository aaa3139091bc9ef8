//! Controls Core
//!
//! Declarative key and pointer bindings dispatched from an injected
//! [`InputSource`](controls_platform::InputSource).
//!
//! - **Bindings**: [`KeyBinding`] maps a key code, [`PointerBinding`] maps a
//!   pointer target, each to optional press and release callbacks
//! - **Dispatch**: [`ControlsManager`] routes every event to the first
//!   matching binding, suppresses auto-repeat of held keys and gates callbacks
//!   behind an enabled flag
//! - **Configuration**: [`ControlsConfig`] (builder) and [`ControlsFlags`]
//!   (serde, loadable from TOML)
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use controls_core::prelude::*;
//! use controls_platform::{EventBus, TargetId};
//!
//! #[derive(Default)]
//! struct Player {
//!     jumping: bool,
//! }
//!
//! let bus = Rc::new(EventBus::new());
//! let button = TargetId::new(1);
//!
//! let controls = ControlsManager::new(
//!     bus.clone(),
//!     ControlsConfig::<Player>::default()
//!         .key_map(
//!             KeyBinding::new("Space")
//!                 .on_down(|p: &mut Player| p.jumping = true)
//!                 .on_up(|p: &mut Player| p.jumping = false),
//!         )
//!         .pointer_map(PointerBinding::new(button).suppress_default(true)),
//! );
//!
//! bus.key_down("Space");
//! assert!(controls.context().jumping);
//! assert!(bus.pointer_down(button));
//! ```

pub mod binding;
pub mod config;
pub mod error;
pub mod manager;

pub use binding::{KeyBinding, KeyCallback, PointerBinding, PointerCallback};
pub use config::{ControlsConfig, ControlsFlags};
pub use error::{ControlsError, Result};
pub use manager::{ControlsHandle, ControlsManager};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::binding::{KeyBinding, PointerBinding};
    pub use crate::config::{ControlsConfig, ControlsFlags};
    pub use crate::error::ControlsError;
    pub use crate::manager::{ControlsHandle, ControlsManager};
}
