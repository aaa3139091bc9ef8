//! Controls Desktop Platform
//!
//! Keyboard, mouse and touch input for macOS, Windows, and Linux using winit.
//!
//! [`DesktopInput`] implements `controls_platform::InputSource` over winit
//! window events, and [`DesktopEventLoop`] drives it from a real window.
//! Every window is a pointer target ([`DesktopWindow::target`]).
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use controls_core::prelude::*;
//! use controls_platform::prelude::*;
//! use controls_platform_desktop::{DesktopEventLoop, DesktopInput};
//!
//! fn main() -> Result<(), PlatformError> {
//!     let input = Rc::new(DesktopInput::new());
//!     let event_loop = DesktopEventLoop::new(WindowConfig::new("Game"))?;
//!     let mut controls = None;
//!
//!     event_loop.run(input.clone(), move |event, window| {
//!         if event == LoopEvent::Resumed && controls.is_none() {
//!             controls = Some(ControlsManager::new(
//!                 input.clone(),
//!                 ControlsConfig::<()>::default()
//!                     .key_map(KeyBinding::new("Space").on_down(|_: &mut ()| println!("jump")))
//!                     .pointer_map(PointerBinding::new(window.target())),
//!             ));
//!         }
//!         match event {
//!             LoopEvent::CloseRequested => ControlFlow::Exit,
//!             _ => ControlFlow::Continue,
//!         }
//!     })
//! }
//! ```

pub mod event_loop;
pub mod input;
pub mod source;
pub mod window;

pub use event_loop::DesktopEventLoop;
pub use source::{target_for_window, DesktopInput};
pub use window::DesktopWindow;
