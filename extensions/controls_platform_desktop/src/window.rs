//! Desktop window implementation using winit

use std::sync::Arc;

use controls_platform::{PlatformError, TargetId, WindowConfig};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as WinitWindow, WindowAttributes};

use crate::source::target_for_window;

/// Desktop window wrapping a winit window
///
/// The window is a pointer target; bind it through [`DesktopWindow::target`].
pub struct DesktopWindow {
    window: Arc<WinitWindow>,
}

impl DesktopWindow {
    /// Create a new desktop window
    pub fn new(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, PlatformError> {
        let attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .with_decorations(config.decorations);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        Ok(Self {
            window: Arc::new(window),
        })
    }

    /// Pointer target for this window
    pub fn target(&self) -> TargetId {
        target_for_window(self.window.id())
    }

    /// Get the underlying winit window
    pub fn winit_window(&self) -> &WinitWindow {
        &self.window
    }

    /// Set the window title
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
