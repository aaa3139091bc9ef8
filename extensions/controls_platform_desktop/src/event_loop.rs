//! Desktop event loop implementation using winit

use std::rc::Rc;

use controls_platform::{ControlFlow, LoopEvent, PlatformError, WindowConfig};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent as WinitWindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop as WinitEventLoop};
use winit::window::WindowId;

use crate::source::DesktopInput;
use crate::window::DesktopWindow;

/// Desktop event loop wrapping winit's event loop
///
/// Every window event is first fed to a [`DesktopInput`], so bindings
/// subscribed to it fire before the application handler sees the
/// lifecycle event.
pub struct DesktopEventLoop {
    event_loop: WinitEventLoop<()>,
    window_config: WindowConfig,
}

impl DesktopEventLoop {
    /// Create a new desktop event loop
    pub fn new(config: WindowConfig) -> Result<Self, PlatformError> {
        let event_loop =
            WinitEventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        Ok(Self {
            event_loop,
            window_config: config,
        })
    }

    /// Run the event loop until the handler returns [`ControlFlow::Exit`]
    ///
    /// This method blocks until the application exits.
    pub fn run<F>(self, input: Rc<DesktopInput>, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(LoopEvent, &DesktopWindow) -> ControlFlow + 'static,
    {
        let mut app = DesktopApp::new(self.window_config, input, handler);
        self.event_loop
            .run_app(&mut app)
            .map_err(|e| PlatformError::EventLoop(e.to_string()))
    }
}

/// Internal winit application handler
struct DesktopApp<F>
where
    F: FnMut(LoopEvent, &DesktopWindow) -> ControlFlow,
{
    window_config: WindowConfig,
    window: Option<DesktopWindow>,
    input: Rc<DesktopInput>,
    handler: F,
    should_exit: bool,
}

impl<F> DesktopApp<F>
where
    F: FnMut(LoopEvent, &DesktopWindow) -> ControlFlow,
{
    fn new(window_config: WindowConfig, input: Rc<DesktopInput>, handler: F) -> Self {
        Self {
            window_config,
            window: None,
            input,
            handler,
            should_exit: false,
        }
    }

    fn handle_event(&mut self, event: LoopEvent) {
        if let Some(ref window) = self.window {
            let flow = (self.handler)(event, window);
            if flow == ControlFlow::Exit {
                self.should_exit = true;
            }
        }
    }
}

impl<F> ApplicationHandler for DesktopApp<F>
where
    F: FnMut(LoopEvent, &DesktopWindow) -> ControlFlow,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Create window if we don't have one
        if self.window.is_none() {
            match DesktopWindow::new(event_loop, &self.window_config) {
                Ok(window) => {
                    self.window = Some(window);
                    self.handle_event(LoopEvent::Resumed);
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.handle_event(LoopEvent::Suspended);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        self.input.handle_window_event(window_id, &event);

        match event {
            WinitWindowEvent::CloseRequested => {
                self.handle_event(LoopEvent::CloseRequested);
            }

            WinitWindowEvent::RedrawRequested => {
                self.handle_event(LoopEvent::Frame);
            }

            // Bindings may have changed application state; give it a frame
            WinitWindowEvent::KeyboardInput { .. }
            | WinitWindowEvent::MouseInput { .. }
            | WinitWindowEvent::Touch(_) => {
                if let Some(ref window) = self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }

        // Check for exit
        if self.should_exit {
            event_loop.exit();
        }
    }
}
