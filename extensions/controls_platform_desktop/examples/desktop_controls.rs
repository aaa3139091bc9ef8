//! Desktop Controls Demo
//!
//! Opens a window with two managers on the same input source:
//!
//! Game controls
//! - Space: jump (suppressed while held)
//! - Mouse or touch on the window: log press and release positions
//!
//! System controls (stay active while the game is paused)
//! - KeyP: pause / resume game controls
//! - KeyD: toggle per-event tracing of game controls
//! - Escape: quit
//!
//! Run with: cargo run -p controls_platform_desktop --example desktop_controls

use std::rc::Rc;

use controls_core::prelude::*;
use controls_platform::prelude::*;
use controls_platform_desktop::{DesktopEventLoop, DesktopInput, DesktopWindow};

#[derive(Default)]
struct Player {
    jumps: u32,
}

struct DemoControls {
    game: ControlsManager<Player>,
    /// Context is the quit flag
    system: ControlsManager<bool>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let input = Rc::new(DesktopInput::new());
    let event_loop = DesktopEventLoop::new(WindowConfig::new("Controls Demo").size(640, 480))?;

    let source = input.clone();
    let mut controls: Option<DemoControls> = None;

    event_loop.run(input, move |event, window| {
        match event {
            LoopEvent::Resumed => {
                if controls.is_none() {
                    controls = Some(build_controls(&source, window));
                }
            }
            LoopEvent::CloseRequested => return ControlFlow::Exit,
            LoopEvent::Frame => {
                if let Some(controls) = &controls {
                    let jumps = controls.game.context().jumps;
                    if *controls.system.context() {
                        tracing::info!("Quitting after {} jumps", jumps);
                        return ControlFlow::Exit;
                    }
                    let paused = if controls.game.is_enabled() { "" } else { " (paused)" };
                    window.set_title(&format!("Controls Demo - {jumps} jumps{paused}"));
                }
            }
            LoopEvent::Suspended => {}
        }
        ControlFlow::Continue
    })
}

fn build_controls(source: &Rc<DesktopInput>, window: &DesktopWindow) -> DemoControls {
    let game = ControlsManager::new(
        source.clone(),
        ControlsConfig::<Player>::default()
            .key_map(KeyBinding::new("Space").on_down(|player: &mut Player| {
                player.jumps += 1;
                tracing::info!("Jump #{}", player.jumps);
            }))
            .pointer_map(
                PointerBinding::new(window.target())
                    .suppress_default(true)
                    .on_down(|event| {
                        tracing::info!("{:?} pressed at ({}, {})", event.button, event.x, event.y)
                    })
                    .on_up(|event| {
                        tracing::info!("{:?} released at ({}, {})", event.button, event.x, event.y)
                    }),
            ),
    );

    let pause = game.handle();
    let debug = game.handle();
    let system = ControlsManager::new(
        source.clone(),
        ControlsConfig::new(false)
            .key_map(KeyBinding::new("KeyP").on_down(move |_: &mut bool| {
                pause.set_enabled(!pause.is_enabled());
                tracing::info!("Game controls enabled: {}", pause.is_enabled());
            }))
            .key_map(
                KeyBinding::new("KeyD")
                    .on_down(move |_: &mut bool| debug.set_debug(!debug.is_debug())),
            )
            .key_map(KeyBinding::new("Escape").on_down(|quit: &mut bool| *quit = true)),
    );

    DemoControls { game, system }
}
