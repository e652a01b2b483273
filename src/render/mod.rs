//! Render collaborator contract and the render thread.
//!
//! A renderer only reads snapshots: it draws every active note (and tail),
//! removes every note in the exit set and refreshes the score line.

pub mod hud;

pub use hud::TextHud;

use std::io;
use std::thread::{self, JoinHandle};

use crate::state::game::GameState;
use crate::system::bus::SystemBus;

pub trait Renderer {
    fn render(&mut self, state: &GameState) -> io::Result<()>;

    /// Called when an engine instance stops, with its final snapshot.
    fn finish(&mut self, _state: &GameState) -> io::Result<()> {
        Ok(())
    }
}

/// Spawns the render thread. It exits when the render channel disconnects
/// or the renderer's output fails.
pub fn start_thread<R>(bus: &SystemBus, mut renderer: R) -> io::Result<JoinHandle<()>>
where
    R: Renderer + Send + 'static,
{
    let render_rx = bus.render_rx.clone();
    thread::Builder::new()
        .name("Render Thread".to_string())
        .spawn(move || {
            log::info!("RENDER: Thread started");
            let mut current_run = None;
            for frame in render_rx.iter() {
                if current_run != Some(frame.run) {
                    log::info!("RENDER: Run {}", frame.run);
                    current_run = Some(frame.run);
                }
                let result = if frame.state.game_end {
                    renderer.finish(&frame.state)
                } else {
                    renderer.render(&frame.state)
                };
                if let Err(e) = result {
                    log::error!("RENDER: Output failed: {}", e);
                    break;
                }
            }
            log::info!("RENDER: Thread stopped");
        })
}
