//! Input thread bootstrapping and key event routing.

pub mod bindings;
pub mod events;
pub mod manager;

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::select;

use crate::input::events::InputCommand;
use crate::input::manager::InputManager;
use crate::system::bus::SystemBus;

pub fn start_thread(bus: SystemBus, mut manager: InputManager) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("Input Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Thread started");

            loop {
                select! {
                    recv(bus.raw_input_rx) -> raw => {
                        match raw {
                            Ok(raw_event) => {
                                if let Some(action) = manager.process(&raw_event) {
                                    if let Err(e) = bus.action_tx.send(action) {
                                        log::error!("INPUT: Failed to send action (Logic thread died?): {}", e);
                                        break;
                                    }
                                }
                            }
                            Err(_) => break,
                        }
                    }
                    recv(bus.input_cmd_rx) -> cmd => {
                        match cmd {
                            Ok(InputCommand::ReloadKeybinds(settings)) => manager.reload_keybinds(&settings),
                            Err(_) => break,
                        }
                    }
                }
            }

            log::info!("INPUT: Thread stopped");
        })
}
