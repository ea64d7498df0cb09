//! Input thread bootstrapping and event mapping.

pub mod events;
pub mod manager;

use crate::input::manager::InputManager;
use crate::system::bus::SystemBus;
use std::thread;

pub fn start_thread(bus: SystemBus, mut manager: InputManager) {
    thread::Builder::new()
        .name("Input Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Thread started");

            // Blocking loop: wait for an event, map it, forward it.
            // Keeps CPU usage at zero when idle.
            while let Ok(raw_event) = bus.raw_input_rx.recv() {
                if let Some(action) = manager.process(raw_event) {
                    if bus.action_tx.send(action).is_err() {
                        log::error!("INPUT: Logic thread gone, stopping");
                        break;
                    }
                }
            }

            log::info!("INPUT: Thread stopped");
        })
        .expect("Failed to spawn Input thread");
}
