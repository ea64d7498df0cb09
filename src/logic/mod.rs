//! Logic thread: drives the session state machine at a fixed tick rate.

pub mod audio;
pub mod audio_thread;
pub mod game_loop;
pub mod session;

use crate::models::settings::Settings;
use crate::system::bus::SystemBus;
use std::thread;

/// Spawns the audio thread and the logic thread.
pub fn start_thread(bus: SystemBus, settings: Settings) {
    audio_thread::start_audio_thread(bus.clone());

    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");

            let mut logic = game_loop::LogicLoop::new(bus, settings);
            logic.run();

            log::info!("LOGIC: Thread stopped");
        })
        .expect("Failed to spawn Logic thread");
}
