//! Application entry point and thread bootstrapper.

mod app;
mod input;
mod logic;
mod models;
mod shared;
mod system;

use crate::input::manager::InputManager;
use crate::models::settings::Settings;
use crate::system::bus::SystemBus;

fn main() {
    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    log::info!("MAIN: Booting rflow...");

    let settings = Settings::load();
    let bus = SystemBus::new();

    input::start_thread(bus.clone(), InputManager::new());
    logic::start_thread(bus.clone(), settings);

    app::App::run(bus);
}
