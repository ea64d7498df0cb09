//! Application window and event loop handler.
//!
//! Bridges winit keyboard events onto the bus and surfaces the latest
//! gameplay snapshot. Rendering proper is a separate consumer of the
//! snapshot stream; this shell only reflects session state in the title.

use crate::input::events::RawInputEvent;
use crate::logic::session::SessionPhase;
use crate::shared::snapshot::GameplaySnapshot;
use crate::system::bus::SystemBus;
use std::time::{Duration, Instant};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Snapshot poll cadence for the title bar.
const TITLE_REFRESH: Duration = Duration::from_millis(100);

pub struct App {
    bus: SystemBus,
    window: Option<Window>,
    last_title_update: Instant,
}

impl App {
    pub fn new(bus: SystemBus) -> Self {
        Self {
            bus,
            window: None,
            last_title_update: Instant::now(),
        }
    }

    /// Runs the application event loop (blocking).
    pub fn run(bus: SystemBus) {
        let event_loop = EventLoop::new().unwrap();
        let mut app = App::new(bus);
        let _ = event_loop.run_app(&mut app);
    }

    fn title_for(snapshot: &GameplaySnapshot) -> String {
        match snapshot.phase {
            SessionPhase::Idle if !snapshot.audio_available => {
                "rflow - no audio device, clock frozen".to_string()
            }
            SessionPhase::Idle => format!(
                "rflow - Enter to start, D/F/J/K to play | offset {:+.0}ms | x{:.1}",
                snapshot.offset_seconds * 1000.0,
                snapshot.scroll_speed,
            ),
            SessionPhase::Running => {
                let remaining = snapshot.notes.iter().filter(|n| n.is_pending()).count();
                format!(
                    "rflow - {:.1}s | combo {} | {:.2}% | {} | {} left",
                    snapshot.current_time,
                    snapshot.stats.combo,
                    snapshot.stats.accuracy,
                    snapshot.stats.last_judgement.map_or("-", |j| j.label()),
                    remaining,
                )
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            log::info!("MAIN: Creating window...");
            let attributes = Window::default_attributes()
                .with_title("rflow")
                .with_inner_size(winit::dpi::LogicalSize::new(640.0, 360.0));

            match event_loop.create_window(attributes) {
                Ok(window) => self.window = Some(window),
                Err(e) => {
                    log::error!("MAIN: Failed to create window: {e}");
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(raw_event) = RawInputEvent::from_winit(&event) {
            let _ = self.bus.raw_input_tx.send(raw_event);
            return;
        }

        if let WindowEvent::CloseRequested = event {
            log::info!("MAIN: Close requested");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Keep only the freshest snapshot; stale frames are worthless.
        if let Some(snapshot) = self.bus.snapshot_rx.try_iter().last()
            && self.last_title_update.elapsed() >= TITLE_REFRESH
            && let Some(window) = self.window.as_ref()
        {
            window.set_title(&Self::title_for(&snapshot));
            self.last_title_update = Instant::now();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + TITLE_REFRESH));
    }
}
