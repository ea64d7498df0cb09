use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A keyboard transition as delivered by the window, before mapping.
#[derive(Debug, Clone, Copy)]
pub struct RawInputEvent {
    pub keycode: KeyCode,
    pub state: ElementState,
}

impl RawInputEvent {
    /// Extracts a raw event from a winit window event.
    /// Hardware auto-repeat is dropped here; the manager additionally
    /// tracks held keys so a press is reported once per physical press.
    pub fn from_winit(event: &WindowEvent) -> Option<Self> {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(keycode),
                    state,
                    repeat: false,
                    ..
                },
            ..
        } = event
        {
            Some(Self {
                keycode: *keycode,
                state: *state,
            })
        } else {
            None
        }
    }
}

/// Discrete actions produced by the input mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameAction {
    // Gameplay
    Hit { lane: usize },
    Release { lane: usize },

    // Session control
    Start,
    Stop,
    Restart,

    // Tuning
    /// Judgement offset step in milliseconds.
    AdjustOffset(i32),
    /// Scroll speed step (presentation only).
    AdjustScroll(f32),
}
