use super::events::{GameAction, RawInputEvent};
use crate::models::chart::LANE_COUNT;
use std::collections::HashMap;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Maps raw keyboard transitions to discrete gameplay actions.
///
/// Lane keys are a fixed 4-key table. A held lane key reports exactly one
/// `Hit` until its release clears the flag, regardless of how many press
/// events the device delivers. Unmapped keys produce nothing.
pub struct InputManager {
    lane_bindings: HashMap<KeyCode, usize>,
    lane_held: [bool; LANE_COUNT],
}

impl InputManager {
    pub fn new() -> Self {
        let mut lane_bindings = HashMap::new();
        lane_bindings.insert(KeyCode::KeyD, 0);
        lane_bindings.insert(KeyCode::KeyF, 1);
        lane_bindings.insert(KeyCode::KeyJ, 2);
        lane_bindings.insert(KeyCode::KeyK, 3);

        Self {
            lane_bindings,
            lane_held: [false; LANE_COUNT],
        }
    }

    pub fn process(&mut self, event: RawInputEvent) -> Option<GameAction> {
        if let Some(&lane) = self.lane_bindings.get(&event.keycode) {
            return match event.state {
                ElementState::Pressed => {
                    if self.lane_held[lane] {
                        None
                    } else {
                        self.lane_held[lane] = true;
                        Some(GameAction::Hit { lane })
                    }
                }
                ElementState::Released => {
                    self.lane_held[lane] = false;
                    Some(GameAction::Release { lane })
                }
            };
        }

        if event.state != ElementState::Pressed {
            return None;
        }

        match event.keycode {
            KeyCode::Enter => Some(GameAction::Start),
            KeyCode::Escape => Some(GameAction::Stop),
            KeyCode::F5 => Some(GameAction::Restart),
            KeyCode::F3 => Some(GameAction::AdjustOffset(-5)),
            KeyCode::F4 => Some(GameAction::AdjustOffset(5)),
            KeyCode::F1 => Some(GameAction::AdjustScroll(-0.1)),
            KeyCode::F2 => Some(GameAction::AdjustScroll(0.1)),
            _ => None,
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(keycode: KeyCode) -> RawInputEvent {
        RawInputEvent {
            keycode,
            state: ElementState::Pressed,
        }
    }

    fn release(keycode: KeyCode) -> RawInputEvent {
        RawInputEvent {
            keycode,
            state: ElementState::Released,
        }
    }

    #[test]
    fn test_lane_keys_map_in_order() {
        let mut manager = InputManager::new();
        let keys = [KeyCode::KeyD, KeyCode::KeyF, KeyCode::KeyJ, KeyCode::KeyK];
        for (lane, key) in keys.into_iter().enumerate() {
            assert_eq!(manager.process(press(key)), Some(GameAction::Hit { lane }));
            manager.process(release(key));
        }
    }

    #[test]
    fn test_held_key_reports_once() {
        let mut manager = InputManager::new();
        assert_eq!(
            manager.process(press(KeyCode::KeyD)),
            Some(GameAction::Hit { lane: 0 })
        );
        // Repeated down while held is swallowed.
        assert_eq!(manager.process(press(KeyCode::KeyD)), None);
        assert_eq!(manager.process(press(KeyCode::KeyD)), None);
        assert_eq!(
            manager.process(release(KeyCode::KeyD)),
            Some(GameAction::Release { lane: 0 })
        );
        // Release re-arms the key.
        assert_eq!(
            manager.process(press(KeyCode::KeyD)),
            Some(GameAction::Hit { lane: 0 })
        );
    }

    #[test]
    fn test_unmapped_keys_are_ignored() {
        let mut manager = InputManager::new();
        assert_eq!(manager.process(press(KeyCode::KeyQ)), None);
        assert_eq!(manager.process(release(KeyCode::KeyQ)), None);
    }

    #[test]
    fn test_control_keys_fire_on_press_only() {
        let mut manager = InputManager::new();
        assert_eq!(manager.process(press(KeyCode::Enter)), Some(GameAction::Start));
        assert_eq!(manager.process(release(KeyCode::Enter)), None);
        assert_eq!(
            manager.process(press(KeyCode::F3)),
            Some(GameAction::AdjustOffset(-5))
        );
        assert_eq!(
            manager.process(press(KeyCode::F2)),
            Some(GameAction::AdjustScroll(0.1))
        );
    }
}
