mod button;
pub use button::*;

use winit::keyboard::KeyCode;

use crate::game::GameEvent;

/// Polled input state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Input {
    pub quit: Button,
    pub fly: Button,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputBindings {
    pub quit: ButtonBindings,
    pub fly: ButtonBindings,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            quit: ButtonBindings::keys([KeyCode::Escape]),
            fly: ButtonBindings::keys([KeyCode::Space]),
        }
    }
}

#[derive(Debug)]
pub struct InputHandler {
    quit: ButtonHandler,
    fly: ButtonHandler,
}

impl InputHandler {
    pub fn new(bindings: &InputBindings) -> Self {
        Self {
            quit: ButtonHandler::new(&bindings.quit),
            fly: ButtonHandler::new(&bindings.fly),
        }
    }

    pub fn event(&mut self, event: &GameEvent) {
        self.quit.event(event);
        self.fly.event(event);
    }

    pub fn next_state(&mut self) -> Input {
        Input {
            quit: self.quit.next_state(),
            fly: self.fly.next_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, is_held: bool) -> GameEvent {
        GameEvent::Key { code, is_held }
    }

    #[test]
    fn fly_follows_the_space_key() {
        let mut handler = InputHandler::new(&InputBindings::default());

        handler.event(&key(KeyCode::Space, true));
        let state = handler.next_state();
        assert!(state.fly.is_held);
        assert!(state.fly.is_pressed);
        assert!(!state.quit.is_held);

        // Still held: no longer a fresh press.
        let state = handler.next_state();
        assert!(state.fly.is_held);
        assert!(!state.fly.is_pressed);

        handler.event(&key(KeyCode::Space, false));
        let state = handler.next_state();
        assert!(!state.fly.is_held);
        assert!(state.fly.is_released);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut handler = InputHandler::new(&InputBindings::default());

        handler.event(&key(KeyCode::KeyW, true));
        let state = handler.next_state();
        assert_eq!(state, Input::default());
    }
}
