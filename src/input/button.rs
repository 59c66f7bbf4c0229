use std::collections::{HashMap, HashSet};

use winit::keyboard::KeyCode;

use crate::game::GameEvent;

/// Edge-and-level state of one logical button for the current frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Button {
    pub is_held: bool,
    pub is_pressed: bool,
    pub is_released: bool,
}

/// The set of physical keys mapped onto one logical button.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ButtonBindings {
    pub keys: HashSet<KeyCode>,
}

impl ButtonBindings {
    pub fn keys(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

/// Tracks held bindings as a bitmask so a button with several bound keys
/// stays held until every one of them is released.
#[derive(Debug, Default)]
pub struct ButtonHandler {
    key_indices: HashMap<KeyCode, u8>,
    held_bindings: u32,
    is_pressed: bool,
    was_held: bool,
}

impl ButtonHandler {
    pub fn new(bindings: &ButtonBindings) -> Self {
        let key_indices = bindings
            .keys
            .iter()
            .copied()
            .enumerate()
            .map(|(index, code)| (code, index as u8))
            .collect();

        Self {
            key_indices,
            held_bindings: 0,
            is_pressed: false,
            was_held: false,
        }
    }

    pub fn event(&mut self, event: &GameEvent) {
        let GameEvent::Key { code, is_held } = event else {
            return;
        };

        let Some(index) = self.key_indices.get(code) else {
            return;
        };

        let binding_mask = 1 << index;
        let binding_was_held = self.held_bindings & binding_mask != 0;

        if *is_held && !binding_was_held {
            self.is_pressed = true;
        }

        self.held_bindings =
            (self.held_bindings & !binding_mask) | (binding_mask * *is_held as u32);
    }

    pub fn next_state(&mut self) -> Button {
        let state = Button {
            is_held: self.held_bindings != 0,
            is_pressed: self.is_pressed,
            is_released: self.was_held && self.held_bindings == 0,
        };

        self.was_held = state.is_held;
        self.is_pressed = false;

        state
    }
}
