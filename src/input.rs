use std::collections::HashMap;

use crate::math::units::screen;

/// Logical keys the simulation cares about. The host decides which physical
/// keys map to them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Crouch,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Click(screen::Point2D),
}

/// Held state of every logical key, consulted once per tick.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pressed: HashMap<Key, bool>,
    clicks: Vec<screen::Point2D>,
}

impl InputState {
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.pressed.insert(key, true);
            }
            InputEvent::KeyUp(key) => {
                self.pressed.insert(key, false);
            }
            InputEvent::Click(position) => self.clicks.push(position),
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.pressed.get(&key).copied().unwrap_or(false)
    }

    /// Clicks since the last call, oldest first.
    pub fn take_clicks(&mut self) -> Vec<screen::Point2D> {
        std::mem::take(&mut self.clicks)
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
        self.clicks.clear();
    }
}

impl FromIterator<Key> for InputState {
    fn from_iter<I: IntoIterator<Item = Key>>(keys: I) -> Self {
        let mut state = Self::default();
        for key in keys {
            state.handle(InputEvent::KeyDown(key));
        }
        state
    }
}
