//! Keyboard and touch input
//!
//! Movement, jump and throw are level-triggered (held keys keep acting).
//! Pause and resume are edge-triggered and cleared once a tick consumed them.

use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Left,
    Right,
    Jump,
    Throw,
    Pause,
    Resume,
}

/// On-screen buttons for touch devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Left,
    Right,
    Jump,
    Throw,
    Pause,
}

impl From<TouchButton> for Intent {
    fn from(button: TouchButton) -> Self {
        match button {
            TouchButton::Left => Intent::Left,
            TouchButton::Right => Intent::Right,
            TouchButton::Jump => Intent::Jump,
            TouchButton::Throw => Intent::Throw,
            TouchButton::Pause => Intent::Pause,
        }
    }
}

/// Map a `KeyboardEvent.key` value to an intent
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Intent::Left),
        "ArrowRight" | "d" | "D" => Some(Intent::Right),
        "ArrowUp" | "w" | "W" | " " => Some(Intent::Jump),
        "f" | "F" | "e" | "E" => Some(Intent::Throw),
        "Escape" | "p" | "P" => Some(Intent::Pause),
        "Enter" | "r" | "R" => Some(Intent::Resume),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    input: TickInput,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&mut self, intent: Intent, pressed: bool) {
        match intent {
            Intent::Left => self.input.left = pressed,
            Intent::Right => self.input.right = pressed,
            Intent::Jump => self.input.jump = pressed,
            Intent::Throw => self.input.throw = pressed,
            // Edges: only a press counts, release is ignored
            Intent::Pause => self.input.pause |= pressed,
            Intent::Resume => self.input.resume |= pressed,
        }
    }

    /// Returns true if the key is bound (callers prevent the default action)
    pub fn key_down(&mut self, key: &str) -> bool {
        match intent_for_key(key) {
            Some(intent) => {
                self.set(intent, true);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match intent_for_key(key) {
            Some(intent) => {
                self.set(intent, false);
                true
            }
            None => false,
        }
    }

    pub fn touch(&mut self, button: TouchButton, pressed: bool) {
        self.set(button.into(), pressed);
    }

    /// Intents for the next tick
    pub fn snapshot(&self) -> TickInput {
        self.input
    }

    /// Clear one-shot inputs after a tick processed them
    pub fn clear_edges(&mut self) {
        self.input.pause = false;
        self.input.resume = false;
    }

    /// Drop every held key (window blur, level change)
    pub fn release_all(&mut self) {
        self.input = TickInput::default();
    }
}
