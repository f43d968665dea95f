//! Keyboard state machine

use std::collections::HashMap;

use bitflags::bitflags;

use super::KeyCode;

/// Per-frame change of a key's analog value
pub const DEFAULT_SENSITIVITY: f64 = 0.1;

bitflags! {
    /// Modifier keys held when an event was raised
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Alt / Option
        const ALT   = 0b001;
        /// Shift
        const SHIFT = 0b010;
        /// Control
        const CTRL  = 0b100;
    }
}

/// State of a single watched key
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyState {
    /// Raw state from the latest event
    pub down: bool,
    /// Raw state seen at the previous update
    pub previous_down: bool,
    /// Held during this frame
    pub pressed: bool,
    /// Went down this frame
    pub hit: bool,
    /// Went up this frame
    pub lift: bool,
    /// Consecutive frames held
    pub hold: u32,
    /// Analog value ramping between 0 and 1 while held
    pub value: f64,
    /// Modifiers from the latest event
    pub modifiers: Modifiers,
}

impl KeyState {
    fn advance(&mut self, sensitivity: f64) {
        if self.down {
            self.pressed = true;
            self.hold += 1;
            self.hit = self.down != self.previous_down;
            self.lift = false;
            self.value = (self.value + sensitivity).min(1.0);
        } else {
            self.lift = self.down != self.previous_down;
            self.pressed = false;
            self.hit = false;
            self.hold = 0;
            self.value = (self.value - sensitivity).max(0.0);
        }
        self.previous_down = self.down;
    }
}

/// Tracks the keys gameplay code has asked about
#[derive(Debug, Clone)]
pub struct Keyboard {
    keys: HashMap<KeyCode, KeyState>,
    sensitivity: f64,
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard {
    /// Keyboard with the default sensitivity and no watched keys
    pub fn new() -> Self {
        Self::with_sensitivity(DEFAULT_SENSITIVITY)
    }

    /// Keyboard ramping analog values by `sensitivity` per frame
    pub fn with_sensitivity(sensitivity: f64) -> Self {
        Self {
            keys: HashMap::new(),
            sensitivity,
        }
    }

    /// Start tracking `code`; events for unwatched keys are ignored.
    pub fn watch(&mut self, code: KeyCode) {
        self.keys.entry(code).or_default();
    }

    /// State of `code`, registering it on first access.
    pub fn key(&mut self, code: KeyCode) -> &KeyState {
        self.keys.entry(code).or_default()
    }

    /// State of `code`; an unwatched key reads as released.
    pub fn state(&self, code: KeyCode) -> KeyState {
        self.keys.get(&code).copied().unwrap_or_default()
    }

    /// Feed a raw key event
    pub fn set_key_state(&mut self, code: KeyCode, down: bool, modifiers: Modifiers) {
        if let Some(state) = self.keys.get_mut(&code) {
            state.down = down;
            state.modifiers = modifiers;
        }
    }

    /// Feed a key-down event without modifiers
    pub fn press(&mut self, code: KeyCode) {
        self.set_key_state(code, true, Modifiers::empty());
    }

    /// Feed a key-up event without modifiers
    pub fn release(&mut self, code: KeyCode) {
        self.set_key_state(code, false, Modifiers::empty());
    }

    /// Advance every watched key by one frame
    pub fn update(&mut self) {
        let sensitivity = self.sensitivity;
        for state in self.keys.values_mut() {
            state.advance(sensitivity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unwatched_keys_ignore_events() {
        let mut keyboard = Keyboard::new();
        keyboard.press(KeyCode::Space);
        keyboard.update();

        assert!(!keyboard.state(KeyCode::Space).pressed);
    }

    #[test]
    fn test_hit_hold_lift_cycle() {
        let mut keyboard = Keyboard::new();
        keyboard.watch(KeyCode::Space);

        keyboard.press(KeyCode::Space);
        keyboard.update();
        let state = keyboard.state(KeyCode::Space);
        assert!(state.pressed && state.hit);
        assert_eq!(state.hold, 1);

        keyboard.update();
        let state = keyboard.state(KeyCode::Space);
        assert!(state.pressed && !state.hit);
        assert_eq!(state.hold, 2);

        keyboard.release(KeyCode::Space);
        keyboard.update();
        let state = keyboard.state(KeyCode::Space);
        assert!(state.lift && !state.pressed);
        assert_eq!(state.hold, 0);

        keyboard.update();
        assert!(!keyboard.state(KeyCode::Space).lift);
    }

    #[test]
    fn test_value_ramps_and_saturates() {
        let mut keyboard = Keyboard::with_sensitivity(0.25);
        keyboard.key(KeyCode::Right);
        keyboard.press(KeyCode::Right);

        for _ in 0..6 {
            keyboard.update();
        }
        assert_relative_eq!(keyboard.state(KeyCode::Right).value, 1.0);

        keyboard.release(KeyCode::Right);
        keyboard.update();
        assert_relative_eq!(keyboard.state(KeyCode::Right).value, 0.75);
    }

    #[test]
    fn test_modifiers_recorded() {
        let mut keyboard = Keyboard::new();
        keyboard.watch(KeyCode::A);
        keyboard.set_key_state(KeyCode::A, true, Modifiers::SHIFT | Modifiers::CTRL);

        assert!(keyboard.state(KeyCode::A).modifiers.contains(Modifiers::SHIFT));
    }
}
