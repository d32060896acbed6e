//! Input polling: keys and mouse state sampled once per frame, mapped to actions.
//!
//! # Invariants
//! - "Just pressed" holds for exactly the frame the key went down.
//! - Mouse delta accumulates within a frame and resets at frame end.

pub mod action;

pub use action::Action;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Keyboard keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    R,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Escape,
}

impl Key {
    /// Parse a single character as used by scripted input (`"wasd"`).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Key::W),
            'a' => Some(Key::A),
            's' => Some(Key::S),
            'd' => Some(Key::D),
            'r' => Some(Key::R),
            ' ' => Some(Key::Space),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Key to action table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(BTreeMap<Key, Action>);

impl KeyBindings {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn bind(&mut self, key: Key, action: Action) {
        self.0.insert(key, action);
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.0.get(&key).copied()
    }

    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = Key> + '_ {
        self.0
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(k, _)| *k)
    }
}

impl Default for KeyBindings {
    /// WASD and arrow keys for movement, R to respawn.
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(Key::W, Action::MoveForward);
        bindings.bind(Key::S, Action::MoveBackward);
        bindings.bind(Key::A, Action::MoveLeft);
        bindings.bind(Key::D, Action::MoveRight);
        bindings.bind(Key::ArrowUp, Action::MoveForward);
        bindings.bind(Key::ArrowDown, Action::MoveBackward);
        bindings.bind(Key::ArrowLeft, Action::MoveLeft);
        bindings.bind(Key::ArrowRight, Action::MoveRight);
        bindings.bind(Key::R, Action::Respawn);
        bindings
    }
}

/// Input sampled for the current frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Auto-repeat (pressing a held key) is not a new press.
    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn press_mouse(&mut self, button: MouseButton) {
        self.mouse_buttons.insert(button);
    }

    pub fn release_mouse(&mut self, button: MouseButton) {
        self.mouse_buttons.remove(&button);
    }

    pub fn move_mouse(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn was_key_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn was_action_just_pressed(&self, action: Action, bindings: &KeyBindings) -> bool {
        bindings
            .keys_for(action)
            .any(|key| self.was_key_just_pressed(key))
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Forget per-frame edges. Call once after every frame's update.
    pub fn end_frame(&mut self) {
        if !self.just_pressed.is_empty() {
            tracing::trace!(keys = self.just_pressed.len(), "clearing pressed keys");
        }
        self.just_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}

pub fn crate_info() -> &'static str {
    "tilecube-input v0.1.0"
}
