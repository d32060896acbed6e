use serde::{Deserialize, Serialize};

/// A high-level action produced by the input layer.
///
/// Game logic consumes actions, never raw keys, so bindings can change
/// without touching the movement code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    /// Step away from the camera.
    MoveForward,
    /// Step towards the camera.
    MoveBackward,
    /// Step to the camera's left.
    MoveLeft,
    /// Step to the camera's right.
    MoveRight,
    /// Fade out and return to the spawn tile.
    Respawn,
}

impl Action {
    /// The (forward, right) intent of a movement action.
    pub fn move_intent(self) -> Option<(i32, i32)> {
        match self {
            Action::MoveForward => Some((1, 0)),
            Action::MoveBackward => Some((-1, 0)),
            Action::MoveLeft => Some((0, -1)),
            Action::MoveRight => Some((0, 1)),
            Action::Respawn => None,
        }
    }
}
