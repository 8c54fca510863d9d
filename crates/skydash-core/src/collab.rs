use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::player::MovementMode;

/// Identity of a running session, carried by lobby-scoped wire messages and
/// by the terminal session event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub lobby_id: Uuid,
    pub level: String,
    pub player_name: String,
}

impl SessionInfo {
    pub fn new(lobby_id: Uuid, level: impl Into<String>, player_name: impl Into<String>) -> Self {
        Self {
            lobby_id,
            level: level.into(),
            player_name: player_name.into(),
        }
    }
}

/// Countdown display surface (HUD timer text or equivalent). Optional on a
/// session; a missing display is skipped silently.
pub trait TimerDisplay: Send {
    /// Called on every local change of the countdown value.
    fn update_timer(&mut self, time_left: f64);
}

/// Ambient audio surface. `fade_out` is invoked best-effort when the session
/// ends; failures must stay internal to the implementation.
pub trait AmbientAudio: Send {
    fn fade_out(&mut self);
}

/// Capability to switch movement modes. Implemented by the player body only;
/// the portal handler checks for it at dispatch and no-ops when absent.
pub trait ModeToggle {
    /// Flip to the other mode, returning the mode now active.
    fn toggle_mode(&mut self) -> MovementMode;
}
