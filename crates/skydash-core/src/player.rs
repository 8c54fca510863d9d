use serde::{Deserialize, Serialize};

use crate::collab::ModeToggle;
use crate::level::Aabb;

/// Player body width for AABB collision.
pub const PLAYER_WIDTH: f32 = 32.0;
/// Player body height for AABB collision.
pub const PLAYER_HEIGHT: f32 = 48.0;

/// Movement mode of the player body. Portals toggle between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementMode {
    #[default]
    Run,
    Flight,
}

/// The locally-simulated player body.
///
/// Coordinates are screen-style: +y points down, so `vy > 0` means falling.
/// Pose and velocity are integrated by the physics engine between ticks;
/// the session only mutates them through hazard and rider handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Center X position.
    pub x: f32,
    /// Center Y position.
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Engine-reported standing contact, corrected by the rider snap.
    pub grounded: bool,
    /// Spike debounce: overlaps are ignored while set.
    pub invulnerable: bool,
    /// Whether the player is currently carried by a kinematic platform.
    pub on_moving_platform: bool,
    pub mode: MovementMode,
    /// Horizontal offset from the carrying platform's center, established at
    /// landing. Landing-scoped: cleared when contact is lost.
    pub platform_relative_offset: Option<f32>,
    /// Last-tick X position, used to derive per-tick input displacement.
    /// Landing-scoped.
    pub previous_x: Option<f32>,
    /// Player-driven horizontal speed isolated from platform-imparted speed.
    /// Landing-scoped.
    pub input_velocity_x: Option<f32>,
}

impl PlayerBody {
    pub fn new(spawn_x: f32, spawn_y: f32) -> Self {
        Self {
            x: spawn_x,
            y: spawn_y,
            vx: 0.0,
            vy: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            grounded: false,
            invulnerable: false,
            on_moving_platform: false,
            mode: MovementMode::default(),
            platform_relative_offset: None,
            previous_x: None,
            input_velocity_x: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Y coordinate of the body's lowest edge (+y is down).
    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Drop all landing-scoped rider state. Called when platform contact is
    /// lost or the player jumps away.
    pub fn clear_ride_state(&mut self) {
        self.platform_relative_offset = None;
        self.previous_x = None;
        self.input_velocity_x = None;
    }
}

impl ModeToggle for PlayerBody {
    fn toggle_mode(&mut self) -> MovementMode {
        self.mode = match self.mode {
            MovementMode::Run => MovementMode::Flight,
            MovementMode::Flight => MovementMode::Run,
        };
        self.mode
    }
}
