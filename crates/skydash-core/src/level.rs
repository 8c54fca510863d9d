use serde::{Deserialize, Serialize};

/// Axis-aligned box anchored at its center, matching the engine's body
/// convention. +y is down, so `top()` is the smaller Y edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Axis of travel for a kinematic platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionAxis {
    Horizontal,
    Vertical,
}

/// Scripted motion for a kinematic platform: a sine-eased yoyo sweep of
/// `range` units along `axis`, one leg taking `period_secs`. `range` is
/// signed; negative values travel toward -x / -y (up) first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionDef {
    pub axis: MotionAxis,
    pub range: f32,
    pub period_secs: f32,
}

/// A platform in a level. Static unless a motion descriptor is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub motion: Option<MotionDef>,
}

/// A jump pad launching players that land on it from above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpPadDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A spike hazard applying a time penalty on contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A portal toggling the player's movement mode on contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Static description of a level's interactive geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    /// World width in units.
    pub width: f32,
    /// World height in units.
    pub height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub jump_pads: Vec<JumpPadDef>,
    #[serde(default)]
    pub spikes: Vec<SpikeDef>,
    #[serde(default)]
    pub portals: Vec<PortalDef>,
}
