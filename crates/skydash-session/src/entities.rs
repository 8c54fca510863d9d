use skydash_core::level::{Aabb, LevelDef};

use crate::motion::PlatformMotion;

/// Identifier the physics layer uses to name interactive bodies.
pub type BodyId = u32;

/// What kind of body a [`BodyId`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Platform,
    JumpPad,
    Spike,
    Portal,
}

/// A platform at runtime. Kinematic when it carries a motion path.
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: BodyId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    /// Platforms never yield to the player in collision resolution.
    pub immovable: bool,
    pub motion: Option<PlatformMotion>,
}

impl Platform {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_kinematic(&self) -> bool {
        self.motion.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct JumpPad {
    pub id: BodyId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Set while the pad refuses re-triggering after a launch.
    pub cooldown: bool,
}

impl JumpPad {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct Spike {
    pub id: BodyId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Spike {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone)]
pub struct Portal {
    pub id: BodyId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Cleared while the portal is debounced after a toggle.
    pub enabled: bool,
}

impl Portal {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }
}

/// All interactive bodies of a running session.
#[derive(Debug, Default)]
pub struct Entities {
    pub platforms: Vec<Platform>,
    pub jump_pads: Vec<JumpPad>,
    pub spikes: Vec<Spike>,
    pub portals: Vec<Portal>,
}

impl Entities {
    /// Build runtime records from a level definition, assigning consecutive
    /// ids starting at `first_id`.
    ///
    /// A motion entry with a non-positive period cannot be animated and is
    /// dropped with a warning, leaving the platform static.
    pub fn from_level(level: &LevelDef, first_id: BodyId) -> Self {
        let mut next_id = first_id;
        let mut id = || {
            let assigned = next_id;
            next_id += 1;
            assigned
        };

        let platforms = level
            .platforms
            .iter()
            .map(|def| {
                let motion = match &def.motion {
                    Some(m) if m.period_secs > 0.0 => {
                        Some(PlatformMotion::new(*m, def.x, def.y))
                    }
                    Some(m) => {
                        tracing::warn!(
                            x = def.x,
                            y = def.y,
                            period = m.period_secs,
                            "Dropping platform motion with non-positive period"
                        );
                        None
                    }
                    None => None,
                };
                Platform {
                    id: id(),
                    x: def.x,
                    y: def.y,
                    width: def.width,
                    height: def.height,
                    vx: 0.0,
                    vy: 0.0,
                    immovable: true,
                    motion,
                }
            })
            .collect();

        let jump_pads = level
            .jump_pads
            .iter()
            .map(|def| JumpPad {
                id: id(),
                x: def.x,
                y: def.y,
                width: def.width,
                height: def.height,
                cooldown: false,
            })
            .collect();

        let spikes = level
            .spikes
            .iter()
            .map(|def| Spike {
                id: id(),
                x: def.x,
                y: def.y,
                width: def.width,
                height: def.height,
            })
            .collect();

        let portals = level
            .portals
            .iter()
            .map(|def| Portal {
                id: id(),
                x: def.x,
                y: def.y,
                width: def.width,
                height: def.height,
                enabled: true,
            })
            .collect();

        Self {
            platforms,
            jump_pads,
            spikes,
            portals,
        }
    }

    pub fn kind_of(&self, id: BodyId) -> Option<EntityKind> {
        if self.platforms.iter().any(|p| p.id == id) {
            Some(EntityKind::Platform)
        } else if self.jump_pads.iter().any(|p| p.id == id) {
            Some(EntityKind::JumpPad)
        } else if self.spikes.iter().any(|s| s.id == id) {
            Some(EntityKind::Spike)
        } else if self.portals.iter().any(|p| p.id == id) {
            Some(EntityKind::Portal)
        } else {
            None
        }
    }

    pub fn platform(&self, id: BodyId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    pub fn platform_mut(&mut self, id: BodyId) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.id == id)
    }

    pub fn jump_pad_mut(&mut self, id: BodyId) -> Option<&mut JumpPad> {
        self.jump_pads.iter_mut().find(|p| p.id == id)
    }

    pub fn portal_mut(&mut self, id: BodyId) -> Option<&mut Portal> {
        self.portals.iter_mut().find(|p| p.id == id)
    }

    /// Advance every kinematic platform, refreshing pose and velocity from
    /// its motion path.
    pub fn advance_motion(&mut self, dt: f32) {
        for platform in &mut self.platforms {
            if let Some(motion) = platform.motion.as_mut() {
                let sample = motion.advance(dt);
                platform.x = sample.x;
                platform.y = sample.y;
                platform.vx = sample.vx;
                platform.vy = sample.vy;
            }
        }
    }
}
