use std::f32::consts::PI;

use skydash_core::level::{MotionAxis, MotionDef};

/// Sampled pose and velocity of a kinematic platform for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Scripted back-and-forth path for one platform.
///
/// The path eases out from the origin to origin + range over one period,
/// then back, repeating forever. With sinusoidal easing that collapses to
/// `offset(t) = range * (1 - cos(pi * t / period)) / 2`, with velocity
/// `range * pi / (2 * period) * sin(pi * t / period)`; a full cycle takes
/// two periods.
#[derive(Debug, Clone)]
pub struct PlatformMotion {
    def: MotionDef,
    origin_x: f32,
    origin_y: f32,
    elapsed: f32,
}

impl PlatformMotion {
    pub fn new(def: MotionDef, origin_x: f32, origin_y: f32) -> Self {
        Self {
            def,
            origin_x,
            origin_y,
            elapsed: 0.0,
        }
    }

    /// Advance the path by `dt` seconds and sample the new pose.
    pub fn advance(&mut self, dt: f32) -> MotionSample {
        self.elapsed += dt;
        let cycle = 2.0 * self.def.period_secs;
        // Wrap to keep phase precision over long sessions.
        if self.elapsed >= cycle {
            self.elapsed -= cycle;
        }
        self.sample()
    }

    /// Current pose without advancing.
    pub fn sample(&self) -> MotionSample {
        let phase = PI * self.elapsed / self.def.period_secs;
        let offset = self.def.range * (1.0 - phase.cos()) / 2.0;
        let speed = self.def.range * PI / (2.0 * self.def.period_secs) * phase.sin();
        match self.def.axis {
            MotionAxis::Horizontal => MotionSample {
                x: self.origin_x + offset,
                y: self.origin_y,
                vx: speed,
                vy: 0.0,
            },
            MotionAxis::Vertical => MotionSample {
                x: self.origin_x,
                y: self.origin_y + offset,
                vx: 0.0,
                vy: speed,
            },
        }
    }
}
