//! Experience orbs dropped on enemy death

use crate::consts::{ORB_LIFETIME_MS, ORB_MAGNET_RANGE, ORB_MAGNET_SPEED};
use crate::frame_scale;
use glam::Vec2;
use serde::Serialize;

/// Color tier by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbTier {
    Green,
    Purple,
    Gold,
}

/// What happened to an orb this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbStep {
    Idle,
    Collected,
    Expired,
}

#[derive(Debug, Clone)]
pub struct XpOrb {
    pub id: u32,
    pub pos: Vec2,
    pub value: u32,
    pub age_ms: f32,
}

impl XpOrb {
    pub fn new(id: u32, pos: Vec2, value: u32) -> Self {
        Self {
            id,
            pos,
            value,
            age_ms: 0.0,
        }
    }

    pub fn tier(&self) -> OrbTier {
        match self.value {
            v if v >= 50 => OrbTier::Gold,
            v if v >= 25 => OrbTier::Purple,
            _ => OrbTier::Green,
        }
    }

    pub fn visual_size(&self) -> f32 {
        (6.0 + self.value as f32 / 10.0).min(12.0)
    }

    /// Drift toward the player inside magnet range; collected inside the
    /// pickup radius. Expired orbs grant nothing.
    pub fn update(&mut self, dt_ms: f32, player: Vec2, pickup_range: f32) -> OrbStep {
        self.age_ms += dt_ms;
        if self.age_ms > ORB_LIFETIME_MS {
            return OrbStep::Expired;
        }

        let to_player = player - self.pos;
        let d = to_player.length();
        if d < pickup_range {
            return OrbStep::Collected;
        }
        if d < ORB_MAGNET_RANGE {
            let step = ORB_MAGNET_SPEED * frame_scale(dt_ms);
            self.pos = if step >= d {
                player
            } else {
                self.pos + to_player / d * step
            };
        }
        OrbStep::Idle
    }
}
