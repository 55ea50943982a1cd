//! Goreblade - real-time simulation core for a survivors-like arena game
//!
//! Core modules:
//! - `sim`: Session state machine, entities, collision and the death cascade
//! - `catalog`: Read-only enemy/boss/weapon/upgrade/character tables
//! - `tuning`: Data-driven game balance (waves, timings, resource caps)
//! - `audio`: Fire-and-forget sound notifications
//! - `rng`: Seeded random helpers (ranges, weighted pick, shuffle)

pub mod audio;
pub mod catalog;
pub mod error;
pub mod rng;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use catalog::Catalog;
pub use error::{CatalogError, ConfigError, GameResult};
pub use tuning::{LimitPreset, Limits, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame length the catalog's per-frame speeds are expressed in (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest step a single tick may take, in ms
    pub const MAX_FRAME_MS: f32 = 50.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 16.0;
    pub const PLAYER_BASE_HEALTH: f32 = 100.0;
    pub const PLAYER_BASE_SPEED: f32 = 4.0;
    pub const PLAYER_PICKUP_RANGE: f32 = 50.0;
    pub const PLAYER_MAX_WEAPONS: usize = 4;
    pub const PLAYER_INVINCIBLE_MS: f32 = 500.0;
    pub const XP_FIRST_LEVEL: u32 = 100;
    pub const XP_GROWTH: f32 = 1.5;

    /// Enemies may overshoot the arena by this much
    pub const ENEMY_BOUNDS_MARGIN: f32 = 50.0;
    pub const ENEMY_DEATH_MS: f32 = 200.0;
    pub const ENEMY_HIT_FLASH_MS: f32 = 100.0;

    /// Projectiles further than this outside the arena are culled
    pub const PROJECTILE_BOUNDS_MARGIN: f32 = 50.0;
    pub const PROJECTILE_LIFETIME_MS: f32 = 3000.0;
    pub const MIN_FIRE_RATE_MS: f32 = 100.0;

    /// XP orbs
    pub const ORB_LIFETIME_MS: f32 = 30_000.0;
    pub const ORB_MAGNET_RANGE: f32 = 100.0;
    pub const ORB_MAGNET_SPEED: f32 = 8.0;
}

/// Scale factor turning a per-reference-frame quantity into one for `dt_ms`
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::FRAME_MS
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Normalized angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Smallest absolute difference between two angles, in [0, π]
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let d = (normalize_angle(a) - normalize_angle(b)).abs();
    if d > PI { TAU - d } else { d }
}

/// Point at `radius` from `origin` in direction `theta`
#[inline]
pub fn polar_offset(origin: Vec2, radius: f32, theta: f32) -> Vec2 {
    origin + Vec2::new(radius * theta.cos(), radius * theta.sin())
}

/// Clamp a point into `[min, max]` on both axes
#[inline]
pub fn clamp_to_rect(p: Vec2, min: Vec2, max: Vec2) -> Vec2 {
    p.clamp(min, max)
}
