//! Projectiles
//!
//! A projectile owns its motion and lifetime. Hit resolution against enemies
//! is done by the orchestrator in `collision`, which needs the whole world.

use crate::catalog::{PatternDef, WeaponStats};
use crate::consts::{PROJECTILE_BOUNDS_MARGIN, PROJECTILE_LIFETIME_MS};
use crate::frame_scale;
use crate::sim::enemy::Enemy;
use glam::Vec2;
use serde::Serialize;

/// Boomerang turns around after this long
pub const BOOMERANG_RETURN_AFTER_MS: f32 = 400.0;
/// Boomerang is caught within this distance of its launch point
pub const BOOMERANG_CATCH_RADIUS: f32 = 20.0;
/// Boomerang and spin may hit the same enemy again after this long
pub const REHIT_COOLDOWN_MS: f32 = 300.0;
/// Cone attacks sweep out to full range over this window
pub const WAVE_SWEEP_MS: f32 = 200.0;
/// Homing projectiles never exceed this multiple of their launch speed
pub const HOMING_SPEED_CAP: f32 = 1.5;
/// Horizontal spawn line for rain, just above the arena
pub const RAIN_SPAWN_Y: f32 = -20.0;

/// Who a projectile can hurt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    /// Fired by the player's weapons; hits enemies
    Player,
    /// Fired by bosses; hits the player
    Hostile,
}

/// Pattern-specific runtime state
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileKind {
    /// Straight, spread, nova, laser, rain, turret and hostile shots
    Basic,
    Explosive { radius: f32 },
    Chain { remaining: u32, range: f32 },
    Boomerang { origin: Vec2, returning: bool, return_speed: f32 },
    Homing { strength: f32, target: Option<u32> },
    Puddle { tick_ms: f32, since_tick_ms: f32 },
    Wave { cone: f32, range: f32 },
    Spin { spin_speed: f32, spin: f32 },
    Poison { damage: f32, duration_ms: f32 },
}

/// Enemy recently hit by a multi-hit projectile
#[derive(Debug, Clone, Copy, PartialEq)]
struct HitMark {
    enemy: u32,
    /// `None` never expires
    remaining_ms: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub faction: Faction,
    /// Weapon type that fired it (empty for hostile shots)
    pub weapon_id: String,
    /// Pattern name for presentation
    pub pattern: &'static str,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    /// Firing angle
    pub angle: f32,
    pub speed: f32,
    pub damage: f32,
    pub size: f32,
    pub piercing: bool,
    pub age_ms: f32,
    pub max_age_ms: f32,
    hits: Vec<HitMark>,
}

impl Projectile {
    /// Player projectile from resolved weapon stats
    pub fn from_weapon(weapon_id: &str, stats: &WeaponStats, pos: Vec2, angle: f32, damage_mult: f32) -> Self {
        let mut max_age_ms = PROJECTILE_LIFETIME_MS;
        let kind = match &stats.pattern {
            PatternDef::Explosive { radius } => ProjectileKind::Explosive { radius: *radius },
            PatternDef::Chain { count, range } => ProjectileKind::Chain {
                remaining: *count,
                range: *range,
            },
            PatternDef::Boomerang { return_speed } => ProjectileKind::Boomerang {
                origin: pos,
                returning: false,
                return_speed: *return_speed,
            },
            PatternDef::Homing { strength } => ProjectileKind::Homing {
                strength: *strength,
                target: None,
            },
            PatternDef::Puddle { duration_ms, tick_ms } => {
                max_age_ms = *duration_ms;
                ProjectileKind::Puddle {
                    tick_ms: *tick_ms,
                    since_tick_ms: 0.0,
                }
            }
            PatternDef::Wave { angle, range } => {
                max_age_ms = WAVE_SWEEP_MS;
                ProjectileKind::Wave {
                    cone: *angle,
                    range: *range,
                }
            }
            PatternDef::Spin { spin_speed } => ProjectileKind::Spin {
                spin_speed: *spin_speed,
                spin: 0.0,
            },
            PatternDef::Poison { damage, duration_ms } => ProjectileKind::Poison {
                damage: *damage * damage_mult,
                duration_ms: *duration_ms,
            },
            _ => ProjectileKind::Basic,
        };
        Self {
            id: 0,
            faction: Faction::Player,
            weapon_id: weapon_id.to_string(),
            pattern: stats.pattern.name(),
            kind,
            pos,
            vel: Vec2::from_angle(angle) * stats.speed,
            angle,
            speed: stats.speed,
            damage: stats.damage * damage_mult,
            size: stats.size,
            piercing: stats.piercing,
            age_ms: 0.0,
            max_age_ms,
            hits: Vec::new(),
        }
    }

    /// Boss shot aimed at the player
    pub fn hostile(pos: Vec2, angle: f32, speed: f32, size: f32, damage: f32) -> Self {
        Self {
            id: 0,
            faction: Faction::Hostile,
            weapon_id: String::new(),
            pattern: "hostile",
            kind: ProjectileKind::Basic,
            pos,
            vel: Vec2::from_angle(angle) * speed,
            angle,
            speed,
            damage,
            size,
            piercing: false,
            age_ms: 0.0,
            max_age_ms: PROJECTILE_LIFETIME_MS,
            hits: Vec::new(),
        }
    }

    /// Advance motion and timers. Returns false once the projectile is spent.
    pub fn update(&mut self, dt_ms: f32, enemies: &[Enemy]) -> bool {
        self.age_ms += dt_ms;
        let fs = frame_scale(dt_ms);

        self.hits.retain_mut(|h| match h.remaining_ms.as_mut() {
            Some(ms) => {
                *ms -= dt_ms;
                *ms > 0.0
            }
            None => true,
        });

        match &mut self.kind {
            ProjectileKind::Boomerang {
                origin,
                returning,
                return_speed,
            } => {
                if !*returning && self.age_ms > BOOMERANG_RETURN_AFTER_MS {
                    *returning = true;
                }
                if *returning {
                    let to_origin = *origin - self.pos;
                    if to_origin.length() < BOOMERANG_CATCH_RADIUS {
                        return false;
                    }
                    self.vel += to_origin * *return_speed * fs;
                }
            }
            ProjectileKind::Homing { strength, target } => {
                let current = (*target).and_then(|id| enemies.iter().find(|e| e.id == id && !e.is_dying()));
                let chosen = match current {
                    Some(e) => Some(e),
                    None => nearest_living(enemies, self.pos),
                };
                *target = chosen.map(|e| e.id);
                if let Some(e) = chosen {
                    let dir = (e.pos - self.pos).normalize_or_zero();
                    self.vel += dir * *strength * self.speed * fs;
                    let cap = self.speed * HOMING_SPEED_CAP;
                    self.vel = self.vel.clamp_length_max(cap);
                }
            }
            ProjectileKind::Puddle { since_tick_ms, .. } => {
                *since_tick_ms += dt_ms;
                return self.age_ms < self.max_age_ms;
            }
            ProjectileKind::Wave { .. } => {
                return self.age_ms < self.max_age_ms;
            }
            ProjectileKind::Spin { spin_speed, spin } => {
                *spin += *spin_speed * fs;
            }
            _ => {}
        }

        self.pos += self.vel * fs;
        self.age_ms <= self.max_age_ms
    }

    /// Stationary effects never leave; everything else is culled past the margin
    pub fn out_of_bounds(&self, arena: Vec2) -> bool {
        if self.is_stationary() {
            return false;
        }
        let m = PROJECTILE_BOUNDS_MARGIN;
        self.pos.x < -m || self.pos.x > arena.x + m || self.pos.y < -m || self.pos.y > arena.y + m
    }

    pub fn is_stationary(&self) -> bool {
        matches!(self.kind, ProjectileKind::Puddle { .. } | ProjectileKind::Wave { .. })
    }

    /// Re-hit rule for projectiles that survive a hit: `Some(None)` means each
    /// enemy once, `Some(Some(ms))` means again after `ms`. `None` for
    /// projectiles that are consumed by their first hit.
    pub fn rehit_rule(&self) -> Option<Option<f32>> {
        match self.kind {
            ProjectileKind::Boomerang { .. } | ProjectileKind::Spin { .. } => Some(Some(REHIT_COOLDOWN_MS)),
            _ if self.piercing => Some(None),
            _ => None,
        }
    }

    pub fn has_hit(&self, enemy: u32) -> bool {
        self.hits.iter().any(|h| h.enemy == enemy)
    }

    pub fn mark_hit(&mut self, enemy: u32, cooldown_ms: Option<f32>) {
        if let Some(h) = self.hits.iter_mut().find(|h| h.enemy == enemy) {
            h.remaining_ms = cooldown_ms;
        } else {
            self.hits.push(HitMark {
                enemy,
                remaining_ms: cooldown_ms,
            });
        }
    }

    /// Current radius of a cone attack
    pub fn wave_reach(&self) -> f32 {
        match self.kind {
            ProjectileKind::Wave { range, .. } => range * (self.age_ms / WAVE_SWEEP_MS).min(1.0),
            _ => 0.0,
        }
    }

    /// Consume a puddle damage tick if one is due
    pub fn take_puddle_tick(&mut self) -> bool {
        if let ProjectileKind::Puddle { tick_ms, since_tick_ms } = &mut self.kind {
            if *since_tick_ms >= *tick_ms {
                *since_tick_ms -= *tick_ms;
                return true;
            }
        }
        false
    }
}

/// Nearest enemy that is not dying
pub fn nearest_living(enemies: &[Enemy], from: Vec2) -> Option<&Enemy> {
    enemies
        .iter()
        .filter(|e| !e.is_dying())
        .min_by(|a, b| a.pos.distance_squared(from).total_cmp(&b.pos.distance_squared(from)))
}
