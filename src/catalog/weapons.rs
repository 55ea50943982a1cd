//! Weapon types
//!
//! A weapon's stats at level `n` are `base + bonus * (n - 1)` for every field,
//! including the pattern parameters. [`WeaponDef::stats_at`] resolves them.

use crate::consts::MIN_FIRE_RATE_MS;
use serde::{Deserialize, Serialize};

/// Firing pattern with its base parameters. Counts are `u32`; the per-level
/// `count` bonus from [`LevelBonuses`] is added to whichever count the
/// pattern has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternDef {
    Straight,
    /// `count` shots fanned `angle` radians apart around the aim
    Spread { count: u32, angle: f32 },
    Laser,
    /// Persistent blades circling the player
    Orbit { count: u32, radius: f32, speed: f32 },
    Explosive { radius: f32 },
    Chain { count: u32, range: f32 },
    /// `count` shots evenly over the full circle
    Nova { count: u32 },
    /// Pulls back toward its launch point after a short flight
    Boomerang { return_speed: f32 },
    /// Stationary damage field
    Puddle { duration_ms: f32, tick_ms: f32 },
    Homing { strength: f32 },
    /// Expanding cone; `angle` is the full cone width
    Wave { angle: f32, range: f32 },
    /// Falls from the top edge around the player
    Rain { count: u32, spread: f32 },
    /// Helper turrets orbiting the player
    Turret { count: u32, range: f32 },
    Spin { spin_speed: f32 },
    Poison { damage: f32, duration_ms: f32 },
}

impl PatternDef {
    pub fn name(&self) -> &'static str {
        match self {
            PatternDef::Straight => "straight",
            PatternDef::Spread { .. } => "spread",
            PatternDef::Laser => "laser",
            PatternDef::Orbit { .. } => "orbit",
            PatternDef::Explosive { .. } => "explosive",
            PatternDef::Chain { .. } => "chain",
            PatternDef::Nova { .. } => "nova",
            PatternDef::Boomerang { .. } => "boomerang",
            PatternDef::Puddle { .. } => "puddle",
            PatternDef::Homing { .. } => "homing",
            PatternDef::Wave { .. } => "wave",
            PatternDef::Rain { .. } => "rain",
            PatternDef::Turret { .. } => "turret",
            PatternDef::Spin { .. } => "spin",
            PatternDef::Poison { .. } => "poison",
        }
    }
}

/// Per-level additive deltas. Fields a pattern does not use are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelBonuses {
    pub damage: f32,
    /// Usually negative: faster firing
    pub fire_rate_ms: f32,
    pub projectile_size: f32,
    /// Spread/orbit/chain/nova/rain/turret count
    pub count: f32,
    /// Orbit or explosion radius
    pub radius: f32,
    /// Chain or wave range
    pub range: f32,
    /// Wave cone width
    pub angle: f32,
    pub homing: f32,
    /// Puddle or poison duration
    pub duration_ms: f32,
    pub poison_damage: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub id: String,
    pub damage: f32,
    pub fire_rate_ms: f32,
    /// Pixels per reference frame
    pub projectile_speed: f32,
    pub projectile_size: f32,
    #[serde(default)]
    pub piercing: bool,
    pub max_level: u32,
    pub pattern: PatternDef,
    #[serde(default)]
    pub level_bonuses: LevelBonuses,
}

/// Weapon stats resolved for one level
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponStats {
    pub damage: f32,
    pub fire_rate_ms: f32,
    pub speed: f32,
    pub size: f32,
    pub piercing: bool,
    pub pattern: PatternDef,
}

fn add_count(base: u32, bonus: f32, steps: f32) -> u32 {
    (base as f32 + bonus * steps).max(0.0).round() as u32
}

impl WeaponDef {
    /// Neutral weapon substituted when an unknown id slips through
    pub fn fallback(id: &str) -> Self {
        WeaponDef {
            id: id.to_string(),
            damage: 5.0,
            fire_rate_ms: 500.0,
            projectile_speed: 5.0,
            projectile_size: 4.0,
            piercing: false,
            max_level: 5,
            pattern: PatternDef::Straight,
            level_bonuses: LevelBonuses {
                damage: 2.0,
                fire_rate_ms: -30.0,
                ..LevelBonuses::default()
            },
        }
    }

    pub fn stats_at(&self, level: u32) -> WeaponStats {
        let steps = level.saturating_sub(1) as f32;
        let b = &self.level_bonuses;
        let pattern = match &self.pattern {
            PatternDef::Straight => PatternDef::Straight,
            PatternDef::Laser => PatternDef::Laser,
            PatternDef::Spread { count, angle } => PatternDef::Spread {
                count: add_count(*count, b.count, steps),
                angle: *angle,
            },
            PatternDef::Orbit { count, radius, speed } => PatternDef::Orbit {
                count: add_count(*count, b.count, steps),
                radius: radius + b.radius * steps,
                speed: *speed,
            },
            PatternDef::Explosive { radius } => PatternDef::Explosive {
                radius: radius + b.radius * steps,
            },
            PatternDef::Chain { count, range } => PatternDef::Chain {
                count: add_count(*count, b.count, steps),
                range: range + b.range * steps,
            },
            PatternDef::Nova { count } => PatternDef::Nova {
                count: add_count(*count, b.count, steps),
            },
            PatternDef::Boomerang { return_speed } => PatternDef::Boomerang {
                return_speed: *return_speed,
            },
            PatternDef::Puddle { duration_ms, tick_ms } => PatternDef::Puddle {
                duration_ms: duration_ms + b.duration_ms * steps,
                tick_ms: *tick_ms,
            },
            PatternDef::Homing { strength } => PatternDef::Homing {
                strength: strength + b.homing * steps,
            },
            PatternDef::Wave { angle, range } => PatternDef::Wave {
                angle: angle + b.angle * steps,
                range: range + b.range * steps,
            },
            PatternDef::Rain { count, spread } => PatternDef::Rain {
                count: add_count(*count, b.count, steps),
                spread: *spread,
            },
            PatternDef::Turret { count, range } => PatternDef::Turret {
                count: add_count(*count, b.count, steps),
                range: range + b.range * steps,
            },
            PatternDef::Spin { spin_speed } => PatternDef::Spin {
                spin_speed: *spin_speed,
            },
            PatternDef::Poison { damage, duration_ms } => PatternDef::Poison {
                damage: damage + b.poison_damage * steps,
                duration_ms: duration_ms + b.duration_ms * steps,
            },
        };
        WeaponStats {
            damage: self.damage + b.damage * steps,
            fire_rate_ms: (self.fire_rate_ms + b.fire_rate_ms * steps).max(MIN_FIRE_RATE_MS),
            speed: self.projectile_speed,
            size: self.projectile_size + b.projectile_size * steps,
            piercing: self.piercing,
            pattern,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn weapon(
    id: &str,
    damage: f32,
    fire_rate_ms: f32,
    projectile_speed: f32,
    projectile_size: f32,
    piercing: bool,
    pattern: PatternDef,
    level_bonuses: LevelBonuses,
) -> WeaponDef {
    WeaponDef {
        id: id.to_string(),
        damage,
        fire_rate_ms,
        projectile_speed,
        projectile_size,
        piercing,
        max_level: 5,
        pattern,
        level_bonuses,
    }
}

/// Shipped weapon list, in offer order
pub fn builtin() -> Vec<WeaponDef> {
    use PatternDef::*;
    let lb = LevelBonuses::default;
    vec![
        weapon(
            "blood_shooter",
            10.0,
            400.0,
            8.0,
            6.0,
            false,
            Straight,
            LevelBonuses { damage: 5.0, fire_rate_ms: -50.0, projectile_size: 1.0, ..lb() },
        ),
        weapon(
            "skull_spreader",
            7.0,
            600.0,
            7.0,
            5.0,
            false,
            Spread { count: 3, angle: 0.4 },
            LevelBonuses { damage: 3.0, count: 1.0, fire_rate_ms: -30.0, ..lb() },
        ),
        weapon(
            "death_laser",
            15.0,
            800.0,
            12.0,
            4.0,
            true,
            Laser,
            LevelBonuses { damage: 8.0, fire_rate_ms: -80.0, projectile_size: 1.0, ..lb() },
        ),
        weapon(
            "cursed_orbit",
            8.0,
            100.0,
            0.0,
            10.0,
            false,
            Orbit { count: 3, radius: 80.0, speed: 0.03 },
            LevelBonuses { damage: 4.0, count: 1.0, radius: 15.0, ..lb() },
        ),
        weapon(
            "meat_cannon",
            25.0,
            1200.0,
            5.0,
            12.0,
            false,
            Explosive { radius: 60.0 },
            LevelBonuses { damage: 12.0, radius: 15.0, fire_rate_ms: -100.0, ..lb() },
        ),
        weapon(
            "ghost_chain",
            12.0,
            700.0,
            10.0,
            8.0,
            false,
            Chain { count: 3, range: 150.0 },
            LevelBonuses { damage: 6.0, count: 1.0, range: 30.0, ..lb() },
        ),
        weapon(
            "hellfire_nova",
            6.0,
            500.0,
            6.0,
            5.0,
            false,
            Nova { count: 8 },
            LevelBonuses { damage: 3.0, count: 2.0, fire_rate_ms: -40.0, ..lb() },
        ),
        weapon(
            "bone_boomerang",
            18.0,
            900.0,
            7.0,
            10.0,
            false,
            Boomerang { return_speed: 0.05 },
            LevelBonuses { damage: 8.0, projectile_size: 2.0, fire_rate_ms: -80.0, ..lb() },
        ),
        weapon(
            "toxic_puddle",
            4.0,
            1500.0,
            0.0,
            30.0,
            false,
            Puddle { duration_ms: 3000.0, tick_ms: 200.0 },
            LevelBonuses { damage: 2.0, projectile_size: 10.0, duration_ms: 500.0, ..lb() },
        ),
        weapon(
            "soul_seeker",
            8.0,
            600.0,
            5.0,
            6.0,
            false,
            Homing { strength: 0.08 },
            LevelBonuses { damage: 4.0, homing: 0.02, fire_rate_ms: -50.0, ..lb() },
        ),
        weapon(
            "scream_wave",
            5.0,
            800.0,
            0.0,
            100.0,
            false,
            Wave { angle: 1.2, range: 150.0 },
            LevelBonuses { damage: 3.0, range: 30.0, angle: 0.2, ..lb() },
        ),
        weapon(
            "blood_rain",
            7.0,
            300.0,
            8.0,
            4.0,
            false,
            Rain { count: 3, spread: 200.0 },
            LevelBonuses { damage: 3.0, count: 1.0, fire_rate_ms: -30.0, ..lb() },
        ),
        weapon(
            "eyeball_turret",
            6.0,
            400.0,
            9.0,
            4.0,
            false,
            Turret { count: 1, range: 200.0 },
            LevelBonuses { damage: 3.0, count: 1.0, fire_rate_ms: -40.0, ..lb() },
        ),
        weapon(
            "reaper_scythe",
            20.0,
            1000.0,
            4.0,
            20.0,
            true,
            Spin { spin_speed: 0.2 },
            LevelBonuses { damage: 10.0, projectile_size: 5.0, fire_rate_ms: -100.0, ..lb() },
        ),
        weapon(
            "poison_fang",
            5.0,
            500.0,
            10.0,
            5.0,
            false,
            Poison { damage: 2.0, duration_ms: 2000.0 },
            LevelBonuses { damage: 2.0, poison_damage: 1.0, duration_ms: 500.0, ..lb() },
        ),
    ]
}
