//! Weapon instances held by the player
//!
//! Each weapon gates its own firing on `now - last_fired >= fire_rate`.
//! Orbit weapons keep persistent blades instead of firing; turret weapons
//! keep helper turrets that fire on their own clocks.

use crate::catalog::{PatternDef, WeaponDef, WeaponStats};
use crate::rng::GameRng;
use crate::sim::enemy::Enemy;
use crate::sim::projectile::{Projectile, RAIN_SPAWN_Y};
use crate::{frame_scale, polar_offset};
use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Per-enemy re-hit cooldown for orbit blades
pub const ORBIT_REHIT_MS: f32 = 500.0;
/// Turret distance from the player
pub const TURRET_DISTANCE: f32 = 60.0;
/// Turret orbit speed, radians per ms
pub const TURRET_SPIN_PER_MS: f32 = 0.001;
/// Puddles land within this offset of the player
pub const PUDDLE_SCATTER: f32 = 50.0;

/// Blade circling the player for an orbit weapon
#[derive(Debug, Clone)]
pub struct OrbitBlade {
    pub angle: f32,
    pub radius: f32,
    /// Radians per reference frame
    pub speed: f32,
    pub damage: f32,
    pub size: f32,
    pub pos: Vec2,
    cooldowns: Vec<(u32, f32)>,
}

impl OrbitBlade {
    fn update(&mut self, center: Vec2, dt_ms: f32) {
        self.angle += self.speed * frame_scale(dt_ms);
        self.pos = polar_offset(center, self.radius, self.angle);
        self.cooldowns.retain_mut(|(_, ms)| {
            *ms -= dt_ms;
            *ms > 0.0
        });
    }

    pub fn can_hit(&self, enemy: u32) -> bool {
        !self.cooldowns.iter().any(|(id, _)| *id == enemy)
    }

    pub fn register_hit(&mut self, enemy: u32) {
        self.cooldowns.retain(|(id, _)| *id != enemy);
        self.cooldowns.push((enemy, ORBIT_REHIT_MS));
    }
}

/// Floating helper that fires at the nearest enemy in range
#[derive(Debug, Clone)]
pub struct Turret {
    pub angle: f32,
    pub distance: f32,
    pub last_fired: f64,
    pub pos: Vec2,
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub def: WeaponDef,
    pub level: u32,
    /// Game time of the last shot, ms
    pub last_fired: f64,
    stats: WeaponStats,
    pub blades: Vec<OrbitBlade>,
    pub turrets: Vec<Turret>,
}

impl Weapon {
    pub fn new(def: &WeaponDef, level: u32, damage_mult: f32) -> Self {
        let level = level.clamp(1, def.max_level.max(1));
        let mut weapon = Self {
            def: def.clone(),
            level,
            last_fired: 0.0,
            stats: def.stats_at(level),
            blades: Vec::new(),
            turrets: Vec::new(),
        };
        weapon.rebuild_blades(damage_mult);
        weapon
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn stats(&self) -> &WeaponStats {
        &self.stats
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.def.max_level
    }

    /// Raise the level by one; false when already maxed
    pub fn level_up(&mut self, damage_mult: f32) -> bool {
        if self.is_max_level() {
            return false;
        }
        self.level += 1;
        self.stats = self.def.stats_at(self.level);
        self.rebuild_blades(damage_mult);
        true
    }

    fn rebuild_blades(&mut self, damage_mult: f32) {
        self.blades.clear();
        if let PatternDef::Orbit { count, radius, speed } = self.stats.pattern {
            let n = count.max(1);
            for i in 0..n {
                self.blades.push(OrbitBlade {
                    angle: TAU / n as f32 * i as f32,
                    radius,
                    speed,
                    damage: self.stats.damage * damage_mult,
                    size: self.stats.size,
                    pos: Vec2::ZERO,
                    cooldowns: Vec::new(),
                });
            }
        }
    }

    /// Orbit and turret weapons never fire through [`Weapon::fire`]
    pub fn fires_directly(&self) -> bool {
        !matches!(self.stats.pattern, PatternDef::Orbit { .. } | PatternDef::Turret { .. })
    }

    pub fn can_fire(&self, now: f64) -> bool {
        now - self.last_fired >= self.stats.fire_rate_ms as f64
    }

    /// Fire at `aim` if the weapon is ready. Returns no projectiles when
    /// gated by the fire rate.
    pub fn fire(&mut self, origin: Vec2, aim: f32, now: f64, damage_mult: f32, rng: &mut GameRng) -> Vec<Projectile> {
        if !self.can_fire(now) {
            return Vec::new();
        }
        self.last_fired = now;

        let id = self.def.id.as_str();
        let stats = &self.stats;
        let shot = |pos: Vec2, angle: f32| Projectile::from_weapon(id, stats, pos, angle, damage_mult);

        match stats.pattern {
            PatternDef::Spread { count, angle } => {
                let total = angle * count.saturating_sub(1) as f32;
                let start = aim - total / 2.0;
                (0..count).map(|i| shot(origin, start + angle * i as f32)).collect()
            }
            PatternDef::Nova { count } => {
                let step = TAU / count.max(1) as f32;
                (0..count).map(|i| shot(origin, step * i as f32)).collect()
            }
            PatternDef::Rain { count, spread } => (0..count)
                .map(|_| {
                    let x = origin.x + rng.range(-spread / 2.0, spread / 2.0);
                    shot(Vec2::new(x, RAIN_SPAWN_Y), FRAC_PI_2)
                })
                .collect(),
            PatternDef::Puddle { .. } => {
                let at = origin
                    + Vec2::new(
                        rng.range(-PUDDLE_SCATTER, PUDDLE_SCATTER),
                        rng.range(-PUDDLE_SCATTER, PUDDLE_SCATTER),
                    );
                vec![shot(at, aim)]
            }
            PatternDef::Orbit { .. } | PatternDef::Turret { .. } => Vec::new(),
            _ => vec![shot(origin, aim)],
        }
    }

    pub fn update_blades(&mut self, center: Vec2, dt_ms: f32) {
        for blade in &mut self.blades {
            blade.update(center, dt_ms);
        }
    }

    /// Advance turrets around `center` and let each one fire at the nearest
    /// enemy within range on its own clock.
    pub fn update_turrets(&mut self, center: Vec2, dt_ms: f32, now: f64, enemies: &[Enemy], damage_mult: f32) -> Vec<Projectile> {
        let PatternDef::Turret { count, range } = self.stats.pattern else {
            return Vec::new();
        };
        let expected = count as usize;
        while self.turrets.len() < expected {
            let angle = TAU / expected as f32 * self.turrets.len() as f32;
            self.turrets.push(Turret {
                angle,
                distance: TURRET_DISTANCE,
                last_fired: 0.0,
                pos: polar_offset(center, TURRET_DISTANCE, angle),
            });
        }

        let mut shots = Vec::new();
        let fire_rate = self.stats.fire_rate_ms as f64;
        for turret in &mut self.turrets {
            turret.angle += dt_ms * TURRET_SPIN_PER_MS;
            turret.pos = polar_offset(center, turret.distance, turret.angle);

            let target = enemies
                .iter()
                .filter(|e| !e.is_dying())
                .map(|e| (e, e.pos.distance(turret.pos)))
                .filter(|(_, d)| *d < range)
                .min_by(|a, b| a.1.total_cmp(&b.1));

            if let Some((enemy, _)) = target {
                if now - turret.last_fired >= fire_rate {
                    turret.last_fired = now;
                    let angle = crate::angle_between(turret.pos, enemy.pos);
                    shots.push(Projectile::from_weapon(&self.def.id, &self.stats, turret.pos, angle, damage_mult));
                }
            }
        }
        shots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::sim::enemy::Enemy;
    use proptest::prelude::*;

    fn weapon(id: &str, level: u32) -> Weapon {
        let catalog = Catalog::builtin().unwrap();
        Weapon::new(catalog.weapon(id).unwrap(), level, 1.0)
    }

    fn zombie_at(pos: Vec2) -> Enemy {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = GameRng::new(1);
        Enemy::spawn(1, catalog.enemy("zombie").unwrap(), pos, 1.0, &mut rng)
    }

    #[test]
    fn test_fire_rate_gating() {
        let mut w = weapon("blood_shooter", 1);
        let mut rng = GameRng::new(1);
        assert!(w.fire(Vec2::ZERO, 0.0, 399.0, 1.0, &mut rng).is_empty());
        assert_eq!(w.fire(Vec2::ZERO, 0.0, 400.0, 1.0, &mut rng).len(), 1);
        assert!(w.fire(Vec2::ZERO, 0.0, 700.0, 1.0, &mut rng).is_empty());
        assert_eq!(w.fire(Vec2::ZERO, 0.0, 800.0, 1.0, &mut rng).len(), 1);
    }

    #[test]
    fn test_spread_fans_symmetrically() {
        let mut w = weapon("skull_spreader", 1);
        let mut rng = GameRng::new(1);
        let shots = w.fire(Vec2::ZERO, 1.0, 1000.0, 1.0, &mut rng);
        assert_eq!(shots.len(), 3);
        assert!((shots[0].angle - 0.6).abs() < 1e-5);
        assert!((shots[1].angle - 1.0).abs() < 1e-5);
        assert!((shots[2].angle - 1.4).abs() < 1e-5);
    }

    #[test]
    fn test_spread_count_grows_with_level() {
        let mut w = weapon("skull_spreader", 3);
        let mut rng = GameRng::new(1);
        assert_eq!(w.fire(Vec2::ZERO, 0.0, 1000.0, 1.0, &mut rng).len(), 5);
    }

    #[test]
    fn test_nova_covers_circle() {
        let mut w = weapon("hellfire_nova", 1);
        let mut rng = GameRng::new(1);
        let shots = w.fire(Vec2::ZERO, 2.0, 1000.0, 1.0, &mut rng);
        assert_eq!(shots.len(), 8);
        assert_eq!(shots[0].angle, 0.0);
        assert!((shots[2].angle - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_rain_starts_above_arena() {
        let mut w = weapon("blood_rain", 1);
        let mut rng = GameRng::new(4);
        let shots = w.fire(Vec2::new(400.0, 300.0), 0.0, 1000.0, 1.0, &mut rng);
        assert_eq!(shots.len(), 3);
        for s in &shots {
            assert_eq!(s.pos.y, RAIN_SPAWN_Y);
            assert!((s.pos.x - 400.0).abs() <= 100.0);
            assert!(s.vel.x.abs() < 1e-4 && s.vel.y > 0.0);
        }
    }

    #[test]
    fn test_orbit_blades_rebuilt_on_level_up() {
        let mut w = weapon("cursed_orbit", 1);
        assert_eq!(w.blades.len(), 3);
        assert!(w.level_up(1.0));
        assert_eq!(w.blades.len(), 4);
        assert_eq!(w.blades[0].radius, 95.0);
        let mut rng = GameRng::new(1);
        assert!(w.fire(Vec2::ZERO, 0.0, 10_000.0, 1.0, &mut rng).is_empty());
    }

    #[test]
    fn test_orbit_blade_cooldown() {
        let mut w = weapon("cursed_orbit", 1);
        w.update_blades(Vec2::new(100.0, 100.0), 16.0);
        let blade = &mut w.blades[0];
        assert!((blade.pos.distance(Vec2::new(100.0, 100.0)) - 80.0).abs() < 1e-3);
        blade.register_hit(9);
        assert!(!blade.can_hit(9));
        w.update_blades(Vec2::new(100.0, 100.0), 501.0);
        assert!(w.blades[0].can_hit(9));
    }

    #[test]
    fn test_level_up_caps_at_max() {
        let mut w = weapon("death_laser", 5);
        assert!(w.is_max_level());
        assert!(!w.level_up(1.0));
        assert_eq!(w.level, 5);
    }

    #[test]
    fn test_turret_fires_only_in_range() {
        let mut w = weapon("eyeball_turret", 1);
        let far = [zombie_at(Vec2::new(1000.0, 1000.0))];
        assert!(w.update_turrets(Vec2::ZERO, 16.0, 1000.0, &far, 1.0).is_empty());
        assert_eq!(w.turrets.len(), 1);
        let near = [zombie_at(Vec2::new(100.0, 0.0))];
        assert_eq!(w.update_turrets(Vec2::ZERO, 16.0, 1000.0, &near, 1.0).len(), 1);
        assert!(w.update_turrets(Vec2::ZERO, 16.0, 1100.0, &near, 1.0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_fire_rate_gating(level in 1u32..=5, first in 0.0f64..10_000.0, gap in 0.0f64..2_000.0) {
            let mut w = weapon("skull_spreader", level);
            let rate = w.stats().fire_rate_ms as f64;
            let expected = match w.stats().pattern {
                PatternDef::Spread { count, .. } => count as usize,
                _ => unreachable!(),
            };
            let mut rng = GameRng::new(1);
            let t1 = rate + first;
            prop_assert_eq!(w.fire(Vec2::ZERO, 0.0, t1, 1.0, &mut rng).len(), expected);
            let second = w.fire(Vec2::ZERO, 0.0, t1 + gap, 1.0, &mut rng).len();
            if gap < rate {
                prop_assert_eq!(second, 0);
            } else {
                prop_assert_eq!(second, expected);
            }
        }
    }
}
