//! Enemies and bosses
//!
//! One [`Enemy`] struct covers both regular enemies and bosses; the boss
//! extras live in [`EnemyKind::Boss`]. Catalog behavior flags become small
//! components attached at spawn:
//! - movement modifiers run every alive tick,
//! - hit reactions intercept damage (clone, resurrect),
//! - death effects are read by the orchestrator's death cascade.
//!
//! Enemies never touch the enemy list. Clone spawns and explosions are
//! flagged on the enemy and realized by the orchestrator.

use crate::catalog::{BehaviorDef, BossDef, EnemyDef};
use crate::consts::{ENEMY_BOUNDS_MARGIN, ENEMY_DEATH_MS, ENEMY_HIT_FLASH_MS};
use crate::rng::GameRng;
use crate::sim::boss::{BossAction, BossState};
use crate::{frame_scale, polar_offset};
use glam::Vec2;

pub const ERRATIC_INTERVAL_MS: f32 = 200.0;
pub const PHASE_INTERVAL_MS: f32 = 2000.0;
pub const TELEPORT_MIN_MS: f32 = 2000.0;
pub const TELEPORT_MAX_MS: f32 = 4000.0;
pub const TELEPORT_MIN_DIST: f32 = 100.0;
pub const TELEPORT_MAX_DIST: f32 = 200.0;
pub const POISON_TICK_MS: f32 = 500.0;

/// Per-tick change to how an enemy moves
#[derive(Debug, Clone, PartialEq)]
pub enum MovementModifier {
    Erratic { timer_ms: f32, angle: f32 },
    Phasing { timer_ms: f32, phased: bool },
    Teleport { countdown_ms: f32 },
    /// Computes a pull on the player; does not change the enemy's own motion
    Pull { strength: f32, range: f32 },
}

impl MovementModifier {
    /// Adjust this tick's step (pixels per frame) or position
    fn apply(&mut self, step: &mut Vec2, pos: &mut Vec2, player: Vec2, dt_ms: f32, rng: &mut GameRng) {
        match self {
            MovementModifier::Erratic { timer_ms, angle } => {
                *timer_ms += dt_ms;
                if *timer_ms > ERRATIC_INTERVAL_MS {
                    *angle = rng.range(-1.0, 1.0);
                    *timer_ms = 0.0;
                }
                *step = Vec2::from_angle(*angle).rotate(*step);
            }
            MovementModifier::Phasing { timer_ms, phased } => {
                *timer_ms += dt_ms;
                if *timer_ms > PHASE_INTERVAL_MS {
                    *phased = !*phased;
                    *timer_ms = 0.0;
                }
            }
            MovementModifier::Teleport { countdown_ms } => {
                *countdown_ms -= dt_ms;
                if *countdown_ms <= 0.0 {
                    let dist = rng.range(TELEPORT_MIN_DIST, TELEPORT_MAX_DIST);
                    *pos = polar_offset(player, dist, rng.angle());
                    *countdown_ms = rng.range(TELEPORT_MIN_MS, TELEPORT_MAX_MS);
                }
            }
            MovementModifier::Pull { .. } => {}
        }
    }
}

/// Reaction to incoming damage
#[derive(Debug, Clone, PartialEq)]
pub enum HitReaction {
    /// Survive one lethal hit at half health
    Resurrect { used: bool },
    /// Ask for a clone on each surviving hit, up to `max`
    Clone { max: u32, spawned: u32 },
}

/// Effect realized by the death cascade
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeathEffect {
    Split,
    Explode { radius: f32, damage: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Life {
    Alive,
    /// Death animation window; no longer interacts
    Dying { elapsed_ms: f32 },
    /// Ready for removal
    Dead,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnemyKind {
    Regular,
    Boss(Box<BossState>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poison {
    pub damage: f32,
    pub remaining_ms: f32,
    pub since_tick_ms: f32,
}

/// Result of [`Enemy::take_damage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dying or phased; nothing happened
    Ignored,
    Damaged,
    /// Lethal hit absorbed by a resurrection
    Resurrected,
    /// Now dying; the caller must run the death cascade
    Killed,
}

/// What an alive tick produced for the orchestrator
#[derive(Debug, Default)]
pub struct EnemyTick {
    pub killed_by_poison: bool,
    pub boss: Option<BossAction>,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub type_id: String,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub damage: i32,
    /// Pixels per reference frame
    pub speed: f32,
    pub size: f32,
    pub xp_value: u32,
    pub life: Life,
    pub hit_flash_ms: f32,
    pub poison: Option<Poison>,
    pub movement: Vec<MovementModifier>,
    pub reactions: Vec<HitReaction>,
    pub on_death: Vec<DeathEffect>,
    /// Clone spawns requested by hits since the last drain
    pub pending_clones: u32,
    /// Set on death when an explode effect is attached
    pub pending_explosion: Option<(f32, f32)>,
}

impl Enemy {
    /// Regular enemy with stats scaled by `wave_mult`
    pub fn spawn(id: u32, def: &EnemyDef, pos: Vec2, wave_mult: f32, rng: &mut GameRng) -> Self {
        let mut movement = Vec::new();
        let mut reactions = Vec::new();
        let mut on_death = Vec::new();
        for b in &def.behaviors {
            match *b {
                BehaviorDef::Erratic => movement.push(MovementModifier::Erratic {
                    timer_ms: 0.0,
                    angle: 0.0,
                }),
                BehaviorDef::Phasing => movement.push(MovementModifier::Phasing {
                    timer_ms: 0.0,
                    phased: false,
                }),
                BehaviorDef::Teleports => movement.push(MovementModifier::Teleport {
                    countdown_ms: rng.range(TELEPORT_MIN_MS, TELEPORT_MAX_MS),
                }),
                BehaviorDef::PullsPlayer { strength, range } => {
                    movement.push(MovementModifier::Pull { strength, range })
                }
                BehaviorDef::Resurrects => reactions.push(HitReaction::Resurrect { used: false }),
                BehaviorDef::ClonesOnHit { max_clones } => reactions.push(HitReaction::Clone {
                    max: max_clones,
                    spawned: 0,
                }),
                BehaviorDef::SplitsOnDeath => on_death.push(DeathEffect::Split),
                BehaviorDef::ExplodesOnDeath { radius, damage } => {
                    on_death.push(DeathEffect::Explode { radius, damage })
                }
            }
        }
        let max_health = (def.health * wave_mult).floor().max(1.0);
        Self {
            id,
            type_id: def.id.clone(),
            kind: EnemyKind::Regular,
            pos,
            health: max_health,
            max_health,
            damage: (def.damage * wave_mult).floor() as i32,
            speed: def.speed,
            size: def.size,
            xp_value: (def.xp_value as f32 * wave_mult).floor() as u32,
            life: Life::Alive,
            hit_flash_ms: 0.0,
            poison: None,
            movement,
            reactions,
            on_death,
            pending_clones: 0,
            pending_explosion: None,
        }
    }

    /// Boss with stats scaled by `boss_mult`
    pub fn spawn_boss(id: u32, def: &BossDef, pos: Vec2, boss_mult: f32) -> Self {
        let max_health = (def.health * boss_mult).floor().max(1.0);
        Self {
            id,
            type_id: def.id.clone(),
            kind: EnemyKind::Boss(Box::new(BossState::new(def))),
            pos,
            health: max_health,
            max_health,
            damage: (def.damage * boss_mult).floor() as i32,
            speed: def.speed,
            size: def.size,
            xp_value: (def.xp_value as f32 * boss_mult).floor() as u32,
            life: Life::Alive,
            hit_flash_ms: 0.0,
            poison: None,
            movement: Vec::new(),
            reactions: Vec::new(),
            on_death: Vec::new(),
            pending_clones: 0,
            pending_explosion: None,
        }
    }

    /// Split child: half size, health, damage and xp; never splits again
    pub fn split_child(&self, id: u32, pos: Vec2) -> Self {
        let mut child = self.clone();
        child.id = id;
        child.pos = pos;
        child.size = self.size / 2.0;
        child.max_health = (self.max_health / 2.0).max(1.0);
        child.health = child.max_health;
        child.damage = self.damage / 2;
        child.xp_value = self.xp_value / 2;
        child.life = Life::Alive;
        child.hit_flash_ms = 0.0;
        child.poison = None;
        child.on_death.retain(|e| !matches!(e, DeathEffect::Split));
        child.pending_clones = 0;
        child.pending_explosion = None;
        child
    }

    /// Clone spawned by a clone-on-hit enemy: rebuilt from its type at
    /// `clone_mult`, half health, cannot clone
    pub fn clone_of(id: u32, def: &EnemyDef, pos: Vec2, clone_mult: f32, rng: &mut GameRng) -> Self {
        let mut e = Self::spawn(id, def, pos, clone_mult, rng);
        e.health = (e.max_health * 0.5).max(1.0);
        e.reactions.retain(|r| !matches!(r, HitReaction::Clone { .. }));
        e
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn boss_state(&self) -> Option<&BossState> {
        match &self.kind {
            EnemyKind::Boss(b) => Some(&**b),
            EnemyKind::Regular => None,
        }
    }

    pub fn is_dying(&self) -> bool {
        !matches!(self.life, Life::Alive)
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.life, Life::Dead)
    }

    pub fn is_phased(&self) -> bool {
        self.movement
            .iter()
            .any(|m| matches!(m, MovementModifier::Phasing { phased: true, .. }))
    }

    /// Alive and tangible
    pub fn is_targetable(&self) -> bool {
        !self.is_dying() && !self.is_phased()
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.is_dying() || self.is_phased() {
            return DamageOutcome::Ignored;
        }
        self.health -= amount;
        self.hit_flash_ms = ENEMY_HIT_FLASH_MS;

        if self.health <= 0.0 {
            for r in &mut self.reactions {
                if let HitReaction::Resurrect { used } = r {
                    if *used {
                        continue;
                    }
                    *used = true;
                    self.health = self.max_health * 0.5;
                    return DamageOutcome::Resurrected;
                }
            }
            self.die();
            return DamageOutcome::Killed;
        }

        for r in &mut self.reactions {
            if let HitReaction::Clone { max, spawned } = r {
                if *spawned < *max {
                    *spawned += 1;
                    self.pending_clones += 1;
                }
            }
        }
        DamageOutcome::Damaged
    }

    fn die(&mut self) {
        self.life = Life::Dying { elapsed_ms: 0.0 };
        self.poison = None;
        self.pending_explosion = self.on_death.iter().find_map(|e| match *e {
            DeathEffect::Explode { radius, damage } => Some((radius, damage)),
            DeathEffect::Split => None,
        });
    }

    /// Poison; a second dose keeps the stronger damage and longer duration
    pub fn apply_poison(&mut self, damage: f32, duration_ms: f32) {
        if self.is_dying() || damage <= 0.0 || duration_ms <= 0.0 {
            return;
        }
        match self.poison.as_mut() {
            Some(p) => {
                p.damage = p.damage.max(damage);
                p.remaining_ms = p.remaining_ms.max(duration_ms);
            }
            None => {
                self.poison = Some(Poison {
                    damage,
                    remaining_ms: duration_ms,
                    since_tick_ms: 0.0,
                })
            }
        }
    }

    pub fn update(&mut self, dt_ms: f32, player: Vec2, arena: Vec2, rng: &mut GameRng) -> EnemyTick {
        let mut tick = EnemyTick::default();

        if let Life::Dying { elapsed_ms } = &mut self.life {
            *elapsed_ms += dt_ms;
            if *elapsed_ms > ENEMY_DEATH_MS {
                self.life = Life::Dead;
            }
            return tick;
        }
        if self.is_dead() {
            return tick;
        }

        if self.hit_flash_ms > 0.0 {
            self.hit_flash_ms -= dt_ms;
        }

        if let Some(mut p) = self.poison {
            p.remaining_ms -= dt_ms;
            p.since_tick_ms += dt_ms;
            let mut dose = 0.0;
            while p.since_tick_ms >= POISON_TICK_MS {
                p.since_tick_ms -= POISON_TICK_MS;
                dose += p.damage;
            }
            self.poison = (p.remaining_ms > 0.0).then_some(p);
            if dose > 0.0 && self.take_damage(dose) == DamageOutcome::Killed {
                tick.killed_by_poison = true;
                return tick;
            }
        }

        let to_player = player - self.pos;
        let mut step = to_player.normalize_or_zero() * self.speed;
        let mut pos = self.pos;
        for m in &mut self.movement {
            m.apply(&mut step, &mut pos, player, dt_ms, rng);
        }

        if let EnemyKind::Boss(boss) = &mut self.kind {
            let action = boss.update(dt_ms, pos, player, self.damage as f32, rng);
            if let Some(v) = action.velocity {
                step = v;
            }
            if let Some(at) = action.teleport_to {
                pos = at;
            }
            tick.boss = Some(action);
        }

        if to_player.length_squared() > 0.0 {
            pos += step * frame_scale(dt_ms);
        }
        let m = ENEMY_BOUNDS_MARGIN;
        self.pos = pos.clamp(Vec2::splat(-m), arena + Vec2::splat(m));
        tick
    }

    /// Attraction this enemy exerts on the player this tick, pixels per
    /// frame. Strongest at zero distance, zero at and beyond `range`.
    pub fn pull_on(&self, player: Vec2) -> Vec2 {
        if self.is_dying() {
            return Vec2::ZERO;
        }
        let mut total = Vec2::ZERO;
        for m in &self.movement {
            if let MovementModifier::Pull { strength, range } = *m {
                let to_me = self.pos - player;
                let d = to_me.length();
                if d < range && range > 0.0 {
                    total += to_me.normalize_or_zero() * strength * (1.0 - d / range);
                }
            }
        }
        total
    }

    pub fn splits(&self) -> bool {
        self.on_death.contains(&DeathEffect::Split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use proptest::prelude::*;

    const ARENA: Vec2 = Vec2::new(1280.0, 720.0);

    fn make(type_id: &str) -> Enemy {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = GameRng::new(11);
        Enemy::spawn(1, catalog.enemy(type_id).unwrap(), Vec2::new(100.0, 100.0), 1.0, &mut rng)
    }

    #[test]
    fn test_wave_scaling_floors_stats() {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = GameRng::new(1);
        let e = Enemy::spawn(1, catalog.enemy("zombie").unwrap(), Vec2::ZERO, 1.25, &mut rng);
        assert_eq!(e.max_health, 25.0);
        assert_eq!(e.damage, 12);
        assert_eq!(e.xp_value, 12);
        assert_eq!(e.speed, 1.2);
        assert_eq!(e.size, 14.0);
    }

    #[test]
    fn test_damage_then_death_window() {
        let mut e = make("zombie");
        assert_eq!(e.take_damage(5.0), DamageOutcome::Damaged);
        assert_eq!(e.health, 15.0);
        assert_eq!(e.take_damage(15.0), DamageOutcome::Killed);
        assert!(e.is_dying());
        assert_eq!(e.take_damage(5.0), DamageOutcome::Ignored);

        let mut rng = GameRng::new(1);
        e.update(150.0, Vec2::ZERO, ARENA, &mut rng);
        assert!(e.is_dying() && !e.is_dead());
        e.update(60.0, Vec2::ZERO, ARENA, &mut rng);
        assert!(e.is_dead());
    }

    #[test]
    fn test_resurrects_exactly_once() {
        let mut e = make("revenant");
        let max = e.max_health;
        assert_eq!(e.take_damage(1000.0), DamageOutcome::Resurrected);
        assert_eq!(e.health, max * 0.5);
        assert!(!e.is_dying());
        assert_eq!(e.take_damage(1000.0), DamageOutcome::Killed);
        assert!(e.is_dying());
    }

    #[test]
    fn test_phased_ignores_damage() {
        let mut e = make("ghost");
        let mut rng = GameRng::new(1);
        e.update(2001.0, Vec2::new(500.0, 500.0), ARENA, &mut rng);
        assert!(e.is_phased());
        assert_eq!(e.take_damage(10.0), DamageOutcome::Ignored);
        e.update(2001.0, Vec2::new(500.0, 500.0), ARENA, &mut rng);
        assert!(!e.is_phased());
        assert_eq!(e.take_damage(10.0), DamageOutcome::Damaged);
    }

    #[test]
    fn test_clone_requests_capped() {
        let mut e = make("doppelganger");
        for _ in 0..4 {
            e.take_damage(1.0);
        }
        assert_eq!(e.pending_clones, 2);
    }

    #[test]
    fn test_clone_cannot_clone() {
        let catalog = Catalog::builtin().unwrap();
        let mut rng = GameRng::new(1);
        let mut c = Enemy::clone_of(2, catalog.enemy("doppelganger").unwrap(), Vec2::ZERO, 0.6, &mut rng);
        assert_eq!(c.health, (c.max_health * 0.5).max(1.0));
        c.take_damage(1.0);
        assert_eq!(c.pending_clones, 0);
    }

    #[test]
    fn test_explode_flagged_on_death() {
        let mut e = make("bloater");
        assert!(e.pending_explosion.is_none());
        e.take_damage(1000.0);
        assert_eq!(e.pending_explosion, Some((80.0, 20.0)));
    }

    #[test]
    fn test_split_child_halves_and_stops_splitting() {
        let e = make("blob");
        assert!(e.splits());
        let c = e.split_child(9, Vec2::ZERO);
        assert_eq!(c.size, e.size / 2.0);
        assert_eq!(c.max_health, e.max_health / 2.0);
        assert_eq!(c.xp_value, e.xp_value / 2);
        assert!(!c.splits());
    }

    #[test]
    fn test_moves_toward_player_and_clamps() {
        let mut e = make("skeleton");
        let mut rng = GameRng::new(1);
        e.update(crate::consts::FRAME_MS, Vec2::new(100.0, 200.0), ARENA, &mut rng);
        assert!((e.pos - Vec2::new(100.0, 102.0)).length() < 1e-3);

        e.pos = Vec2::new(-500.0, 100.0);
        e.update(1.0, Vec2::new(-1000.0, 100.0), ARENA, &mut rng);
        assert_eq!(e.pos.x, -ENEMY_BOUNDS_MARGIN);
    }

    #[test]
    fn test_teleport_lands_near_player() {
        let mut e = make("wraith");
        e.movement[0] = MovementModifier::Teleport { countdown_ms: 1.0 };
        let mut rng = GameRng::new(3);
        let player = Vec2::new(600.0, 360.0);
        e.update(1.0, player, ARENA, &mut rng);
        let d = e.pos.distance(player);
        assert!(d <= TELEPORT_MAX_DIST + 1.0 && d >= TELEPORT_MIN_DIST - 1.0);
        assert!(matches!(e.movement[0], MovementModifier::Teleport { countdown_ms } if countdown_ms >= TELEPORT_MIN_MS));
    }

    #[test]
    fn test_pull_falls_off_with_distance() {
        let mut e = make("void_walker");
        e.pos = Vec2::new(100.0, 0.0);
        let near = e.pull_on(Vec2::new(50.0, 0.0));
        let far = e.pull_on(Vec2::new(-100.0, 0.0));
        let out = e.pull_on(Vec2::new(-200.0, 0.0));
        assert!(near.x > far.x && far.x > 0.0);
        assert_eq!(out, Vec2::ZERO);
    }

    #[test]
    fn test_poison_ticks_and_kills() {
        let mut e = make("bat");
        e.apply_poison(4.0, 2000.0);
        let mut rng = GameRng::new(1);
        let mut killed = false;
        for _ in 0..40 {
            if e.update(50.0, Vec2::new(100.0, 100.0), ARENA, &mut rng).killed_by_poison {
                killed = true;
                break;
            }
        }
        // 10 health, 4 per 500ms tick: dies on the third tick
        assert!(killed);
        assert!(e.is_dying());
    }

    #[test]
    fn test_poison_refresh_keeps_stronger() {
        let mut e = make("zombie");
        e.apply_poison(2.0, 2000.0);
        e.apply_poison(1.0, 3000.0);
        let p = e.poison.unwrap();
        assert_eq!(p.damage, 2.0);
        assert_eq!(p.remaining_ms, 3000.0);
    }

    #[test]
    fn test_boss_variant() {
        let catalog = Catalog::builtin().unwrap();
        let b = Enemy::spawn_boss(5, catalog.boss("mega_zombie").unwrap(), Vec2::ZERO, 1.5);
        assert!(b.is_boss());
        assert_eq!(b.max_health, 750.0);
        assert!(b.boss_state().unwrap().minion.is_some());
    }

    proptest! {
        #[test]
        fn prop_damage_monotonic(amount in 0.01f32..200.0, resurrects in any::<bool>()) {
            let mut e = make(if resurrects { "revenant" } else { "demon" });
            let before = e.health;
            let outcome = e.take_damage(amount);
            let lethal = before - amount <= 0.0;
            match outcome {
                DamageOutcome::Damaged => {
                    prop_assert!(!lethal);
                    prop_assert!((e.health - (before - amount)).abs() < 1e-3);
                    prop_assert!(!e.is_dying());
                }
                DamageOutcome::Resurrected => {
                    prop_assert!(lethal && resurrects);
                    prop_assert_eq!(e.health, e.max_health * 0.5);
                }
                DamageOutcome::Killed => {
                    prop_assert!(lethal && !resurrects);
                    prop_assert!(e.is_dying());
                }
                DamageOutcome::Ignored => prop_assert!(false, "fresh enemy ignored damage"),
            }
        }
    }
}
