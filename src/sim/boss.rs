//! Boss attack state
//!
//! A boss is an [`Enemy`](super::enemy::Enemy) whose kind carries a
//! [`BossState`]. The state decides, per tick, whether the boss overrides its
//! chase vector or asks the orchestrator for minions and hostile shots.

use crate::catalog::{AttackPattern, BossDef};
use crate::polar_offset;
use crate::rng::GameRng;
use glam::Vec2;
use std::f32::consts::TAU;

pub const ATTACK_COOLDOWN_MS: f32 = 2000.0;
/// Charge speed, pixels per reference frame
pub const CHARGE_SPEED: f32 = 5.0;
pub const CHARGE_DURATION_MS: f32 = 600.0;
pub const MINION_INTERVAL_MS: f32 = 5000.0;
pub const MINIONS_PER_SUMMON: u32 = 3;
pub const SHOT_INTERVAL_MS: f32 = 1000.0;
pub const SPIRAL_SHOTS: u32 = 8;
/// Spiral rings rotate by this much each volley
pub const SPIRAL_STEP: f32 = 0.3;
pub const HOSTILE_SHOT_SPEED: f32 = 4.0;
pub const HOSTILE_SHOT_SIZE: f32 = 8.0;
/// Boss teleports land this far from the player
pub const TELEPORT_MIN: f32 = 150.0;
pub const TELEPORT_MAX: f32 = 250.0;

/// Something a boss asks the orchestrator to realize
#[derive(Debug, Clone, PartialEq)]
pub enum BossRequest {
    Minions { type_id: String, at: Vec2, count: u32 },
    /// Hostile projectiles from `origin` at each angle
    Volley { origin: Vec2, angles: Vec<f32>, damage: f32 },
}

/// Result of one boss tick
#[derive(Debug, Clone, Default)]
pub struct BossAction {
    /// Replaces the chase vector this tick (pixels per frame)
    pub velocity: Option<Vec2>,
    pub teleport_to: Option<Vec2>,
    pub requests: Vec<BossRequest>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossState {
    pub pattern: AttackPattern,
    pub attack_timer_ms: f32,
    /// Position in the charge → spiral → teleport rotation for `All`
    pub cycle: u32,
    /// Active charge: locked direction and time left
    pub charge: Option<(Vec2, f32)>,
    pub spiral_phase: f32,
    pub minion: Option<String>,
    pub minion_timer_ms: f32,
    pub shoots_projectiles: bool,
    pub shot_timer_ms: f32,
    pub is_final: bool,
}

impl BossState {
    pub fn new(def: &BossDef) -> Self {
        Self {
            pattern: def.attack_pattern,
            attack_timer_ms: ATTACK_COOLDOWN_MS,
            cycle: 0,
            charge: None,
            spiral_phase: 0.0,
            minion: def.minion.clone(),
            minion_timer_ms: MINION_INTERVAL_MS,
            shoots_projectiles: def.shoots_projectiles,
            shot_timer_ms: SHOT_INTERVAL_MS,
            is_final: def.is_final_boss,
        }
    }

    /// Pattern to run on the next cooldown expiry
    fn next_pattern(&mut self) -> AttackPattern {
        match self.pattern {
            AttackPattern::All => {
                let p = match self.cycle % 3 {
                    0 => AttackPattern::Charge,
                    1 => AttackPattern::Spiral,
                    _ => AttackPattern::Teleport,
                };
                self.cycle += 1;
                p
            }
            p => p,
        }
    }

    pub fn update(&mut self, dt_ms: f32, pos: Vec2, player: Vec2, damage: f32, rng: &mut GameRng) -> BossAction {
        let mut action = BossAction::default();

        if let Some((dir, left)) = self.charge.as_mut() {
            *left -= dt_ms;
            action.velocity = Some(*dir * CHARGE_SPEED);
            if *left <= 0.0 {
                self.charge = None;
            }
        }

        self.attack_timer_ms -= dt_ms;
        if self.attack_timer_ms <= 0.0 {
            self.attack_timer_ms = ATTACK_COOLDOWN_MS;
            match self.next_pattern() {
                AttackPattern::Charge => {
                    let dir = (player - pos).normalize_or_zero();
                    self.charge = Some((dir, CHARGE_DURATION_MS));
                    action.velocity = Some(dir * CHARGE_SPEED);
                }
                AttackPattern::Spiral => {
                    let step = TAU / SPIRAL_SHOTS as f32;
                    let phase = self.spiral_phase;
                    self.spiral_phase = (self.spiral_phase + SPIRAL_STEP) % TAU;
                    action.requests.push(BossRequest::Volley {
                        origin: pos,
                        angles: (0..SPIRAL_SHOTS).map(|i| phase + step * i as f32).collect(),
                        damage: (damage * 0.5).floor(),
                    });
                }
                AttackPattern::Teleport => {
                    let dist = rng.range(TELEPORT_MIN, TELEPORT_MAX);
                    action.teleport_to = Some(polar_offset(player, dist, rng.angle()));
                }
                AttackPattern::All => {}
            }
        }

        if let Some(type_id) = &self.minion {
            self.minion_timer_ms -= dt_ms;
            if self.minion_timer_ms <= 0.0 {
                self.minion_timer_ms = MINION_INTERVAL_MS;
                action.requests.push(BossRequest::Minions {
                    type_id: type_id.clone(),
                    at: pos,
                    count: MINIONS_PER_SUMMON,
                });
            }
        }

        if self.shoots_projectiles {
            self.shot_timer_ms -= dt_ms;
            if self.shot_timer_ms <= 0.0 {
                self.shot_timer_ms = SHOT_INTERVAL_MS;
                action.requests.push(BossRequest::Volley {
                    origin: pos,
                    angles: vec![crate::angle_between(pos, player)],
                    damage: (damage * 0.5).floor(),
                });
            }
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn state(id: &str) -> BossState {
        BossState::new(Catalog::builtin().unwrap().boss(id).unwrap())
    }

    #[test]
    fn test_nothing_before_cooldown() {
        let mut s = state("demon_lord");
        let mut rng = GameRng::new(1);
        let a = s.update(500.0, Vec2::ZERO, Vec2::new(100.0, 0.0), 30.0, &mut rng);
        assert!(a.velocity.is_none() && a.teleport_to.is_none() && a.requests.is_empty());
    }

    #[test]
    fn test_charge_locks_direction_then_ends() {
        let mut s = state("mega_zombie");
        let mut rng = GameRng::new(1);
        let a = s.update(2000.0, Vec2::ZERO, Vec2::new(100.0, 0.0), 25.0, &mut rng);
        assert_eq!(a.velocity, Some(Vec2::new(CHARGE_SPEED, 0.0)));
        // Player moves; charge keeps its locked heading
        let a = s.update(300.0, Vec2::ZERO, Vec2::new(0.0, 100.0), 25.0, &mut rng);
        assert_eq!(a.velocity, Some(Vec2::new(CHARGE_SPEED, 0.0)));
        s.update(400.0, Vec2::ZERO, Vec2::new(0.0, 100.0), 25.0, &mut rng);
        assert!(s.charge.is_none());
    }

    #[test]
    fn test_spiral_requests_ring() {
        let mut s = state("demon_lord");
        let mut rng = GameRng::new(1);
        let a = s.update(2000.0, Vec2::ZERO, Vec2::new(100.0, 0.0), 30.0, &mut rng);
        let ring = a
            .requests
            .iter()
            .find_map(|r| match r {
                BossRequest::Volley { angles, .. } if angles.len() > 1 => Some(angles.len()),
                _ => None,
            })
            .unwrap();
        assert_eq!(ring, SPIRAL_SHOTS as usize);
        // demon_lord also shoots aimed shots every second
        assert_eq!(a.requests.len(), 2);
    }

    #[test]
    fn test_teleport_lands_in_band() {
        let mut s = state("ghost_king");
        let mut rng = GameRng::new(5);
        let player = Vec2::new(400.0, 400.0);
        let a = s.update(2000.0, Vec2::ZERO, player, 20.0, &mut rng);
        let d = a.teleport_to.unwrap().distance(player);
        assert!((TELEPORT_MIN - 0.01..=TELEPORT_MAX + 0.01).contains(&d));
    }

    #[test]
    fn test_all_pattern_cycles() {
        let mut s = state("nightmare");
        let mut rng = GameRng::new(2);
        let p = Vec2::new(100.0, 0.0);
        assert!(s.update(2000.0, Vec2::ZERO, p, 35.0, &mut rng).velocity.is_some());
        s.charge = None;
        assert!(!s.update(2000.0, Vec2::ZERO, p, 35.0, &mut rng).requests.is_empty());
        assert!(s.update(2000.0, Vec2::ZERO, p, 35.0, &mut rng).teleport_to.is_some());
    }

    #[test]
    fn test_minion_summon_interval() {
        let mut s = state("mega_zombie");
        let mut rng = GameRng::new(1);
        let mut summons = 0;
        for _ in 0..100 {
            let a = s.update(100.0, Vec2::ZERO, Vec2::new(500.0, 0.0), 25.0, &mut rng);
            summons += a
                .requests
                .iter()
                .filter(|r| matches!(r, BossRequest::Minions { count: MINIONS_PER_SUMMON, .. }))
                .count();
        }
        assert_eq!(summons, 2);
    }
}
