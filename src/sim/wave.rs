//! Wave scheduler
//!
//! Decides what spawns when and tracks wave completion. A wave is complete
//! only when every enemy counted against it has died and nothing is left to
//! spawn; a boss wave counts the boss in `enemies_remaining`.

use crate::catalog::{Catalog, EnemyDef};
use crate::rng::GameRng;
use crate::sim::enemy::Enemy;
use crate::tuning::WaveTuning;
use glam::Vec2;

#[derive(Debug, Clone)]
pub struct WaveScheduler {
    config: WaveTuning,
    arena: Vec2,
    /// Character boss roster; the last entry is the final boss
    roster: Vec<String>,
    pub wave: u32,
    pub enemies_remaining: u32,
    pub enemies_to_spawn: u32,
    pub spawn_timer_ms: f32,
    pub spawn_interval_ms: f32,
    pub boss_wave: bool,
    pub boss_spawned: bool,
    pub boss_defeated: bool,
    /// Set once the completed wave has been handled
    pub cleared: bool,
    pub total_kills: u32,
}

impl WaveScheduler {
    pub fn new(config: WaveTuning, arena: Vec2, roster: Vec<String>) -> Self {
        Self {
            config,
            arena,
            roster,
            wave: 0,
            enemies_remaining: 0,
            enemies_to_spawn: 0,
            spawn_timer_ms: 0.0,
            spawn_interval_ms: 0.0,
            boss_wave: false,
            boss_spawned: false,
            boss_defeated: false,
            cleared: false,
            total_kills: 0,
        }
    }

    pub fn max_waves(&self) -> u32 {
        self.config.max_waves
    }

    pub fn start_wave(&mut self, wave: u32) {
        let c = &self.config;
        self.wave = wave;
        self.boss_wave = wave % c.boss_interval.max(1) == 0;
        let quota = if self.boss_wave {
            c.boss_base_quota + wave * c.boss_quota_per_wave
        } else {
            c.base_quota + wave * c.quota_per_wave
        };
        self.enemies_to_spawn = quota;
        self.enemies_remaining = quota + u32::from(self.boss_wave);
        self.spawn_interval_ms =
            (c.spawn_interval_ms - wave as f32 * c.spawn_interval_step_ms).max(c.spawn_interval_floor_ms);
        self.spawn_timer_ms = 0.0;
        self.boss_spawned = false;
        self.boss_defeated = false;
        self.cleared = false;
    }

    /// Regular enemy stat multiplier for the current wave
    pub fn wave_multiplier(&self) -> f32 {
        1.0 + self.wave.saturating_sub(1) as f32 * self.config.wave_multiplier_step
    }

    pub fn boss_multiplier(&self) -> f32 {
        1.0 + self.wave.saturating_sub(1) as f32 * self.config.boss_multiplier_step
    }

    /// Advance the spawn timer; true when a spawn is due. The timer is only
    /// reset by a successful [`WaveScheduler::spawn_enemy`], so a deferred
    /// spawn stays due.
    pub fn spawn_due(&mut self, dt_ms: f32) -> bool {
        if self.enemies_to_spawn == 0 {
            return false;
        }
        self.spawn_timer_ms += dt_ms;
        self.spawn_timer_ms >= self.spawn_interval_ms
    }

    /// Weighted pick over catalog types unlocked by the current wave, in
    /// catalog order
    pub fn random_enemy_type<'a>(&self, catalog: &'a Catalog, rng: &mut GameRng) -> Option<&'a EnemyDef> {
        let candidates: Vec<&EnemyDef> = catalog.enemies().iter().filter(|e| e.min_wave <= self.wave).collect();
        rng.weighted(&candidates, |e| e.spawn_weight).copied()
    }

    /// Random point just outside one of the four arena edges
    pub fn spawn_point(&self, rng: &mut GameRng) -> Vec2 {
        let m = self.config.spawn_margin;
        let (w, h) = (self.arena.x, self.arena.y);
        match rng.index(4) {
            0 => Vec2::new(rng.range(0.0, w), -m),
            1 => Vec2::new(w + m, rng.range(0.0, h)),
            2 => Vec2::new(rng.range(0.0, w), h + m),
            _ => Vec2::new(-m, rng.range(0.0, h)),
        }
    }

    /// Next regular enemy of the wave, or `None` once the quota is spent
    pub fn spawn_enemy(&mut self, id: u32, catalog: &Catalog, rng: &mut GameRng) -> Option<Enemy> {
        if self.enemies_to_spawn == 0 {
            return None;
        }
        let def = self.random_enemy_type(catalog, rng)?;
        let pos = self.spawn_point(rng);
        self.enemies_to_spawn -= 1;
        self.spawn_timer_ms = 0.0;
        log::debug!("Spawned {} #{} at ({:.0}, {:.0})", def.id, id, pos.x, pos.y);
        Some(Enemy::spawn(id, def, pos, self.wave_multiplier(), rng))
    }

    /// Roster boss for the current wave. Earlier boss waves cycle through
    /// every entry but the last, which is held back for `max_waves` on.
    pub fn boss_type(&self) -> Option<&str> {
        let last = self.roster.last()?;
        if self.wave >= self.config.max_waves {
            return Some(last);
        }
        let nth = (self.wave / self.config.boss_interval.max(1)).saturating_sub(1) as usize;
        let cycle = (self.roster.len() - 1).max(1);
        self.roster.get(nth % cycle).map(String::as_str)
    }

    pub fn spawn_boss(&mut self, id: u32, catalog: &Catalog, rng: &mut GameRng) -> Option<Enemy> {
        let boss_id = self.boss_type()?;
        let Some(def) = catalog.boss(boss_id) else {
            debug_assert!(false, "unknown boss id '{}'", boss_id);
            log::error!("Unknown boss id '{}', boss skipped", boss_id);
            return None;
        };
        let pos = self.spawn_point(rng);
        self.boss_spawned = true;
        Some(Enemy::spawn_boss(id, def, pos, self.boss_multiplier()))
    }

    pub fn enemy_died(&mut self, was_boss: bool) {
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
        self.total_kills += 1;
        if was_boss {
            self.boss_defeated = true;
        }
    }

    /// Count extra enemies (splits, clones, minions) against the wave
    pub fn add_remaining(&mut self, n: u32) {
        self.enemies_remaining += n;
    }

    pub fn is_wave_complete(&self) -> bool {
        self.enemies_remaining == 0 && self.enemies_to_spawn == 0
    }

    pub fn is_game_won(&self) -> bool {
        self.wave >= self.config.max_waves && self.is_wave_complete() && (!self.boss_wave || self.boss_defeated)
    }

    pub fn end_wave(&mut self) {
        self.cleared = true;
    }
}
