//! Session state and core simulation types
//!
//! The session exclusively owns the enemy, projectile and orb collections.
//! Entities never insert or remove siblings; they raise flags or requests
//! that the orchestrator realizes at fixed points of the tick.

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

use super::enemy::{DamageOutcome, Enemy};
use super::player::Player;
use super::projectile::Projectile;
use super::schedule::Scheduler;
use super::upgrade::{UpgradeChoice, UpgradeSelector};
use super::wave::WaveScheduler;
use super::xp::XpOrb;
use crate::audio::SoundEffect;
use crate::catalog::{Catalog, CharacterDef};
use crate::error::{CatalogError, GameResult};
use crate::rng::GameRng;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Waiting for the first start
    Title,
    Playing,
    Paused,
    /// Simulation halted until an upgrade is chosen
    Upgrading,
    GameOver,
    Victory,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }

    /// Phases a new run may start from
    pub fn can_start(&self) -> bool {
        matches!(self, GamePhase::Title | GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Notable things that happened, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    WaveStarted { wave: u32, boss_wave: bool },
    BossWarning { wave: u32 },
    BossSpawned { wave: u32, boss_id: String },
    BossDefeated { boss_id: String },
    WaveCleared { wave: u32 },
    LevelUp { level: u32 },
    UpgradeApplied { choice: UpgradeChoice },
    PlayerDamaged { amount: i32, health: i32 },
    GameOver { wave: u32, level: u32, kills: u32 },
    Victory { level: u32, kills: u32 },
}

/// Undrained sounds kept for the host; later ones are dropped
pub const MAX_PENDING_SOUNDS: usize = 1024;
/// Undrained events kept for the host; the oldest are dropped first
pub const MAX_PENDING_EVENTS: usize = 256;

/// Collections whose cap dropped an insert this tick (one warning each)
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CapWarnings {
    pub projectiles: bool,
    pub orbs: bool,
    pub enemies: bool,
    pub sounds: bool,
    pub events: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub catalog: Catalog,
    pub tuning: Tuning,
    pub character: CharacterDef,
    pub phase: GamePhase,
    pub rng: GameRng,
    /// Simulated playing time, ms
    pub game_time_ms: f64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub orbs: Vec<XpOrb>,
    pub wave: WaveScheduler,
    pub upgrades: UpgradeSelector,
    /// Offers on the upgrade screen
    pub choices: Vec<UpgradeChoice>,
    pub cursor: usize,
    pub scheduler: Scheduler,
    /// Wave banner time left, ms
    pub announcement_ms: f32,
    /// Boss warning time left, ms
    pub boss_warning_ms: f32,
    /// Next wave that came due while the upgrade screen was open
    pub pending_next_wave: Option<u32>,
    /// Indices into `enemies` whose death cascade has not run yet
    pub(crate) death_queue: VecDeque<usize>,
    /// Enemies created mid-tick, inserted after the collision pass
    pub(crate) spawn_buffer: Vec<Enemy>,
    pub(crate) cap_warnings: CapWarnings,
    sounds: Vec<SoundEffect>,
    events: VecDeque<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Session for `character_id` on the title screen
    pub fn new(catalog: Catalog, tuning: Tuning, character_id: &str, seed: u64) -> GameResult<Self> {
        let character = catalog
            .character(character_id)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownCharacter(character_id.to_string()))?;
        let arena = tuning.arena();
        let player = Player::new(&character, catalog.weapon_or_fallback(&character.starting_weapon), arena);
        let wave = WaveScheduler::new(tuning.waves.clone(), arena, character.bosses.clone());
        Ok(Self {
            catalog,
            tuning,
            character,
            phase: GamePhase::Title,
            rng: GameRng::new(seed),
            game_time_ms: 0.0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            orbs: Vec::new(),
            wave,
            upgrades: UpgradeSelector::new(),
            choices: Vec::new(),
            cursor: 0,
            scheduler: Scheduler::new(),
            announcement_ms: 0.0,
            boss_warning_ms: 0.0,
            pending_next_wave: None,
            death_queue: VecDeque::new(),
            spawn_buffer: Vec::new(),
            cap_warnings: CapWarnings::default(),
            sounds: Vec::new(),
            events: VecDeque::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn arena(&self) -> Vec2 {
        self.tuning.arena()
    }

    pub(crate) fn sound(&mut self, effect: SoundEffect) {
        if self.sounds.len() >= MAX_PENDING_SOUNDS {
            if !self.cap_warnings.sounds {
                self.cap_warnings.sounds = true;
                log::warn!("{} sounds left undrained, dropping new ones", MAX_PENDING_SOUNDS);
            }
            return;
        }
        self.sounds.push(effect);
    }

    pub(crate) fn event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            if !self.cap_warnings.events {
                self.cap_warnings.events = true;
                log::warn!("{} events left undrained, dropping the oldest", MAX_PENDING_EVENTS);
            }
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take every sound queued since the last drain
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        Vec::from(std::mem::take(&mut self.events))
    }

    pub(crate) fn push_projectile(&mut self, mut p: Projectile) -> bool {
        if self.projectiles.len() >= self.tuning.limits.max_projectiles {
            if !self.cap_warnings.projectiles {
                self.cap_warnings.projectiles = true;
                log::warn!("Projectile cap {} reached, dropping shots", self.tuning.limits.max_projectiles);
            }
            return false;
        }
        p.id = self.next_entity_id();
        self.projectiles.push(p);
        true
    }

    pub(crate) fn push_orb(&mut self, pos: Vec2, value: u32) -> bool {
        if self.orbs.len() >= self.tuning.limits.max_xp_orbs {
            if !self.cap_warnings.orbs {
                self.cap_warnings.orbs = true;
                log::warn!("XP orb cap {} reached, dropping orbs", self.tuning.limits.max_xp_orbs);
            }
            return false;
        }
        let id = self.next_entity_id();
        self.orbs.push(XpOrb::new(id, pos, value));
        true
    }

    /// Live enemies plus those waiting in the spawn buffer
    pub fn enemy_count(&self) -> usize {
        self.enemies.len() + self.spawn_buffer.len()
    }

    pub(crate) fn enemy_room(&mut self) -> bool {
        if self.enemy_count() < self.tuning.limits.max_enemies {
            return true;
        }
        if !self.cap_warnings.enemies {
            self.cap_warnings.enemies = true;
            log::warn!("Enemy cap {} reached", self.tuning.limits.max_enemies);
        }
        false
    }

    /// Queue an enemy created mid-tick. It counts against the wave only if
    /// it was accepted.
    pub(crate) fn push_spawn(&mut self, enemy: Enemy) -> bool {
        if !self.enemy_room() {
            log::debug!("Dropped {} #{} at enemy cap", enemy.type_id, enemy.id);
            return false;
        }
        self.spawn_buffer.push(enemy);
        self.wave.add_remaining(1);
        true
    }

    pub(crate) fn flush_spawns(&mut self) {
        self.enemies.append(&mut self.spawn_buffer);
    }

    /// Damage the player; true when the hit landed
    pub(crate) fn hurt_player(&mut self, amount: i32) -> bool {
        if !self.player.take_damage(amount) {
            return false;
        }
        self.sound(SoundEffect::PlayerHit);
        self.event(GameEvent::PlayerDamaged {
            amount,
            health: self.player.health,
        });
        true
    }

    /// Damage one enemy and queue its death cascade if this killed it
    pub(crate) fn damage_enemy(&mut self, index: usize, amount: f32) -> DamageOutcome {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return DamageOutcome::Ignored;
        };
        let outcome = enemy.take_damage(amount);
        match outcome {
            DamageOutcome::Damaged | DamageOutcome::Resurrected => self.sound(SoundEffect::Hit),
            DamageOutcome::Killed => {
                self.sound(SoundEffect::Death);
                self.death_queue.push_back(index);
            }
            DamageOutcome::Ignored => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(Catalog::builtin().unwrap(), Tuning::default(), "death_dealer", 1).unwrap()
    }

    #[test]
    fn test_unknown_character_rejected() {
        let err = GameState::new(Catalog::builtin().unwrap(), Tuning::default(), "nobody", 1).unwrap_err();
        assert_eq!(err, CatalogError::UnknownCharacter("nobody".into()));
    }

    #[test]
    fn test_new_session_on_title() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Title);
        assert_eq!(s.player.weapons.len(), 1);
        assert!(s.enemies.is_empty());
    }

    #[test]
    fn test_projectile_cap_drops_silently() {
        let mut s = state();
        s.tuning.limits.max_projectiles = 2;
        for _ in 0..5 {
            s.push_projectile(Projectile::hostile(Vec2::ZERO, 0.0, 1.0, 1.0, 1.0));
        }
        assert_eq!(s.projectiles.len(), 2);
        assert!(s.cap_warnings.projectiles);
    }

    #[test]
    fn test_spawn_cap_does_not_count_dropped() {
        let mut s = state();
        s.tuning.limits.max_enemies = 1;
        s.wave.start_wave(1);
        let before = s.wave.enemies_remaining;
        let def = s.catalog.enemy("zombie").unwrap().clone();
        for _ in 0..3 {
            let id = s.next_entity_id();
            let e = Enemy::spawn(id, &def, Vec2::ZERO, 1.0, &mut s.rng);
            s.push_spawn(e);
        }
        assert_eq!(s.spawn_buffer.len(), 1);
        assert_eq!(s.wave.enemies_remaining, before + 1);
        s.flush_spawns();
        assert_eq!(s.enemies.len(), 1);
    }

    #[test]
    fn test_drains_clear() {
        let mut s = state();
        s.sound(SoundEffect::Hit);
        s.event(GameEvent::LevelUp { level: 2 });
        assert_eq!(s.drain_sounds(), vec![SoundEffect::Hit]);
        assert!(s.drain_sounds().is_empty());
        assert_eq!(s.drain_events().len(), 1);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_undrained_buffers_stay_bounded() {
        let mut s = state();
        for _ in 0..MAX_PENDING_SOUNDS + 10 {
            s.sound(SoundEffect::Hit);
        }
        s.sound(SoundEffect::Victory);
        for level in 0..MAX_PENDING_EVENTS as u32 + 10 {
            s.event(GameEvent::LevelUp { level });
        }
        assert!(s.cap_warnings.sounds);
        assert!(s.cap_warnings.events);

        let sounds = s.drain_sounds();
        assert_eq!(sounds.len(), MAX_PENDING_SOUNDS);
        assert!(!sounds.contains(&SoundEffect::Victory));

        let events = s.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(events[0], GameEvent::LevelUp { level: 10 });
        let newest = MAX_PENDING_EVENTS as u32 + 9;
        assert_eq!(events.last(), Some(&GameEvent::LevelUp { level: newest }));
    }
}
