//! Simulation tick
//!
//! One call advances the session by one variable-length frame. The frame is
//! capped, menu input is routed by phase, deferred tasks come due, and the
//! world steps only while playing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::{BossRequest, HOSTILE_SHOT_SIZE, HOSTILE_SHOT_SPEED};
use super::cascade::{realize_clones, run_death_cascade, summon_minions};
use super::collision::{resolve_blades, resolve_contacts, resolve_projectiles};
use super::projectile::Projectile;
use super::schedule::Task;
use super::state::{CapWarnings, GameEvent, GamePhase, GameState};
use super::xp::OrbStep;
use crate::audio::SoundEffect;

/// Discrete menu input from keyboard or controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Back,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent, length at most 1
    pub movement: Vec2,
    pub menu: Option<MenuAction>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the session by `dt_ms` (capped at the configured frame limit)
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    let dt = dt_ms.clamp(0.0, state.tuning.max_frame_ms);

    if input.pause {
        state.toggle_pause();
    }
    if let Some(action) = input.menu {
        route_menu(state, action);
    }

    if !state.phase.is_terminal() {
        state.scheduler.advance(dt);
        for task in state.scheduler.take_due() {
            state.run_task(task);
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }
    step(state, input.movement, dt);
}

fn route_menu(state: &mut GameState, action: MenuAction) {
    match (state.phase, action) {
        (GamePhase::Title | GamePhase::GameOver | GamePhase::Victory, MenuAction::Confirm) => {
            state.start();
        }
        (GamePhase::Playing, MenuAction::Back) => {
            state.pause();
        }
        (GamePhase::Paused, MenuAction::Confirm | MenuAction::Back) => {
            state.resume();
        }
        (GamePhase::Upgrading, MenuAction::Left | MenuAction::Up) => state.move_cursor(-1),
        (GamePhase::Upgrading, MenuAction::Right | MenuAction::Down) => state.move_cursor(1),
        (GamePhase::Upgrading, MenuAction::Confirm) => {
            state.select_upgrade(state.cursor);
        }
        _ => {}
    }
}

/// One playing step
fn step(state: &mut GameState, movement: Vec2, dt: f32) {
    state.cap_warnings = CapWarnings::default();
    state.game_time_ms += dt as f64;
    let now = state.game_time_ms;
    let arena = state.arena();

    // Banners
    state.announcement_ms = (state.announcement_ms - dt).max(0.0);
    if state.boss_warning_ms > 0.0 {
        state.boss_warning_ms -= dt;
        if state.boss_warning_ms <= 0.0 {
            state.boss_warning_ms = 0.0;
            let wave = state.wave.wave;
            state.spawn_boss(wave);
        }
    }

    // Player and weapons
    state.player.update(movement, dt, arena);
    let volleys = state.player.fire_weapons(now, &state.enemies, &mut state.rng);
    for (pattern, shots) in volleys {
        state.sound(SoundEffect::Shoot(pattern));
        for p in shots {
            state.push_projectile(p);
        }
    }
    let turret_shots = state.player.update_turrets(dt, now, &state.enemies);
    for p in turret_shots {
        state.push_projectile(p);
    }

    // Wave spawns wait while the enemy list is full
    if state.wave.spawn_due(dt) && state.enemy_room() {
        let id = state.next_entity_id();
        if let Some(enemy) = state.wave.spawn_enemy(id, &state.catalog, &mut state.rng) {
            state.enemies.push(enemy);
        }
    }

    // Enemies
    let player_pos = state.player.pos;
    let mut pull = Vec2::ZERO;
    let mut requests = Vec::new();
    for i in 0..state.enemies.len() {
        let e = &mut state.enemies[i];
        let out = e.update(dt, player_pos, arena, &mut state.rng);
        pull += e.pull_on(player_pos);
        if out.killed_by_poison {
            state.sound(SoundEffect::Death);
            state.death_queue.push_back(i);
        }
        if let Some(action) = out.boss {
            requests.extend(action.requests);
        }
    }
    resolve_contacts(state);
    if state.player.is_dead() {
        state.game_over();
        return;
    }
    state.player.apply_pull(pull, dt, arena);
    run_death_cascade(state);

    for request in requests {
        match request {
            BossRequest::Minions { type_id, at, count } => summon_minions(state, &type_id, at, count),
            BossRequest::Volley { origin, angles, damage } => {
                for angle in angles {
                    state.push_projectile(Projectile::hostile(
                        origin,
                        angle,
                        HOSTILE_SHOT_SPEED,
                        HOSTILE_SHOT_SIZE,
                        damage,
                    ));
                }
            }
        }
    }

    // Hits
    resolve_projectiles(state, dt);
    resolve_blades(state);
    realize_clones(state);
    state.flush_spawns();
    state.enemies.retain(|e| !e.is_dead());

    if state.player.is_dead() {
        state.game_over();
        return;
    }

    if collect_orbs(state, dt) {
        return;
    }

    if !state.wave.cleared && state.wave.is_wave_complete() {
        finish_wave(state);
    }
}

/// Move orbs and award XP. Returns true when a level-up opened the upgrade
/// screen; orbs not yet reached this tick wait for the next one.
fn collect_orbs(state: &mut GameState, dt: f32) -> bool {
    let player_pos = state.player.pos;
    let range = state.player.pickup_range;
    let mut i = 0;
    while i < state.orbs.len() {
        match state.orbs[i].update(dt, player_pos, range) {
            OrbStep::Idle => i += 1,
            OrbStep::Expired => {
                state.orbs.swap_remove(i);
            }
            OrbStep::Collected => {
                let orb = state.orbs.swap_remove(i);
                state.sound(SoundEffect::Pickup);
                if state.player.add_xp(orb.value) {
                    let level = state.player.level;
                    log::info!("Level up to {}", level);
                    state.sound(SoundEffect::LevelUp);
                    state.event(GameEvent::LevelUp { level });
                    state.enter_upgrade();
                    if state.phase == GamePhase::Upgrading {
                        return true;
                    }
                }
            }
        }
    }
    false
}

fn finish_wave(state: &mut GameState) {
    let wave = state.wave.wave;
    state.wave.end_wave();
    log::info!("Wave {} cleared ({} kills total)", wave, state.wave.total_kills);
    state.event(GameEvent::WaveCleared { wave });
    if state.wave.is_game_won() {
        state.victory();
        return;
    }
    state
        .scheduler
        .schedule(state.tuning.timings.next_wave_delay_ms, Task::StartWave { wave: wave + 1 });
}
