//! Death cascade
//!
//! Kills are queued by index on the session and processed here, one at a
//! time, until the queue is empty. An explosion that kills its neighbours
//! only queues them, so chains of bloaters never recurse. Indices stay valid
//! because dead enemies are compacted only at the end of the tick and new
//! enemies go to the spawn buffer.

use glam::Vec2;

use super::enemy::Enemy;
use super::state::{GameEvent, GameState};
use crate::audio::SoundEffect;

/// Split children need a parent strictly larger than this
pub const SPLIT_MIN_SIZE: f32 = 10.0;
pub const SPLIT_OFFSET: f32 = 20.0;
pub const CLONE_OFFSET: f32 = 30.0;
/// Clones use this fraction of the wave multiplier
pub const CLONE_MULT: f32 = 0.6;
pub const MINION_SCATTER: f32 = 30.0;

pub(crate) fn run_death_cascade(state: &mut GameState) {
    while let Some(index) = state.death_queue.pop_front() {
        let Some(enemy) = state.enemies.get_mut(index) else {
            continue;
        };
        let pos = enemy.pos;
        let xp = enemy.xp_value;
        let was_boss = enemy.is_boss();
        let explosion = enemy.pending_explosion.take();
        let split = enemy.splits() && enemy.size > SPLIT_MIN_SIZE;
        let parent = split.then(|| enemy.clone());
        let type_id = enemy.type_id.clone();

        state.push_orb(pos, xp);
        state.wave.enemy_died(was_boss);

        if was_boss {
            log::info!("Boss {} defeated on wave {}", type_id, state.wave.wave);
            state.event(GameEvent::BossDefeated { boss_id: type_id });
        }

        if let Some(parent) = parent {
            split_enemy(state, &parent);
        }

        if let Some((radius, damage)) = explosion {
            explode(state, index, pos, radius, damage);
        }
    }
}

fn split_enemy(state: &mut GameState, parent: &Enemy) {
    for _ in 0..2 {
        let offset = Vec2::new(
            state.rng.range(-SPLIT_OFFSET, SPLIT_OFFSET),
            state.rng.range(-SPLIT_OFFSET, SPLIT_OFFSET),
        );
        let id = state.next_entity_id();
        let child = parent.split_child(id, parent.pos + offset);
        if state.push_spawn(child) {
            log::debug!("{} #{} split into #{}", parent.type_id, parent.id, id);
        }
    }
}

/// Radius damage from a dying enemy to every other enemy and the player
fn explode(state: &mut GameState, source: usize, at: Vec2, radius: f32, damage: f32) {
    state.sound(SoundEffect::Explosion);
    log::debug!("Explosion at ({:.0}, {:.0}) r={}", at.x, at.y, radius);
    for i in 0..state.enemies.len() {
        if i == source {
            continue;
        }
        let e = &state.enemies[i];
        if e.is_targetable() && e.pos.distance(at) <= radius {
            state.damage_enemy(i, damage);
        }
    }
    if state.player.pos.distance(at) <= radius {
        state.hurt_player(damage.floor() as i32);
    }
}

/// Radius damage from an explosive projectile. The enemy it struck is
/// included when it survived the direct hit.
pub(crate) fn burst(state: &mut GameState, at: Vec2, radius: f32, damage: f32) {
    state.sound(SoundEffect::Explosion);
    for i in 0..state.enemies.len() {
        let e = &state.enemies[i];
        if e.is_targetable() && e.pos.distance(at) < radius {
            state.damage_enemy(i, damage);
        }
    }
}

/// Spawn one reduced clone per hit flagged on clone-on-hit enemies
pub(crate) fn realize_clones(state: &mut GameState) {
    let mult = state.wave.wave_multiplier() * CLONE_MULT;
    for i in 0..state.enemies.len() {
        let pending = std::mem::take(&mut state.enemies[i].pending_clones);
        if pending == 0 {
            continue;
        }
        let type_id = state.enemies[i].type_id.clone();
        let origin = state.enemies[i].pos;
        let Some(def) = state.catalog.enemy(&type_id).cloned() else {
            continue;
        };
        for _ in 0..pending {
            let pos = origin
                + Vec2::new(
                    state.rng.range(-CLONE_OFFSET, CLONE_OFFSET),
                    state.rng.range(-CLONE_OFFSET, CLONE_OFFSET),
                );
            let id = state.next_entity_id();
            let clone = Enemy::clone_of(id, &def, pos, mult, &mut state.rng);
            if state.push_spawn(clone) {
                log::debug!("{} cloned as #{}", type_id, id);
            }
        }
    }
}

/// Minions summoned by a boss, scaled like regular wave enemies
pub(crate) fn summon_minions(state: &mut GameState, type_id: &str, at: Vec2, count: u32) {
    let Some(def) = state.catalog.enemy(type_id).cloned() else {
        debug_assert!(false, "unknown minion id '{}'", type_id);
        log::error!("Unknown minion id '{}', summon skipped", type_id);
        return;
    };
    let mult = state.wave.wave_multiplier();
    for _ in 0..count {
        let pos = at
            + Vec2::new(
                state.rng.range(-MINION_SCATTER, MINION_SCATTER),
                state.rng.range(-MINION_SCATTER, MINION_SCATTER),
            );
        let id = state.next_entity_id();
        let minion = Enemy::spawn(id, &def, pos, mult, &mut state.rng);
        state.push_spawn(minion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::DamageOutcome;
    use crate::catalog::Catalog;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let mut s = GameState::new(Catalog::builtin().unwrap(), Tuning::default(), "death_dealer", 9).unwrap();
        s.wave.start_wave(1);
        s.player.pos = Vec2::new(1000.0, 600.0);
        s
    }

    fn add(s: &mut GameState, type_id: &str, pos: Vec2) -> usize {
        let def = s.catalog.enemy(type_id).unwrap().clone();
        let id = s.next_entity_id();
        let e = Enemy::spawn(id, &def, pos, 1.0, &mut s.rng);
        s.enemies.push(e);
        s.enemies.len() - 1
    }

    fn strike(state: &mut GameState, index: usize, amount: f32) -> DamageOutcome {
        let outcome = state.damage_enemy(index, amount);
        if outcome == DamageOutcome::Killed {
            run_death_cascade(state);
        }
        outcome
    }

    #[test]
    fn test_kill_drops_orb_and_counts() {
        let mut s = state();
        let i = add(&mut s, "zombie", Vec2::new(100.0, 100.0));
        let before = s.wave.enemies_remaining;
        assert_eq!(strike(&mut s, i, 100.0), DamageOutcome::Killed);
        assert_eq!(s.orbs.len(), 1);
        assert_eq!(s.orbs[0].value, 10);
        assert_eq!(s.wave.enemies_remaining, before - 1);
        assert_eq!(s.wave.total_kills, 1);
    }

    #[test]
    fn test_split_spawns_two_children() {
        let mut s = state();
        let i = add(&mut s, "blob", Vec2::new(200.0, 200.0));
        let before = s.wave.enemies_remaining;
        strike(&mut s, i, 1000.0);
        assert_eq!(s.spawn_buffer.len(), 2);
        for c in &s.spawn_buffer {
            assert_eq!(c.size, 10.0);
            assert!(!c.splits());
            assert!(c.pos.distance(Vec2::new(200.0, 200.0)) <= SPLIT_OFFSET * 2f32.sqrt());
        }
        assert_eq!(s.wave.enemies_remaining, before - 1 + 2);
    }

    #[test]
    fn test_small_splitter_leaves_no_children() {
        let mut s = state();
        let i = add(&mut s, "blob", Vec2::new(200.0, 200.0));
        s.enemies[i].size = SPLIT_MIN_SIZE;
        strike(&mut s, i, 1000.0);
        assert!(s.spawn_buffer.is_empty());
    }

    #[test]
    fn test_explosion_chain_is_queued() {
        let mut s = state();
        let a = add(&mut s, "bloater", Vec2::new(100.0, 100.0));
        add(&mut s, "bloater", Vec2::new(150.0, 100.0));
        add(&mut s, "bat", Vec2::new(220.0, 100.0));
        add(&mut s, "zombie", Vec2::new(400.0, 100.0));
        for e in &mut s.enemies {
            e.health = 5.0;
        }
        strike(&mut s, a, 100.0);
        assert!(s.death_queue.is_empty());
        // Both bloaters and the bat within the second blast died; the zombie is untouched
        assert!(s.enemies[..3].iter().all(|e| e.is_dying()));
        assert!(!s.enemies[3].is_dying());
        assert_eq!(s.wave.total_kills, 3);
        assert_eq!(s.orbs.len(), 3);
    }

    #[test]
    fn test_explosion_hurts_player_in_radius() {
        let mut s = state();
        s.player.pos = Vec2::new(130.0, 100.0);
        let a = add(&mut s, "bloater", Vec2::new(100.0, 100.0));
        let health = s.player.health;
        strike(&mut s, a, 1000.0);
        assert_eq!(s.player.health, health - 20);
    }

    #[test]
    fn test_boss_death_marks_defeated() {
        let mut s = state();
        s.wave.start_wave(5);
        let boss = s.wave.spawn_boss(50, &s.catalog.clone(), &mut s.rng).unwrap();
        s.enemies.push(boss);
        strike(&mut s, 0, 1.0e6);
        assert!(s.wave.boss_defeated);
        assert!(s.drain_events().iter().any(|e| matches!(e, GameEvent::BossDefeated { .. })));
    }

    #[test]
    fn test_clones_realized_once_per_flag() {
        let mut s = state();
        let i = add(&mut s, "doppelganger", Vec2::new(300.0, 300.0));
        for _ in 0..3 {
            strike(&mut s, i, 1.0);
        }
        realize_clones(&mut s);
        assert_eq!(s.spawn_buffer.len(), 2);
        realize_clones(&mut s);
        assert_eq!(s.spawn_buffer.len(), 2);
        for c in &s.spawn_buffer {
            assert!(c.pos.distance(Vec2::new(300.0, 300.0)) <= CLONE_OFFSET * 2f32.sqrt());
        }
    }

    #[test]
    fn test_minions_count_against_wave() {
        let mut s = state();
        let before = s.wave.enemies_remaining;
        summon_minions(&mut s, "zombie", Vec2::new(500.0, 300.0), 3);
        assert_eq!(s.spawn_buffer.len(), 3);
        assert_eq!(s.wave.enemies_remaining, before + 3);
    }
}
