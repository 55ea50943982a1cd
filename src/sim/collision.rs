//! Projectile, blade and hostile-shot resolution
//!
//! Needs every collection at once, so it lives with the orchestrator rather
//! than on any entity. The projectile list is taken out of the session for
//! the pass; nothing pushes projectiles while it is out.

use glam::Vec2;

use super::cascade::{burst, run_death_cascade};
use super::enemy::DamageOutcome;
use super::projectile::{Faction, Projectile, ProjectileKind};
use super::state::GameState;
use crate::{angle_between, angle_diff};

/// Update every projectile, resolve its hits and drop spent ones
pub(crate) fn resolve_projectiles(state: &mut GameState, dt_ms: f32) {
    let arena = state.arena();
    let mut projectiles = std::mem::take(&mut state.projectiles);
    projectiles.retain_mut(|p| {
        if !p.update(dt_ms, &state.enemies) || p.out_of_bounds(arena) {
            return false;
        }
        match p.faction {
            Faction::Hostile => !hits_player(state, p),
            Faction::Player => resolve_player_shot(state, p),
        }
    });
    projectiles.append(&mut state.projectiles);
    state.projectiles = projectiles;
}

fn hits_player(state: &mut GameState, p: &Projectile) -> bool {
    if p.pos.distance(state.player.pos) < state.player.size / 2.0 + p.size {
        state.hurt_player(p.damage.floor() as i32);
        return true;
    }
    false
}

/// Returns whether the projectile survives
fn resolve_player_shot(state: &mut GameState, p: &mut Projectile) -> bool {
    match p.kind {
        ProjectileKind::Wave { cone, .. } => {
            sweep_cone(state, p, cone);
            true
        }
        ProjectileKind::Puddle { .. } => {
            if p.take_puddle_tick() {
                for i in 0..state.enemies.len() {
                    let e = &state.enemies[i];
                    if e.is_targetable() && p.pos.distance(e.pos) < p.size {
                        state.damage_enemy(i, p.damage);
                    }
                }
                run_death_cascade(state);
            }
            true
        }
        _ => resolve_direct_hit(state, p),
    }
}

/// Cone attack: each enemy at most once per cast, inside the growing reach
/// and within half the cone width of the firing angle
fn sweep_cone(state: &mut GameState, p: &mut Projectile, cone: f32) {
    let reach = p.wave_reach();
    for i in 0..state.enemies.len() {
        let e = &state.enemies[i];
        if !e.is_targetable() || p.has_hit(e.id) {
            continue;
        }
        if p.pos.distance(e.pos) > reach + e.size / 2.0 {
            continue;
        }
        if angle_diff(angle_between(p.pos, e.pos), p.angle) > cone / 2.0 {
            continue;
        }
        let id = e.id;
        p.mark_hit(id, None);
        state.damage_enemy(i, p.damage);
    }
    run_death_cascade(state);
}

fn resolve_direct_hit(state: &mut GameState, p: &mut Projectile) -> bool {
    let rehit = p.rehit_rule();
    let chaining = matches!(p.kind, ProjectileKind::Chain { .. });
    let target = state.enemies.iter().position(|e| {
        e.is_targetable()
            && p.pos.distance(e.pos) < p.size + e.size / 2.0
            && !((rehit.is_some() || chaining) && p.has_hit(e.id))
    });
    let Some(index) = target else {
        return true;
    };
    let enemy_id = state.enemies[index].id;
    let enemy_pos = state.enemies[index].pos;

    let outcome = state.damage_enemy(index, p.damage);
    if let ProjectileKind::Poison { damage, duration_ms } = p.kind {
        if outcome != DamageOutcome::Killed {
            state.enemies[index].apply_poison(damage, duration_ms);
        }
    }
    // Deaths settle before any pattern follow-up sees the enemy list
    run_death_cascade(state);

    match p.kind {
        ProjectileKind::Explosive { radius } => {
            burst(state, p.pos, radius, p.damage);
            run_death_cascade(state);
            false
        }
        ProjectileKind::Chain { remaining, range } => {
            p.mark_hit(enemy_id, None);
            if remaining == 0 {
                return false;
            }
            let next = state
                .enemies
                .iter()
                .filter(|e| e.id != enemy_id && e.is_targetable() && !p.has_hit(e.id))
                .map(|e| (e.pos, e.pos.distance(enemy_pos)))
                .filter(|(_, d)| *d < range)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match next {
                Some((to, _)) => {
                    p.kind = ProjectileKind::Chain {
                        remaining: remaining - 1,
                        range,
                    };
                    let dir = (to - p.pos).normalize_or_zero();
                    if dir != Vec2::ZERO {
                        p.vel = dir * p.speed;
                        p.angle = dir.y.atan2(dir.x);
                    }
                    true
                }
                None => false,
            }
        }
        _ => match rehit {
            Some(cooldown) => {
                p.mark_hit(enemy_id, cooldown);
                true
            }
            None => false,
        },
    }
}

/// Orbit blades hit every enemy they touch, each at most once per cooldown
pub(crate) fn resolve_blades(state: &mut GameState) {
    let mut weapons = std::mem::take(&mut state.player.weapons);
    for weapon in &mut weapons {
        for blade in &mut weapon.blades {
            for i in 0..state.enemies.len() {
                let e = &state.enemies[i];
                if !e.is_targetable() || !blade.can_hit(e.id) {
                    continue;
                }
                if blade.pos.distance(e.pos) < blade.size + e.size / 2.0 {
                    blade.register_hit(e.id);
                    state.damage_enemy(i, blade.damage);
                }
            }
        }
    }
    state.player.weapons = weapons;
    run_death_cascade(state);
}

/// Enemy bodies touching the player deal their contact damage
pub(crate) fn resolve_contacts(state: &mut GameState) {
    let reach = state.player.size / 2.0;
    let player = state.player.pos;
    let hits: Vec<i32> = state
        .enemies
        .iter()
        .filter(|e| e.is_targetable() && e.pos.distance(player) < reach + e.size / 2.0)
        .map(|e| e.damage)
        .collect();
    for damage in hits {
        if state.hurt_player(damage) {
            break;
        }
    }
}
