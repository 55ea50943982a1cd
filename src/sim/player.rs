//! Player entity

use crate::catalog::{CharacterDef, StatEffect, WeaponDef};
use crate::consts::*;
use crate::rng::GameRng;
use crate::sim::enemy::Enemy;
use crate::sim::projectile::{Projectile, nearest_living};
use crate::sim::weapon::Weapon;
use crate::{angle_between, clamp_to_rect, frame_scale};
use glam::Vec2;
use std::f32::consts::PI;

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Current velocity, pixels per reference frame
    pub vel: Vec2,
    pub size: f32,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub pickup_range: f32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub total_xp: u32,
    pub level: u32,
    pub damage_mult: f32,
    pub xp_bonus: f32,
    pub invincible_ms: f32,
    /// Slot order is display and firing order
    pub weapons: Vec<Weapon>,
}

impl Player {
    /// Fresh player for `character`, centered in the arena and holding its
    /// starting weapon
    pub fn new(character: &CharacterDef, starting_weapon: &WeaponDef, arena: Vec2) -> Self {
        let max_health = (PLAYER_BASE_HEALTH * character.health_mod).floor() as i32;
        let mut player = Self {
            pos: arena / 2.0,
            vel: Vec2::ZERO,
            size: PLAYER_SIZE,
            health: max_health,
            max_health,
            speed: PLAYER_BASE_SPEED * character.speed_mod,
            facing: 1.0,
            pickup_range: PLAYER_PICKUP_RANGE,
            xp: 0,
            xp_to_next: XP_FIRST_LEVEL,
            total_xp: 0,
            level: 1,
            damage_mult: character.damage_mod,
            xp_bonus: character.xp_bonus,
            invincible_ms: 0.0,
            weapons: Vec::with_capacity(PLAYER_MAX_WEAPONS),
        };
        player.add_weapon(starting_weapon);
        player
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    /// Apply a hit unless inside the post-hit invincibility window.
    /// Returns whether damage landed.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.is_invincible() || self.is_dead() || amount <= 0 {
            return false;
        }
        self.health -= amount;
        self.invincible_ms = PLAYER_INVINCIBLE_MS;
        true
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn is_full_health(&self) -> bool {
        self.health >= self.max_health
    }

    /// Add XP from one orb. At most one level is gained per award; returns
    /// true on level-up.
    pub fn add_xp(&mut self, amount: u32) -> bool {
        let gained = (amount as f32 * self.xp_bonus).floor() as u32;
        self.xp += gained;
        self.total_xp += gained;
        if self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.xp_to_next = (self.xp_to_next as f32 * XP_GROWTH).floor() as u32;
            return true;
        }
        false
    }

    pub fn has_weapon(&self, id: &str) -> bool {
        self.weapons.iter().any(|w| w.id() == id)
    }

    pub fn weapon_mut(&mut self, id: &str) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.id() == id)
    }

    pub fn has_free_slot(&self) -> bool {
        self.weapons.len() < PLAYER_MAX_WEAPONS
    }

    /// Equip a new weapon at level 1. False when the slots are full or the
    /// type is already held.
    pub fn add_weapon(&mut self, def: &WeaponDef) -> bool {
        if !self.has_free_slot() || self.has_weapon(&def.id) {
            return false;
        }
        self.weapons.push(Weapon::new(def, 1, self.damage_mult));
        true
    }

    pub fn apply_stat(&mut self, effect: &StatEffect) {
        match *effect {
            StatEffect::MaxHealth { amount } => {
                self.max_health += amount;
                self.health += amount;
            }
            StatEffect::MoveSpeed { factor } => self.speed *= factor,
            StatEffect::PickupRange { amount } => self.pickup_range += amount,
            StatEffect::Heal { amount } => self.heal(amount),
            StatEffect::FullHeal => self.health = self.max_health,
        }
    }

    /// Move by the input intent and advance timers and orbit blades
    pub fn update(&mut self, movement: Vec2, dt_ms: f32, arena: Vec2) {
        let intent = if movement.length_squared() > 1.0 {
            movement.normalize()
        } else {
            movement
        };
        self.vel = intent * self.speed;
        if self.vel.x != 0.0 {
            self.facing = self.vel.x.signum();
        }
        self.pos += self.vel * frame_scale(dt_ms);
        self.clamp_to_arena(arena);

        if self.invincible_ms > 0.0 {
            self.invincible_ms = (self.invincible_ms - dt_ms).max(0.0);
        }

        let center = self.pos;
        for w in &mut self.weapons {
            w.update_blades(center, dt_ms);
        }
    }

    /// Apply the summed pull of every pulling enemy, once per tick
    pub fn apply_pull(&mut self, pull: Vec2, dt_ms: f32, arena: Vec2) {
        if pull == Vec2::ZERO {
            return;
        }
        self.pos += pull * frame_scale(dt_ms);
        self.clamp_to_arena(arena);
    }

    fn clamp_to_arena(&mut self, arena: Vec2) {
        let half = Vec2::splat(self.size / 2.0);
        self.pos = clamp_to_rect(self.pos, half, arena - half);
    }

    /// Aim at the nearest living enemy, or along the facing direction
    pub fn aim(&self, enemies: &[Enemy]) -> f32 {
        match nearest_living(enemies, self.pos) {
            Some(e) => angle_between(self.pos, e.pos),
            None if self.facing < 0.0 => PI,
            None => 0.0,
        }
    }

    /// Fire every ready weapon. Returns each firing weapon's pattern name
    /// with its shots.
    pub fn fire_weapons(&mut self, now: f64, enemies: &[Enemy], rng: &mut GameRng) -> Vec<(&'static str, Vec<Projectile>)> {
        let aim = self.aim(enemies);
        let origin = self.pos;
        let mult = self.damage_mult;
        self.weapons
            .iter_mut()
            .filter(|w| w.fires_directly())
            .filter_map(|w| {
                let shots = w.fire(origin, aim, now, mult, rng);
                (!shots.is_empty()).then(|| (w.stats().pattern.name(), shots))
            })
            .collect()
    }

    pub fn update_turrets(&mut self, dt_ms: f32, now: f64, enemies: &[Enemy]) -> Vec<Projectile> {
        let center = self.pos;
        let mult = self.damage_mult;
        self.weapons
            .iter_mut()
            .flat_map(|w| w.update_turrets(center, dt_ms, now, enemies, mult))
            .collect()
    }
}
