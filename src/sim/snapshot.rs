//! Read-only session view for presentation layers

use serde::Serialize;

use super::enemy::Life;
use super::projectile::Faction;
use super::state::{GamePhase, GameState};
use super::upgrade::UpgradeChoice;
use super::xp::OrbTier;

#[derive(Debug, Clone, Serialize)]
pub struct WeaponView {
    pub id: String,
    pub level: u32,
    pub max_level: u32,
    pub pattern: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub facing: f32,
    pub health: i32,
    pub max_health: i32,
    pub invincible: bool,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub total_xp: u32,
    pub pickup_range: f32,
    pub weapons: Vec<WeaponView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub type_id: String,
    pub boss: bool,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    pub dying: bool,
    /// 0..1 through the death animation
    pub death_progress: f32,
    pub phased: bool,
    pub hit_flash: bool,
    pub poisoned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub id: u32,
    pub faction: Faction,
    pub pattern: &'static str,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub size: f32,
    /// Current cone radius for wave attacks
    pub reach: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrbView {
    pub x: f32,
    pub y: f32,
    pub value: u32,
    pub tier: OrbTier,
    pub size: f32,
}

/// Orbit blades and turrets, which live on weapons rather than in the
/// projectile list
#[derive(Debug, Clone, Serialize)]
pub struct HelperView {
    pub kind: &'static str,
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaveView {
    pub wave: u32,
    pub max_waves: u32,
    pub enemies_remaining: u32,
    pub enemies_to_spawn: u32,
    pub boss_wave: bool,
    pub boss_defeated: bool,
    pub total_kills: u32,
    pub announcement_ms: f32,
    pub boss_warning_ms: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub character: String,
    pub game_time_ms: f64,
    pub arena: (f32, f32),
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub helpers: Vec<HelperView>,
    pub orbs: Vec<OrbView>,
    pub wave: WaveView,
    pub choices: Vec<UpgradeChoice>,
    pub cursor: usize,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let p = &self.player;
        let player = PlayerView {
            x: p.pos.x,
            y: p.pos.y,
            size: p.size,
            facing: p.facing,
            health: p.health,
            max_health: p.max_health,
            invincible: p.is_invincible(),
            level: p.level,
            xp: p.xp,
            xp_to_next: p.xp_to_next,
            total_xp: p.total_xp,
            pickup_range: p.pickup_range,
            weapons: p
                .weapons
                .iter()
                .map(|w| WeaponView {
                    id: w.id().to_string(),
                    level: w.level,
                    max_level: w.def.max_level,
                    pattern: w.stats().pattern.name(),
                })
                .collect(),
        };

        let enemies = self
            .enemies
            .iter()
            .map(|e| EnemyView {
                id: e.id,
                type_id: e.type_id.clone(),
                boss: e.is_boss(),
                x: e.pos.x,
                y: e.pos.y,
                size: e.size,
                health: e.health.max(0.0),
                max_health: e.max_health,
                dying: e.is_dying(),
                death_progress: match e.life {
                    Life::Alive => 0.0,
                    Life::Dying { elapsed_ms } => (elapsed_ms / crate::consts::ENEMY_DEATH_MS).min(1.0),
                    Life::Dead => 1.0,
                },
                phased: e.is_phased(),
                hit_flash: e.hit_flash_ms > 0.0,
                poisoned: e.poison.is_some(),
            })
            .collect();

        let projectiles = self
            .projectiles
            .iter()
            .map(|pr| ProjectileView {
                id: pr.id,
                faction: pr.faction,
                pattern: pr.pattern,
                x: pr.pos.x,
                y: pr.pos.y,
                angle: pr.angle,
                size: pr.size,
                reach: pr.wave_reach(),
            })
            .collect();

        let mut helpers = Vec::new();
        for w in &p.weapons {
            helpers.extend(w.blades.iter().map(|b| HelperView {
                kind: "blade",
                x: b.pos.x,
                y: b.pos.y,
                size: b.size,
            }));
            helpers.extend(w.turrets.iter().map(|t| HelperView {
                kind: "turret",
                x: t.pos.x,
                y: t.pos.y,
                size: w.stats().size,
            }));
        }

        let orbs = self
            .orbs
            .iter()
            .map(|o| OrbView {
                x: o.pos.x,
                y: o.pos.y,
                value: o.value,
                tier: o.tier(),
                size: o.visual_size(),
            })
            .collect();

        let arena = self.arena();
        Snapshot {
            phase: self.phase,
            character: self.character.id.clone(),
            game_time_ms: self.game_time_ms,
            arena: (arena.x, arena.y),
            player,
            enemies,
            projectiles,
            helpers,
            orbs,
            wave: WaveView {
                wave: self.wave.wave,
                max_waves: self.wave.max_waves(),
                enemies_remaining: self.wave.enemies_remaining,
                enemies_to_spawn: self.wave.enemies_to_spawn,
                boss_wave: self.wave.boss_wave,
                boss_defeated: self.wave.boss_defeated,
                total_kills: self.wave.total_kills,
                announcement_ms: self.announcement_ms,
                boss_warning_ms: self.boss_warning_ms,
            },
            choices: self.choices.clone(),
            cursor: self.cursor,
        }
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_default()
    }
}
