//! Regular enemy types and their behavior components

use serde::{Deserialize, Serialize};

/// Behavior attached to an enemy type. Each one becomes a runtime component
/// on every spawned instance of that type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorDef {
    /// Periodically rotates its heading by a random angle
    Erratic,
    /// Toggles intangibility on a fixed period
    Phasing,
    /// Jumps to a point near the player on a random countdown
    Teleports,
    /// Breaks into two smaller copies on death
    SplitsOnDeath,
    /// Damages everything nearby on death
    ExplodesOnDeath { radius: f32, damage: f32 },
    /// Survives the first lethal hit at half health
    Resurrects,
    /// Spawns a weaker copy of itself when hit
    ClonesOnHit { max_clones: u32 },
    /// Drags the player toward itself
    PullsPlayer { strength: f32, range: f32 },
}

/// Base stats for one enemy type, before wave scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: String,
    pub size: f32,
    pub health: f32,
    pub damage: f32,
    /// Pixels per reference frame
    pub speed: f32,
    pub xp_value: u32,
    pub spawn_weight: f32,
    /// First wave this type may appear in
    pub min_wave: u32,
    #[serde(default)]
    pub behaviors: Vec<BehaviorDef>,
}

#[allow(clippy::too_many_arguments)]
fn enemy(
    id: &str,
    size: f32,
    health: f32,
    damage: f32,
    speed: f32,
    xp_value: u32,
    spawn_weight: f32,
    min_wave: u32,
    behaviors: Vec<BehaviorDef>,
) -> EnemyDef {
    EnemyDef {
        id: id.to_string(),
        size,
        health,
        damage,
        speed,
        xp_value,
        spawn_weight,
        min_wave,
        behaviors,
    }
}

/// Shipped enemy roster, in spawn-selection order
pub fn builtin() -> Vec<EnemyDef> {
    use BehaviorDef::*;
    vec![
        enemy("zombie", 14.0, 20.0, 10.0, 1.2, 10, 40.0, 1, vec![]),
        enemy("skeleton", 12.0, 15.0, 8.0, 2.0, 8, 30.0, 1, vec![]),
        enemy("ghost", 16.0, 25.0, 12.0, 1.5, 15, 20.0, 2, vec![Phasing]),
        enemy("demon", 18.0, 40.0, 15.0, 1.8, 25, 15.0, 3, vec![]),
        enemy("blob", 20.0, 60.0, 8.0, 0.8, 20, 10.0, 2, vec![SplitsOnDeath]),
        enemy("bat", 10.0, 10.0, 5.0, 3.0, 5, 25.0, 1, vec![Erratic]),
        enemy("wraith", 16.0, 30.0, 20.0, 2.5, 30, 8.0, 4, vec![Teleports]),
        enemy(
            "bloater",
            22.0,
            35.0,
            10.0,
            1.0,
            18,
            10.0,
            5,
            vec![ExplodesOnDeath {
                radius: 80.0,
                damage: 20.0,
            }],
        ),
        enemy(
            "doppelganger",
            15.0,
            30.0,
            12.0,
            2.0,
            22,
            6.0,
            6,
            vec![ClonesOnHit { max_clones: 2 }],
        ),
        enemy(
            "void_walker",
            18.0,
            45.0,
            15.0,
            1.0,
            28,
            6.0,
            7,
            vec![PullsPlayer {
                strength: 1.5,
                range: 250.0,
            }],
        ),
        enemy("revenant", 16.0, 35.0, 14.0, 1.4, 30, 6.0, 8, vec![Resurrects]),
    ]
}
