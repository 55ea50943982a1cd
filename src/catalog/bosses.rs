//! Boss types

use serde::{Deserialize, Serialize};

/// Periodic special attack a boss cycles through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPattern {
    Charge,
    Spiral,
    Teleport,
    /// Rotates through the other three
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDef {
    pub id: String,
    pub size: f32,
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
    pub xp_value: u32,
    pub attack_pattern: AttackPattern,
    /// Enemy type summoned periodically, if any
    #[serde(default)]
    pub minion: Option<String>,
    #[serde(default)]
    pub shoots_projectiles: bool,
    #[serde(default)]
    pub is_final_boss: bool,
}

#[allow(clippy::too_many_arguments)]
fn boss(
    id: &str,
    size: f32,
    health: f32,
    damage: f32,
    speed: f32,
    xp_value: u32,
    attack_pattern: AttackPattern,
    is_final_boss: bool,
) -> BossDef {
    BossDef {
        id: id.to_string(),
        size,
        health,
        damage,
        speed,
        xp_value,
        attack_pattern,
        minion: None,
        shoots_projectiles: false,
        is_final_boss,
    }
}

pub fn builtin() -> Vec<BossDef> {
    use AttackPattern::*;
    vec![
        BossDef {
            minion: Some("zombie".to_string()),
            ..boss("mega_zombie", 60.0, 500.0, 25.0, 0.8, 200, Charge, false)
        },
        BossDef {
            shoots_projectiles: true,
            ..boss("demon_lord", 70.0, 750.0, 30.0, 1.0, 300, Spiral, false)
        },
        BossDef {
            minion: Some("ghost".to_string()),
            ..boss("ghost_king", 65.0, 600.0, 20.0, 1.5, 250, Teleport, false)
        },
        boss("nightmare", 80.0, 1000.0, 35.0, 1.2, 500, All, true),
        // granny_graves
        boss("denture_dragon", 65.0, 550.0, 22.0, 0.9, 220, Charge, false),
        boss("bingo_beast", 70.0, 650.0, 25.0, 0.8, 280, Spiral, false),
        boss("knitting_nightmare", 60.0, 500.0, 30.0, 1.2, 250, Teleport, false),
        boss("grandpa_ghoul", 80.0, 1000.0, 35.0, 0.7, 500, All, true),
        // edgy_eddie
        boss("emo_emperor", 65.0, 480.0, 28.0, 1.3, 230, Charge, false),
        boss("darkness_daddy", 70.0, 600.0, 30.0, 1.1, 300, Spiral, false),
        boss("tears_titan", 75.0, 700.0, 25.0, 0.9, 320, Teleport, false),
        boss("void_vincent", 85.0, 1100.0, 40.0, 1.0, 550, All, true),
        // chef_cleaver
        boss("glutton_golem", 80.0, 700.0, 20.0, 0.6, 250, Charge, false),
        boss("food_fight_fiend", 65.0, 550.0, 28.0, 1.0, 270, Spiral, false),
        boss("kitchen_kraken", 90.0, 800.0, 25.0, 0.8, 350, Teleport, false),
        boss("hangry_horror", 85.0, 1200.0, 38.0, 1.1, 600, All, true),
        // disco_dave
        boss("boogie_beast", 65.0, 500.0, 24.0, 1.4, 220, Charge, false),
        boss("funky_phantom", 60.0, 450.0, 22.0, 1.5, 240, Teleport, false),
        boss("rhythm_reaper", 70.0, 650.0, 30.0, 1.2, 310, Spiral, false),
        boss("saturday_nightmare", 80.0, 950.0, 35.0, 1.3, 520, All, true),
        // nerdy_nancy
        boss("algorithm_abomination", 65.0, 520.0, 26.0, 1.1, 240, Charge, false),
        boss("binary_behemoth", 75.0, 680.0, 28.0, 0.9, 290, Spiral, false),
        boss("stack_overflow_specter", 70.0, 600.0, 32.0, 1.3, 330, Teleport, false),
        boss("final_boss_404", 85.0, 1050.0, 36.0, 1.0, 540, All, true),
    ]
}
