//! Playable characters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDef {
    pub id: String,
    #[serde(default = "one")]
    pub health_mod: f32,
    #[serde(default = "one")]
    pub speed_mod: f32,
    #[serde(default = "one")]
    pub damage_mod: f32,
    #[serde(default = "one")]
    pub xp_bonus: f32,
    pub starting_weapon: String,
    /// Boss per boss wave in order; the last one is the final boss
    pub bosses: Vec<String>,
}

fn one() -> f32 {
    1.0
}

fn character(id: &str, starting_weapon: &str, bosses: [&str; 4]) -> CharacterDef {
    CharacterDef {
        id: id.to_string(),
        health_mod: 1.0,
        speed_mod: 1.0,
        damage_mod: 1.0,
        xp_bonus: 1.0,
        starting_weapon: starting_weapon.to_string(),
        bosses: bosses.iter().map(|b| b.to_string()).collect(),
    }
}

pub fn builtin() -> Vec<CharacterDef> {
    vec![
        character(
            "death_dealer",
            "blood_shooter",
            ["mega_zombie", "demon_lord", "ghost_king", "nightmare"],
        ),
        CharacterDef {
            speed_mod: 0.8,
            damage_mod: 1.3,
            ..character(
                "granny_graves",
                "reaper_scythe",
                ["denture_dragon", "bingo_beast", "knitting_nightmare", "grandpa_ghoul"],
            )
        },
        CharacterDef {
            speed_mod: 1.3,
            health_mod: 0.7,
            ..character(
                "edgy_eddie",
                "soul_seeker",
                ["emo_emperor", "darkness_daddy", "tears_titan", "void_vincent"],
            )
        },
        character(
            "chef_cleaver",
            "meat_cannon",
            ["glutton_golem", "food_fight_fiend", "kitchen_kraken", "hangry_horror"],
        ),
        character(
            "disco_dave",
            "hellfire_nova",
            ["boogie_beast", "funky_phantom", "rhythm_reaper", "saturday_nightmare"],
        ),
        CharacterDef {
            xp_bonus: 1.2,
            ..character(
                "nerdy_nancy",
                "ghost_chain",
                [
                    "algorithm_abomination",
                    "binary_behemoth",
                    "stack_overflow_specter",
                    "final_boss_404",
                ],
            )
        },
    ]
}
