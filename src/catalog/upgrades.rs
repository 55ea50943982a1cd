//! Stat upgrades offered on level-up

use serde::{Deserialize, Serialize};

/// What a stat upgrade does to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatEffect {
    /// Raises max and current health
    MaxHealth { amount: i32 },
    /// Multiplies movement speed
    MoveSpeed { factor: f32 },
    PickupRange { amount: f32 },
    /// Restores health up to max
    Heal { amount: i32 },
    FullHeal,
}

impl StatEffect {
    /// Heals are hidden from offers at full health
    pub fn is_heal(&self) -> bool {
        matches!(self, StatEffect::Heal { .. } | StatEffect::FullHeal)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatUpgradeDef {
    pub id: String,
    pub effect: StatEffect,
    /// `None` means it can be taken any number of times
    #[serde(default)]
    pub max_stacks: Option<u32>,
}

pub fn builtin() -> Vec<StatUpgradeDef> {
    vec![
        StatUpgradeDef {
            id: "max_health".into(),
            effect: StatEffect::MaxHealth { amount: 20 },
            max_stacks: Some(10),
        },
        StatUpgradeDef {
            id: "move_speed".into(),
            effect: StatEffect::MoveSpeed { factor: 1.1 },
            max_stacks: Some(5),
        },
        StatUpgradeDef {
            id: "pickup_range".into(),
            effect: StatEffect::PickupRange { amount: 30.0 },
            max_stacks: Some(5),
        },
        StatUpgradeDef {
            id: "heal".into(),
            effect: StatEffect::Heal { amount: 30 },
            max_stacks: None,
        },
        StatUpgradeDef {
            id: "full_heal".into(),
            effect: StatEffect::FullHeal,
            max_stacks: None,
        },
    ]
}
