//! Level-up choices
//!
//! Choices come from a weighted pool: every eligible offer is pushed once
//! per unit of weight, the pool is shuffled and the first distinct offers
//! are taken.

use crate::catalog::{Catalog, StatEffect};
use crate::rng::GameRng;
use crate::sim::player::Player;
use serde::Serialize;
use std::collections::BTreeMap;

/// Pool weight of a new weapon while the player holds fewer than
/// [`FEW_WEAPONS`] weapons
pub const NEW_WEAPON_WEIGHT_EARLY: usize = 3;
pub const NEW_WEAPON_WEIGHT: usize = 1;
pub const FEW_WEAPONS: usize = 3;
pub const WEAPON_UPGRADE_WEIGHT: usize = 2;
pub const STAT_WEIGHT: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradeChoice {
    NewWeapon { weapon_id: String },
    WeaponUpgrade { weapon_id: String, next_level: u32 },
    Stat { upgrade_id: String },
}

impl UpgradeChoice {
    pub fn id(&self) -> &str {
        match self {
            UpgradeChoice::NewWeapon { weapon_id } | UpgradeChoice::WeaponUpgrade { weapon_id, .. } => weapon_id,
            UpgradeChoice::Stat { upgrade_id } => upgrade_id,
        }
    }

    fn same_offer(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other) && self.id() == other.id()
    }
}

/// Tracks how many times each stat upgrade has been taken this run
#[derive(Debug, Clone, Default)]
pub struct UpgradeSelector {
    stacks: BTreeMap<String, u32>,
}

impl UpgradeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stacks(&self, upgrade_id: &str) -> u32 {
        self.stacks.get(upgrade_id).copied().unwrap_or(0)
    }

    fn under_cap(&self, upgrade_id: &str, max_stacks: Option<u32>) -> bool {
        max_stacks.is_none_or(|max| self.stacks(upgrade_id) < max)
    }

    fn stat_offer_allowed(&self, catalog: &Catalog, upgrade_id: &str, player: &Player) -> bool {
        let Some(def) = catalog.upgrade(upgrade_id) else {
            return false;
        };
        if !self.under_cap(&def.id, def.max_stacks) {
            return false;
        }
        match def.effect {
            StatEffect::Heal { .. } => !player.is_full_health(),
            StatEffect::FullHeal => player.health * 2 < player.max_health,
            _ => true,
        }
    }

    pub fn generate_choices(&self, player: &Player, catalog: &Catalog, count: usize, rng: &mut GameRng) -> Vec<UpgradeChoice> {
        let mut pool = Vec::new();

        if player.has_free_slot() {
            let weight = if player.weapons.len() < FEW_WEAPONS {
                NEW_WEAPON_WEIGHT_EARLY
            } else {
                NEW_WEAPON_WEIGHT
            };
            for w in catalog.weapons().iter().filter(|w| !player.has_weapon(&w.id)) {
                for _ in 0..weight {
                    pool.push(UpgradeChoice::NewWeapon {
                        weapon_id: w.id.clone(),
                    });
                }
            }
        }

        let upgrades: Vec<UpgradeChoice> = player
            .weapons
            .iter()
            .filter(|w| !w.is_max_level())
            .map(|w| UpgradeChoice::WeaponUpgrade {
                weapon_id: w.id().to_string(),
                next_level: w.level + 1,
            })
            .collect();
        for u in &upgrades {
            for _ in 0..WEAPON_UPGRADE_WEIGHT {
                pool.push(u.clone());
            }
        }

        for def in catalog.upgrades() {
            if self.stat_offer_allowed(catalog, &def.id, player) {
                for _ in 0..STAT_WEIGHT {
                    pool.push(UpgradeChoice::Stat {
                        upgrade_id: def.id.clone(),
                    });
                }
            }
        }

        rng.shuffle(&mut pool);
        let mut choices: Vec<UpgradeChoice> = Vec::with_capacity(count);
        for offer in pool {
            if choices.len() >= count {
                break;
            }
            if !choices.iter().any(|c| c.same_offer(&offer)) {
                choices.push(offer);
            }
        }

        if choices.len() < count && !player.is_full_health() {
            let heal = catalog
                .upgrades()
                .iter()
                .find(|u| matches!(u.effect, StatEffect::Heal { .. }) && self.under_cap(&u.id, u.max_stacks));
            if let Some(heal) = heal {
                let offer = UpgradeChoice::Stat {
                    upgrade_id: heal.id.clone(),
                };
                if !choices.iter().any(|c| c.same_offer(&offer)) {
                    choices.push(offer);
                }
            }
        }
        for u in upgrades {
            if choices.len() >= count {
                break;
            }
            if !choices.iter().any(|c| c.same_offer(&u)) {
                choices.push(u);
            }
        }

        choices
    }

    /// Apply a choice made from [`UpgradeSelector::generate_choices`].
    /// Returns false when it no longer applies (slots filled, weapon maxed
    /// or stat capped); the player is left unchanged in that case.
    pub fn apply_choice(&mut self, choice: &UpgradeChoice, player: &mut Player, catalog: &Catalog) -> bool {
        match choice {
            UpgradeChoice::NewWeapon { weapon_id } => {
                if !player.has_free_slot() {
                    return false;
                }
                player.add_weapon(catalog.weapon_or_fallback(weapon_id))
            }
            UpgradeChoice::WeaponUpgrade { weapon_id, .. } => {
                let mult = player.damage_mult;
                match player.weapon_mut(weapon_id) {
                    Some(w) => w.level_up(mult),
                    None => false,
                }
            }
            UpgradeChoice::Stat { upgrade_id } => self.apply_upgrade(upgrade_id, player, catalog),
        }
    }

    pub fn apply_upgrade(&mut self, upgrade_id: &str, player: &mut Player, catalog: &Catalog) -> bool {
        let Some(def) = catalog.upgrade(upgrade_id) else {
            debug_assert!(false, "unknown upgrade id '{}'", upgrade_id);
            log::error!("Unknown upgrade id '{}', ignored", upgrade_id);
            return false;
        };
        if !self.under_cap(&def.id, def.max_stacks) {
            return false;
        }
        player.apply_stat(&def.effect);
        *self.stacks.entry(def.id.clone()).or_insert(0) += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn setup() -> (Catalog, Player) {
        let catalog = Catalog::builtin().unwrap();
        let character = catalog.character("death_dealer").unwrap().clone();
        let player = Player::new(&character, catalog.weapon_or_fallback(&character.starting_weapon), Vec2::new(1280.0, 720.0));
        (catalog, player)
    }

    #[test]
    fn test_choices_are_distinct_and_counted() {
        let (catalog, player) = setup();
        let selector = UpgradeSelector::new();
        for seed in 0..20 {
            let mut rng = GameRng::new(seed);
            let choices = selector.generate_choices(&player, &catalog, 3, &mut rng);
            assert_eq!(choices.len(), 3);
            for (i, a) in choices.iter().enumerate() {
                for b in &choices[i + 1..] {
                    assert!(!a.same_offer(b));
                }
            }
        }
    }

    #[test]
    fn test_heals_hidden_at_full_health() {
        let (catalog, player) = setup();
        let selector = UpgradeSelector::new();
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            for c in selector.generate_choices(&player, &catalog, 3, &mut rng) {
                assert!(!matches!(&c, UpgradeChoice::Stat { upgrade_id } if upgrade_id == "heal" || upgrade_id == "full_heal"));
            }
        }
    }

    #[test]
    fn test_full_heal_only_below_half_health() {
        let (catalog, mut player) = setup();
        let selector = UpgradeSelector::new();
        player.health = 60;
        assert!(!selector.stat_offer_allowed(&catalog, "full_heal", &player));
        assert!(selector.stat_offer_allowed(&catalog, "heal", &player));
        player.health = player.max_health / 2;
        assert!(!selector.stat_offer_allowed(&catalog, "full_heal", &player));
        player.health = player.max_health / 2 - 1;
        assert!(selector.stat_offer_allowed(&catalog, "full_heal", &player));
    }

    #[test]
    fn test_no_new_weapons_when_slots_full() {
        let (catalog, mut player) = setup();
        for w in catalog.weapons().iter().skip(1).take(3) {
            player.add_weapon(w);
        }
        let selector = UpgradeSelector::new();
        let mut rng = GameRng::new(3);
        let choices = selector.generate_choices(&player, &catalog, 3, &mut rng);
        assert!(choices.iter().all(|c| !matches!(c, UpgradeChoice::NewWeapon { .. })));
        let new_weapon = UpgradeChoice::NewWeapon {
            weapon_id: catalog.weapons()[5].id.clone(),
        };
        let mut selector = selector;
        assert!(!selector.apply_choice(&new_weapon, &mut player, &catalog));
    }

    #[test]
    fn test_pool_exhaustion_returns_fewer() {
        let (catalog, mut player) = setup();
        let mut selector = UpgradeSelector::new();
        for w in catalog.weapons().iter().skip(1).take(3) {
            player.add_weapon(w);
        }
        for w in &mut player.weapons {
            while w.level_up(1.0) {}
        }
        for id in ["max_health", "move_speed", "pickup_range"] {
            while selector.apply_upgrade(id, &mut player, &catalog) {}
        }
        let mut rng = GameRng::new(1);
        assert!(selector.generate_choices(&player, &catalog, 3, &mut rng).is_empty());

        player.health -= 10;
        let choices = selector.generate_choices(&player, &catalog, 3, &mut rng);
        assert_eq!(
            choices,
            vec![UpgradeChoice::Stat {
                upgrade_id: "heal".into()
            }]
        );
    }

    #[test]
    fn test_weapon_upgrade_levels_weapon() {
        let (catalog, mut player) = setup();
        let mut selector = UpgradeSelector::new();
        let choice = UpgradeChoice::WeaponUpgrade {
            weapon_id: "blood_shooter".into(),
            next_level: 2,
        };
        assert!(selector.apply_choice(&choice, &mut player, &catalog));
        assert_eq!(player.weapons[0].level, 2);
    }

    proptest! {
        #[test]
        fn prop_stack_cap_holds(attempts in 1usize..30) {
            let (catalog, mut player) = setup();
            let mut selector = UpgradeSelector::new();
            let mut applied = 0;
            for _ in 0..attempts {
                let before = (player.health, player.max_health);
                if selector.apply_upgrade("max_health", &mut player, &catalog) {
                    applied += 1;
                } else {
                    prop_assert_eq!(before, (player.health, player.max_health));
                }
            }
            prop_assert_eq!(applied, attempts.min(10));
            prop_assert_eq!(selector.stacks("max_health") as usize, attempts.min(10));
        }
    }
}
