//! Read-only type catalog
//!
//! All enemy, boss, weapon, upgrade and character tables are assembled into
//! one [`Catalog`] before a session starts. Ids share a single namespace and
//! every cross-reference (starting weapons, boss rosters, minion types) is
//! checked once at assembly, so lookups inside a running session only fail
//! on a programming error.

pub mod bosses;
pub mod characters;
pub mod enemies;
pub mod upgrades;
pub mod weapons;

pub use bosses::{AttackPattern, BossDef};
pub use characters::CharacterDef;
pub use enemies::{BehaviorDef, EnemyDef};
pub use upgrades::{StatEffect, StatUpgradeDef};
pub use weapons::{LevelBonuses, PatternDef, WeaponDef, WeaponStats};

use crate::error::{CatalogError, GameResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw tables, the shape used by JSON catalog files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogTables {
    pub enemies: Vec<EnemyDef>,
    pub bosses: Vec<BossDef>,
    pub weapons: Vec<WeaponDef>,
    pub upgrades: Vec<StatUpgradeDef>,
    pub characters: Vec<CharacterDef>,
}

impl CatalogTables {
    pub fn builtin() -> Self {
        Self {
            enemies: enemies::builtin(),
            bosses: bosses::builtin(),
            weapons: weapons::builtin(),
            upgrades: upgrades::builtin(),
            characters: characters::builtin(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Enemy(usize),
    Boss(usize),
    Weapon(usize),
    Upgrade(usize),
    Character(usize),
}

/// Validated, indexed catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: CatalogTables,
    index: HashMap<String, Entry>,
    fallback_weapon: WeaponDef,
}

impl Catalog {
    /// The shipped game data
    pub fn builtin() -> GameResult<Self> {
        Self::assemble(CatalogTables::builtin())
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        let tables: CatalogTables =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::assemble(tables)
    }

    /// Index and validate a set of tables
    pub fn assemble(tables: CatalogTables) -> GameResult<Self> {
        let mut index = HashMap::new();
        let ids = tables
            .enemies
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.as_str(), Entry::Enemy(i)))
            .chain(tables.bosses.iter().enumerate().map(|(i, d)| (d.id.as_str(), Entry::Boss(i))))
            .chain(tables.weapons.iter().enumerate().map(|(i, d)| (d.id.as_str(), Entry::Weapon(i))))
            .chain(tables.upgrades.iter().enumerate().map(|(i, d)| (d.id.as_str(), Entry::Upgrade(i))))
            .chain(
                tables
                    .characters
                    .iter()
                    .enumerate()
                    .map(|(i, d)| (d.id.as_str(), Entry::Character(i))),
            );
        for (id, entry) in ids {
            if index.insert(id.to_string(), entry).is_some() {
                return Err(CatalogError::DuplicateId(id.to_string()));
            }
        }

        let catalog = Self {
            tables,
            index,
            fallback_weapon: WeaponDef::fallback("unknown"),
        };
        catalog.validate()?;
        log::debug!(
            "Catalog assembled: {} enemies, {} bosses, {} weapons, {} upgrades, {} characters",
            catalog.tables.enemies.len(),
            catalog.tables.bosses.len(),
            catalog.tables.weapons.len(),
            catalog.tables.upgrades.len(),
            catalog.tables.characters.len()
        );
        Ok(catalog)
    }

    fn validate(&self) -> GameResult<()> {
        let t = &self.tables;
        if !t.enemies.iter().any(|e| e.min_wave <= 1) {
            return Err(CatalogError::InvalidStat {
                id: "enemies".into(),
                field: "min_wave",
                value: t.enemies.iter().map(|e| e.min_wave).min().unwrap_or(0) as f32,
            });
        }
        for e in &t.enemies {
            positive(&e.id, "health", e.health)?;
            positive(&e.id, "size", e.size)?;
            positive(&e.id, "spawn_weight", e.spawn_weight)?;
        }
        for b in &t.bosses {
            positive(&b.id, "health", b.health)?;
            positive(&b.id, "size", b.size)?;
            if let Some(minion) = &b.minion {
                if self.enemy(minion).is_none() {
                    return Err(CatalogError::UnknownEnemy {
                        context: format!("boss '{}'", b.id),
                        id: minion.clone(),
                    });
                }
            }
        }
        for w in &t.weapons {
            positive(&w.id, "fire_rate_ms", w.fire_rate_ms)?;
            if w.max_level == 0 {
                return Err(CatalogError::InvalidStat {
                    id: w.id.clone(),
                    field: "max_level",
                    value: 0.0,
                });
            }
        }
        for u in &t.upgrades {
            if u.max_stacks == Some(0) {
                return Err(CatalogError::InvalidStat {
                    id: u.id.clone(),
                    field: "max_stacks",
                    value: 0.0,
                });
            }
        }
        for c in &t.characters {
            if self.weapon(&c.starting_weapon).is_none() {
                return Err(CatalogError::UnknownWeapon {
                    context: format!("character '{}'", c.id),
                    id: c.starting_weapon.clone(),
                });
            }
            positive(&c.id, "health_mod", c.health_mod)?;
            positive(&c.id, "speed_mod", c.speed_mod)?;
            let Some(last) = c.bosses.last() else {
                return Err(CatalogError::EmptyRoster(c.id.clone()));
            };
            for id in &c.bosses {
                if self.boss(id).is_none() {
                    return Err(CatalogError::UnknownBoss {
                        character: c.id.clone(),
                        id: id.clone(),
                    });
                }
            }
            if !self.boss(last).is_some_and(|b| b.is_final_boss) {
                return Err(CatalogError::InvalidRoster {
                    character: c.id.clone(),
                    reason: "last boss is not a final boss",
                });
            }
        }
        Ok(())
    }

    fn entry(&self, id: &str) -> Option<Entry> {
        self.index.get(id).copied()
    }

    pub fn enemy(&self, id: &str) -> Option<&EnemyDef> {
        match self.entry(id)? {
            Entry::Enemy(i) => self.tables.enemies.get(i),
            _ => None,
        }
    }

    pub fn boss(&self, id: &str) -> Option<&BossDef> {
        match self.entry(id)? {
            Entry::Boss(i) => self.tables.bosses.get(i),
            _ => None,
        }
    }

    pub fn weapon(&self, id: &str) -> Option<&WeaponDef> {
        match self.entry(id)? {
            Entry::Weapon(i) => self.tables.weapons.get(i),
            _ => None,
        }
    }

    pub fn upgrade(&self, id: &str) -> Option<&StatUpgradeDef> {
        match self.entry(id)? {
            Entry::Upgrade(i) => self.tables.upgrades.get(i),
            _ => None,
        }
    }

    pub fn character(&self, id: &str) -> Option<&CharacterDef> {
        match self.entry(id)? {
            Entry::Character(i) => self.tables.characters.get(i),
            _ => None,
        }
    }

    /// Weapon lookup for in-session use. An unknown id is a catalog/code
    /// mismatch: debug builds panic, release builds log and use a neutral
    /// straight-shooting weapon.
    pub fn weapon_or_fallback(&self, id: &str) -> &WeaponDef {
        match self.weapon(id) {
            Some(w) => w,
            None => {
                debug_assert!(false, "unknown weapon id '{}'", id);
                log::error!("Unknown weapon id '{}', substituting fallback", id);
                &self.fallback_weapon
            }
        }
    }

    pub fn enemies(&self) -> &[EnemyDef] {
        &self.tables.enemies
    }

    pub fn bosses(&self) -> &[BossDef] {
        &self.tables.bosses
    }

    pub fn weapons(&self) -> &[WeaponDef] {
        &self.tables.weapons
    }

    pub fn upgrades(&self) -> &[StatUpgradeDef] {
        &self.tables.upgrades
    }

    pub fn characters(&self) -> &[CharacterDef] {
        &self.tables.characters
    }

    pub fn tables(&self) -> &CatalogTables {
        &self.tables
    }
}

fn positive(id: &str, field: &'static str, value: f32) -> GameResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidStat {
            id: id.to_string(),
            field,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let c = Catalog::builtin().unwrap();
        assert_eq!(c.characters().len(), 6);
        assert_eq!(c.weapons().len(), 15);
        assert!(c.enemy("zombie").is_some());
        assert!(c.boss("nightmare").unwrap().is_final_boss);
    }

    #[test]
    fn test_lookup_respects_table() {
        let c = Catalog::builtin().unwrap();
        // One namespace, but a boss id is not an enemy
        assert!(c.enemy("mega_zombie").is_none());
        assert!(c.boss("mega_zombie").is_some());
        assert!(c.weapon("heal").is_none());
        assert!(c.upgrade("heal").is_some());
    }

    #[test]
    fn test_unknown_roster_boss_rejected() {
        let mut t = CatalogTables::builtin();
        t.characters[0].bosses[1] = "nobody".into();
        assert_eq!(
            Catalog::assemble(t).unwrap_err(),
            CatalogError::UnknownBoss {
                character: "death_dealer".into(),
                id: "nobody".into()
            }
        );
    }

    #[test]
    fn test_roster_must_end_in_final_boss() {
        let mut t = CatalogTables::builtin();
        t.characters[0].bosses.pop();
        assert!(matches!(
            Catalog::assemble(t),
            Err(CatalogError::InvalidRoster { .. })
        ));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let mut t = CatalogTables::builtin();
        t.characters[2].bosses.clear();
        assert_eq!(
            Catalog::assemble(t).unwrap_err(),
            CatalogError::EmptyRoster("edgy_eddie".into())
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut t = CatalogTables::builtin();
        t.weapons[0].id = "zombie".into();
        assert!(matches!(Catalog::assemble(t), Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn test_unknown_starting_weapon_rejected() {
        let mut t = CatalogTables::builtin();
        t.characters[1].starting_weapon = "spoon".into();
        assert!(matches!(
            Catalog::assemble(t),
            Err(CatalogError::UnknownWeapon { .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let json = serde_json::to_string(&CatalogTables::builtin()).unwrap();
        let c = Catalog::from_json(&json).unwrap();
        assert_eq!(c.bosses().len(), 24);
        assert!(matches!(Catalog::from_json("[1,2"), Err(CatalogError::Parse(_))));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_fallback_weapon_in_release() {
        let c = Catalog::builtin().unwrap();
        assert_eq!(c.weapon_or_fallback("spoon").pattern, PatternDef::Straight);
    }
}
