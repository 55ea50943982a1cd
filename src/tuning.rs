//! Data-driven game balance
//!
//! Everything that is not per-type catalog data lives here: arena size, wave
//! pacing, sequencing delays and resource caps. Defaults match the shipped
//! game; a JSON file may override any subset of fields.

use crate::consts;
use crate::error::ConfigError;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Resource cap presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LimitPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl LimitPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitPreset::Low => "Low",
            LimitPreset::Medium => "Medium",
            LimitPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(LimitPreset::Low),
            "medium" | "med" => Some(LimitPreset::Medium),
            "high" => Some(LimitPreset::High),
            _ => None,
        }
    }

    /// Caps for this preset
    pub fn limits(&self) -> Limits {
        match self {
            LimitPreset::Low => Limits {
                max_projectiles: 250,
                max_xp_orbs: 200,
                max_enemies: 200,
            },
            LimitPreset::Medium => Limits {
                max_projectiles: 600,
                max_xp_orbs: 500,
                max_enemies: 400,
            },
            LimitPreset::High => Limits {
                max_projectiles: 1500,
                max_xp_orbs: 1200,
                max_enemies: 800,
            },
        }
    }
}

/// Upper bounds on live entity collections. Inserts past a cap are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_projectiles: usize,
    pub max_xp_orbs: usize,
    pub max_enemies: usize,
}

impl Default for Limits {
    fn default() -> Self {
        LimitPreset::default().limits()
    }
}

/// Wave pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Completing this wave wins the run
    pub max_waves: u32,
    /// Every Nth wave is a boss wave
    pub boss_interval: u32,
    /// Regular wave quota: `base_quota + wave * quota_per_wave`
    pub base_quota: u32,
    pub quota_per_wave: u32,
    /// Boss wave quota (regular enemies only): `boss_base_quota + wave * boss_quota_per_wave`
    pub boss_base_quota: u32,
    pub boss_quota_per_wave: u32,
    /// Spawn interval: `max(floor, start - wave * step)` ms
    pub spawn_interval_ms: f32,
    pub spawn_interval_step_ms: f32,
    pub spawn_interval_floor_ms: f32,
    /// Enemy stat multiplier: `1 + (wave - 1) * step`
    pub wave_multiplier_step: f32,
    /// Boss stat multiplier: `1 + (wave - 1) * step`
    pub boss_multiplier_step: f32,
    /// Spawn distance outside the arena edge
    pub spawn_margin: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            max_waves: 15,
            boss_interval: 5,
            base_quota: 10,
            quota_per_wave: 5,
            boss_base_quota: 5,
            boss_quota_per_wave: 1,
            spawn_interval_ms: 1000.0,
            spawn_interval_step_ms: 50.0,
            spawn_interval_floor_ms: 300.0,
            wave_multiplier_step: 0.15,
            boss_multiplier_step: 0.3,
            spawn_margin: 50.0,
        }
    }
}

/// Delays for announcement and boss sequencing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub announcement_ms: f32,
    /// From wave start to the boss warning
    pub boss_warning_delay_ms: f32,
    /// From the boss warning to the boss spawn
    pub boss_spawn_delay_ms: f32,
    /// How long the warning stays up; the boss spawns when it runs out at the latest
    pub boss_warning_ms: f32,
    /// Grace period between a cleared wave and the next
    pub next_wave_delay_ms: f32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            announcement_ms: 2000.0,
            boss_warning_delay_ms: 2200.0,
            boss_spawn_delay_ms: 1500.0,
            boss_warning_ms: 3000.0,
            next_wave_delay_ms: 2000.0,
        }
    }
}

/// Session-wide balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    /// dt cap per tick in ms
    pub max_frame_ms: f32,
    /// Upgrade cards offered per level-up
    pub upgrade_choices: usize,
    pub waves: WaveTuning,
    pub timings: Timings,
    pub limits: Limits,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: consts::ARENA_WIDTH,
            arena_height: consts::ARENA_HEIGHT,
            max_frame_ms: consts::MAX_FRAME_MS,
            upgrade_choices: 3,
            waves: WaveTuning::default(),
            timings: Timings::default(),
            limits: Limits::default(),
        }
    }
}

impl Tuning {
    /// Defaults with the caps of `preset`
    pub fn with_preset(preset: LimitPreset) -> Self {
        Self {
            limits: preset.limits(),
            ..Self::default()
        }
    }

    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            return Err(ConfigError::Invalid {
                field: "arena",
                reason: format!("{}x{} is not a positive size", self.arena_width, self.arena_height),
            });
        }
        if self.max_frame_ms <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_frame_ms",
                reason: "must be positive".into(),
            });
        }
        if self.waves.max_waves == 0 {
            return Err(ConfigError::Invalid {
                field: "waves.max_waves",
                reason: "must be at least 1".into(),
            });
        }
        if self.waves.boss_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "waves.boss_interval",
                reason: "must be at least 1".into(),
            });
        }
        if self.waves.spawn_interval_floor_ms <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "waves.spawn_interval_floor_ms",
                reason: "must be positive".into(),
            });
        }
        if self.upgrade_choices == 0 {
            return Err(ConfigError::Invalid {
                field: "upgrade_choices",
                reason: "must offer at least one card".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let t = Tuning::from_json(r#"{ "arena_width": 800, "waves": { "max_waves": 3 } }"#).unwrap();
        assert_eq!(t.arena_width, 800.0);
        assert_eq!(t.arena_height, consts::ARENA_HEIGHT);
        assert_eq!(t.waves.max_waves, 3);
        assert_eq!(t.waves.boss_interval, 5);
    }

    #[test]
    fn test_invalid_rejected() {
        let err = Tuning::from_json(r#"{ "waves": { "boss_interval": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "waves.boss_interval", .. }));
        assert!(matches!(Tuning::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_presets_scale_caps() {
        let low = LimitPreset::Low.limits();
        let high = LimitPreset::High.limits();
        assert!(low.max_projectiles < high.max_projectiles);
        assert_eq!(LimitPreset::from_str("MED"), Some(LimitPreset::Medium));
        assert_eq!(Tuning::with_preset(LimitPreset::High).limits, high);
    }

    #[test]
    fn test_json_roundtrip_defaults() {
        let t = Tuning::default();
        assert_eq!(Tuning::from_json(&t.to_json()).unwrap(), t);
    }
}
