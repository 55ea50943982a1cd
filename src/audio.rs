//! Sound notifications
//!
//! The simulation never plays audio itself. It queues [`SoundEffect`]s on the
//! session every tick; the host drains them into whatever [`AudioNotifier`]
//! it owns. Nothing in the simulation waits on or branches on playback.

use serde::Serialize;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "sound", content = "detail", rename_all = "snake_case")]
pub enum SoundEffect {
    /// A weapon fired; carries the firing pattern name
    Shoot(&'static str),
    /// Enemy took damage
    Hit,
    /// Enemy started dying
    Death,
    /// Explosive projectile or exploding enemy went off
    Explosion,
    /// XP orb collected
    Pickup,
    /// Player took damage
    PlayerHit,
    LevelUp,
    BossWarning,
    WaveStart,
    /// Upgrade cursor moved
    MenuNavigate,
    /// Upgrade chosen
    MenuSelect,
    GameOver,
    Victory,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Shoot(_) => "shoot",
            SoundEffect::Hit => "hit",
            SoundEffect::Death => "death",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Pickup => "pickup",
            SoundEffect::PlayerHit => "player_hit",
            SoundEffect::LevelUp => "level_up",
            SoundEffect::BossWarning => "boss_warning",
            SoundEffect::WaveStart => "wave_start",
            SoundEffect::MenuNavigate => "menu_navigate",
            SoundEffect::MenuSelect => "menu_select",
            SoundEffect::GameOver => "game_over",
            SoundEffect::Victory => "victory",
        }
    }
}

/// Fire-and-forget sink for sound notifications
pub trait AudioNotifier {
    fn notify(&mut self, effect: SoundEffect);

    fn notify_all(&mut self, effects: impl IntoIterator<Item = SoundEffect>)
    where
        Self: Sized,
    {
        for effect in effects {
            self.notify(effect);
        }
    }
}

/// Logs each notification at trace level; the hosts run every drain
/// through it so trace logging shows the sound stream
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioNotifier for LogAudio {
    fn notify(&mut self, effect: SoundEffect) {
        log::trace!("sound: {}", effect.as_str());
    }
}

/// Counts notifications per kind; used by the headless runner's summary
#[derive(Debug, Default, Clone)]
pub struct AudioTally {
    counts: std::collections::BTreeMap<&'static str, u32>,
}

impl AudioTally {
    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }
}

impl AudioNotifier for AudioTally {
    fn notify(&mut self, effect: SoundEffect) {
        *self.counts.entry(effect.as_str()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_by_kind() {
        let mut tally = AudioTally::default();
        tally.notify_all([
            SoundEffect::Hit,
            SoundEffect::Shoot("nova"),
            SoundEffect::Shoot("spread"),
            SoundEffect::Hit,
        ]);
        assert_eq!(tally.count("hit"), 2);
        assert_eq!(tally.count("shoot"), 2);
        assert_eq!(tally.count("victory"), 0);
    }

    #[test]
    fn test_one_drain_feeds_log_and_tally() {
        let drained = vec![SoundEffect::Explosion, SoundEffect::Death, SoundEffect::Explosion];
        let mut audio = LogAudio;
        let mut tally = AudioTally::default();
        audio.notify_all(drained.iter().copied());
        tally.notify_all(drained);
        assert_eq!(tally.count("explosion"), 2);
        assert_eq!(tally.iter().map(|(_, n)| n).sum::<u32>(), 3);
    }
}
