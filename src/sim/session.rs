//! Session phase transitions and wave sequencing

use super::player::Player;
use super::schedule::Task;
use super::state::{GameEvent, GamePhase, GameState};
use super::upgrade::UpgradeSelector;
use super::wave::WaveScheduler;
use crate::audio::SoundEffect;

impl GameState {
    /// Begin a new run. Only valid from the title or an end screen.
    pub fn start(&mut self) -> bool {
        if !self.phase.can_start() {
            return false;
        }
        let arena = self.arena();
        let weapon = self.catalog.weapon_or_fallback(&self.character.starting_weapon);
        self.player = Player::new(&self.character, weapon, arena);
        self.enemies.clear();
        self.projectiles.clear();
        self.orbs.clear();
        self.spawn_buffer.clear();
        self.death_queue.clear();
        self.choices.clear();
        self.cursor = 0;
        self.pending_next_wave = None;
        self.announcement_ms = 0.0;
        self.boss_warning_ms = 0.0;
        self.game_time_ms = 0.0;
        self.wave = WaveScheduler::new(self.tuning.waves.clone(), arena, self.character.bosses.clone());
        self.upgrades = UpgradeSelector::new();
        let generation = self.scheduler.bump_generation();
        self.phase = GamePhase::Playing;
        log::info!(
            "Run started as {} (seed {}, generation {})",
            self.character.id,
            self.rng.seed(),
            generation
        );
        self.start_wave(1);
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => false,
        }
    }

    pub(crate) fn start_wave(&mut self, wave: u32) {
        self.wave.start_wave(wave);
        self.announcement_ms = self.tuning.timings.announcement_ms;
        self.boss_warning_ms = 0.0;
        let boss_wave = self.wave.boss_wave;
        log::info!(
            "Wave {} started ({} enemies{})",
            wave,
            self.wave.enemies_to_spawn,
            if boss_wave { " + boss" } else { "" }
        );
        self.sound(SoundEffect::WaveStart);
        self.event(GameEvent::WaveStarted { wave, boss_wave });
        if boss_wave {
            self.scheduler
                .schedule(self.tuning.timings.boss_warning_delay_ms, Task::ShowBossWarning { wave });
        }
    }

    pub(crate) fn show_boss_warning(&mut self, wave: u32) {
        if self.wave.wave != wave || !self.wave.boss_wave || self.wave.boss_spawned {
            log::debug!("Boss warning for wave {} no longer applies", wave);
            return;
        }
        self.boss_warning_ms = self.tuning.timings.boss_warning_ms;
        self.sound(SoundEffect::BossWarning);
        self.event(GameEvent::BossWarning { wave });
        self.scheduler
            .schedule(self.tuning.timings.boss_spawn_delay_ms, Task::SpawnBoss { wave });
    }

    /// Spawn this wave's boss once. Bosses are never dropped at the enemy
    /// cap since the wave cannot complete without them.
    pub(crate) fn spawn_boss(&mut self, wave: u32) {
        if self.wave.wave != wave || !self.wave.boss_wave || self.wave.boss_spawned {
            return;
        }
        let id = self.next_entity_id();
        let Some(boss) = self.wave.spawn_boss(id, &self.catalog, &mut self.rng) else {
            // The roster gave nothing; release the wave from waiting on a boss
            self.wave.boss_spawned = true;
            self.wave.enemy_died(true);
            return;
        };
        self.boss_warning_ms = 0.0;
        log::info!("Boss {} spawned on wave {}", boss.type_id, wave);
        self.event(GameEvent::BossSpawned {
            wave,
            boss_id: boss.type_id.clone(),
        });
        self.enemies.push(boss);
    }

    /// Open the upgrade screen; stays in play when nothing can be offered
    pub(crate) fn enter_upgrade(&mut self) {
        let count = self.tuning.upgrade_choices;
        self.choices = self
            .upgrades
            .generate_choices(&self.player, &self.catalog, count, &mut self.rng);
        self.cursor = 0;
        if self.choices.is_empty() {
            log::debug!("Level {} reached with nothing left to offer", self.player.level);
            return;
        }
        self.phase = GamePhase::Upgrading;
    }

    /// Move the upgrade cursor by `delta`, wrapping
    pub fn move_cursor(&mut self, delta: i32) {
        if self.phase != GamePhase::Upgrading || self.choices.is_empty() {
            return;
        }
        let n = self.choices.len() as i32;
        self.cursor = (self.cursor as i32 + delta).rem_euclid(n) as usize;
        self.sound(SoundEffect::MenuNavigate);
    }

    /// Apply the choice at `index` and resume play. Returns whether the
    /// choice took effect; play resumes either way.
    pub fn select_upgrade(&mut self, index: usize) -> bool {
        if self.phase != GamePhase::Upgrading || index >= self.choices.len() {
            return false;
        }
        let choice = self.choices[index].clone();
        let applied = self.upgrades.apply_choice(&choice, &mut self.player, &self.catalog);
        if applied {
            log::info!("Upgrade applied: {:?}", choice);
            self.event(GameEvent::UpgradeApplied { choice });
        }
        self.sound(SoundEffect::MenuSelect);
        self.choices.clear();
        self.cursor = 0;
        self.phase = GamePhase::Playing;
        if let Some(wave) = self.pending_next_wave.take() {
            self.start_wave(wave);
        }
        applied
    }

    pub(crate) fn game_over(&mut self) {
        self.scheduler.bump_generation();
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over on wave {} at level {} ({} kills)",
            self.wave.wave,
            self.player.level,
            self.wave.total_kills
        );
        self.sound(SoundEffect::GameOver);
        self.event(GameEvent::GameOver {
            wave: self.wave.wave,
            level: self.player.level,
            kills: self.wave.total_kills,
        });
    }

    pub(crate) fn victory(&mut self) {
        self.scheduler.bump_generation();
        self.phase = GamePhase::Victory;
        log::info!("Victory at level {} ({} kills)", self.player.level, self.wave.total_kills);
        self.sound(SoundEffect::Victory);
        self.event(GameEvent::Victory {
            level: self.player.level,
            kills: self.wave.total_kills,
        });
    }

    /// Run a due task against the current phase. Tasks wait out pauses and
    /// the upgrade screen.
    pub(crate) fn run_task(&mut self, task: Task) {
        match self.phase {
            GamePhase::Playing => {}
            GamePhase::Upgrading => {
                if let Task::StartWave { wave } = task {
                    self.pending_next_wave = Some(wave);
                } else {
                    self.scheduler.defer(task);
                }
                return;
            }
            GamePhase::Paused => {
                self.scheduler.defer(task);
                return;
            }
            GamePhase::Title | GamePhase::GameOver | GamePhase::Victory => {
                log::debug!("Dropped {:?} outside play", task);
                return;
            }
        }
        match task {
            Task::ShowBossWarning { wave } => self.show_boss_warning(wave),
            Task::SpawnBoss { wave } => self.spawn_boss(wave),
            Task::StartWave { wave } => {
                // Only the wave right after a cleared one may start
                if self.wave.cleared && self.wave.wave + 1 == wave {
                    self.start_wave(wave);
                } else {
                    log::debug!("Stale start of wave {} (current {})", wave, self.wave.wave);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::sim::upgrade::UpgradeChoice;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(Catalog::builtin().unwrap(), Tuning::default(), "death_dealer", 5).unwrap()
    }

    #[test]
    fn test_start_from_title_only() {
        let mut s = state();
        assert!(s.start());
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.wave.wave, 1);
        assert!(!s.start());
    }

    #[test]
    fn test_pause_resume() {
        let mut s = state();
        assert!(!s.pause());
        s.start();
        assert!(s.toggle_pause());
        assert_eq!(s.phase, GamePhase::Paused);
        assert!(!s.pause());
        assert!(s.resume());
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_boss_wave_schedules_warning() {
        let mut s = state();
        s.start();
        let pending = s.scheduler.pending();
        s.start_wave(5);
        assert_eq!(s.scheduler.pending(), pending + 1);
        s.scheduler.advance(s.tuning.timings.boss_warning_delay_ms);
        for t in s.scheduler.take_due() {
            s.run_task(t);
        }
        assert!(s.boss_warning_ms > 0.0);
        s.scheduler.advance(s.tuning.timings.boss_spawn_delay_ms);
        for t in s.scheduler.take_due() {
            s.run_task(t);
        }
        assert!(s.wave.boss_spawned);
        assert_eq!(s.enemies.iter().filter(|e| e.is_boss()).count(), 1);
        // A late duplicate spawn does nothing
        s.spawn_boss(5);
        assert_eq!(s.enemies.iter().filter(|e| e.is_boss()).count(), 1);
    }

    #[test]
    fn test_tasks_wait_out_pause() {
        let mut s = state();
        s.start();
        s.start_wave(5);
        s.pause();
        s.scheduler.advance(10_000.0);
        for t in s.scheduler.take_due() {
            s.run_task(t);
        }
        assert_eq!(s.boss_warning_ms, 0.0);
        assert_eq!(s.scheduler.pending(), 1);
        s.resume();
        for t in s.scheduler.take_due() {
            s.run_task(t);
        }
        assert!(s.boss_warning_ms > 0.0);
    }

    #[test]
    fn test_stale_wave_start_ignored() {
        let mut s = state();
        s.start();
        s.run_task(Task::StartWave { wave: 2 });
        assert_eq!(s.wave.wave, 1);
        s.wave.end_wave();
        s.run_task(Task::StartWave { wave: 2 });
        assert_eq!(s.wave.wave, 2);
        s.run_task(Task::StartWave { wave: 3 });
        assert_eq!(s.wave.wave, 2);
    }

    #[test]
    fn test_upgrade_defers_next_wave() {
        let mut s = state();
        s.start();
        s.wave.end_wave();
        s.enter_upgrade();
        assert_eq!(s.phase, GamePhase::Upgrading);
        s.run_task(Task::StartWave { wave: 2 });
        assert_eq!(s.pending_next_wave, Some(2));
        assert_eq!(s.wave.wave, 1);
        s.select_upgrade(0);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.wave.wave, 2);
    }

    #[test]
    fn test_cursor_wraps() {
        let mut s = state();
        s.start();
        s.enter_upgrade();
        let n = s.choices.len();
        s.move_cursor(-1);
        assert_eq!(s.cursor, n - 1);
        s.move_cursor(1);
        assert_eq!(s.cursor, 0);
    }

    #[test]
    fn test_select_applies_choice() {
        let mut s = state();
        s.start();
        s.enter_upgrade();
        s.choices = vec![UpgradeChoice::Stat {
            upgrade_id: "max_health".into(),
        }];
        assert!(s.select_upgrade(0));
        assert_eq!(s.player.max_health, 120);
        assert!(!s.select_upgrade(0));
    }

    #[test]
    fn test_session_end_invalidates_tasks() {
        let mut s = state();
        s.start();
        s.start_wave(5);
        let run = s.scheduler.generation();
        s.game_over();
        assert!(s.scheduler.generation() > run);
        assert!(s.start());
        assert_eq!(s.scheduler.generation(), run + 2);
        s.scheduler.advance(10_000.0);
        for t in s.scheduler.take_due() {
            s.run_task(t);
        }
        assert_eq!(s.boss_warning_ms, 0.0);
        assert_eq!(s.wave.wave, 1);
    }
}
