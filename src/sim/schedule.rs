//! Deferred session tasks
//!
//! Tasks are stamped with the session generation when scheduled. Starting or
//! ending a session bumps the generation, so a task scheduled against an
//! earlier session is dropped when it comes due instead of acting on state
//! it no longer describes.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    ShowBossWarning { wave: u32 },
    SpawnBoss { wave: u32 },
    StartWave { wave: u32 },
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due_ms: f64,
    generation: u64,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: f64,
    generation: u64,
    queue: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate every task scheduled so far
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn schedule(&mut self, delay_ms: f32, task: Task) {
        self.queue.push(Scheduled {
            due_ms: self.now_ms + delay_ms.max(0.0) as f64,
            generation: self.generation,
            task,
        });
    }

    /// Put a due task back to run on the next advance
    pub fn defer(&mut self, task: Task) {
        self.schedule(0.0, task);
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.now_ms += dt_ms as f64;
    }

    /// Remove and return every due task of the current generation, in due
    /// order. Stale tasks are dropped.
    pub fn take_due(&mut self) -> Vec<Task> {
        let now = self.now_ms;
        let generation = self.generation;
        let mut due: Vec<Scheduled> = Vec::new();
        self.queue.retain(|s| {
            if s.due_ms > now {
                return true;
            }
            if s.generation == generation {
                due.push(*s);
            } else {
                log::debug!("Dropped stale task {:?} (generation {} != {})", s.task, s.generation, generation);
            }
            false
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter().map(|s| s.task).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut s = Scheduler::new();
        s.schedule(2000.0, Task::StartWave { wave: 2 });
        s.advance(1999.0);
        assert!(s.take_due().is_empty());
        s.advance(1.0);
        assert_eq!(s.take_due(), vec![Task::StartWave { wave: 2 }]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_stale_generation_dropped() {
        let mut s = Scheduler::new();
        s.schedule(100.0, Task::SpawnBoss { wave: 5 });
        assert_eq!(s.bump_generation(), 1);
        assert_eq!(s.generation(), 1);
        s.schedule(100.0, Task::StartWave { wave: 1 });
        s.advance(200.0);
        assert_eq!(s.take_due(), vec![Task::StartWave { wave: 1 }]);
    }

    #[test]
    fn test_due_order() {
        let mut s = Scheduler::new();
        s.schedule(300.0, Task::SpawnBoss { wave: 5 });
        s.schedule(100.0, Task::ShowBossWarning { wave: 5 });
        s.advance(500.0);
        assert_eq!(
            s.take_due(),
            vec![Task::ShowBossWarning { wave: 5 }, Task::SpawnBoss { wave: 5 }]
        );
    }

    #[test]
    fn test_defer_requeues() {
        let mut s = Scheduler::new();
        s.defer(Task::StartWave { wave: 3 });
        assert_eq!(s.take_due(), vec![Task::StartWave { wave: 3 }]);
    }
}
