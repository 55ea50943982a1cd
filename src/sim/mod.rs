//! Simulation module
//!
//! All gameplay logic lives here. The module has no rendering, audio or
//! platform dependencies:
//! - One tick callback drives everything, single-threaded
//! - One seeded RNG per session
//! - The session owns every entity collection; entities only raise requests

pub mod boss;
mod cascade;
mod collision;
pub mod enemy;
pub mod player;
pub mod projectile;
pub mod schedule;
mod session;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod upgrade;
pub mod wave;
pub mod weapon;
pub mod xp;

pub use enemy::{DamageOutcome, Enemy, EnemyKind, Life};
pub use player::Player;
pub use projectile::{Faction, Projectile, ProjectileKind};
pub use schedule::{Scheduler, Task};
pub use snapshot::Snapshot;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{MenuAction, TickInput, tick};
pub use upgrade::{UpgradeChoice, UpgradeSelector};
pub use wave::WaveScheduler;
pub use weapon::Weapon;
pub use xp::XpOrb;
