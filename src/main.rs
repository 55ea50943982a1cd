//! Goreblade entry point
//!
//! The browser build is driven from JS through `goreblade::web`. Natively
//! this runs a headless session with an autopilot for a fixed span of
//! simulated time and logs the outcome.
//!
//! Usage: `goreblade [character] [seed] [seconds]`. Set `GOREBLADE_TUNING`
//! to a JSON file to override balance values.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use goreblade::audio::{AudioNotifier, AudioTally, LogAudio};
    use goreblade::sim::{GamePhase, GameState, TickInput, tick};
    use goreblade::{Catalog, Tuning};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Enemies closer than this push the autopilot away
    const FLEE_RADIUS: f32 = 200.0;

    pub struct Options {
        pub character: String,
        pub seed: u64,
        pub seconds: f32,
    }

    impl Options {
        pub fn from_args() -> Self {
            let args: Vec<String> = std::env::args().skip(1).collect();
            Self {
                character: args.first().cloned().unwrap_or_else(|| "death_dealer".to_string()),
                seed: args.get(1).and_then(|s| s.parse().ok()).unwrap_or(1),
                seconds: args.get(2).and_then(|s| s.parse().ok()).unwrap_or(300.0),
            }
        }
    }

    fn load_tuning() -> Result<Tuning, Box<dyn std::error::Error>> {
        match std::env::var("GOREBLADE_TUNING") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)?;
                let tuning = Tuning::from_json(&json)?;
                log::info!("Loaded tuning from {}", path);
                Ok(tuning)
            }
            Err(_) => Ok(Tuning::default()),
        }
    }

    /// Flee the crowd, otherwise drift toward the nearest orb
    fn autopilot(state: &GameState) -> Vec2 {
        let pos = state.player.pos;
        let mut away = Vec2::ZERO;
        for e in state.enemies.iter().filter(|e| e.is_targetable()) {
            let offset = pos - e.pos;
            let d = offset.length();
            if d > 0.0 && d < FLEE_RADIUS {
                away += offset / (d * d);
            }
        }
        if away != Vec2::ZERO {
            // Lean toward the centre so the walls don't trap us
            let center = state.arena() / 2.0;
            let home = (center - pos).normalize_or_zero() * 0.3;
            return (away.normalize() + home).normalize_or_zero();
        }
        state
            .orbs
            .iter()
            .min_by(|a, b| a.pos.distance_squared(pos).total_cmp(&b.pos.distance_squared(pos)))
            .map(|o| (o.pos - pos).normalize_or_zero())
            .unwrap_or(Vec2::ZERO)
    }

    pub fn run(opts: Options) -> Result<(), Box<dyn std::error::Error>> {
        let catalog = Catalog::builtin()?;
        let tuning = load_tuning()?;
        let mut state = GameState::new(catalog, tuning, &opts.character, opts.seed)?;
        let mut tally = AudioTally::default();
        let mut audio = LogAudio;
        state.start();

        let frames = (opts.seconds * 1000.0 / FRAME_MS) as u64;
        for _ in 0..frames {
            match state.phase {
                GamePhase::Upgrading => {
                    state.select_upgrade(0);
                }
                GamePhase::GameOver | GamePhase::Victory => break,
                _ => {}
            }
            let input = TickInput {
                movement: autopilot(&state),
                ..TickInput::default()
            };
            tick(&mut state, &input, FRAME_MS);
            let sounds = state.drain_sounds();
            audio.notify_all(sounds.iter().copied());
            tally.notify_all(sounds);
            for event in state.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        let p = &state.player;
        log::info!(
            "Finished {:?}: wave {}/{}, level {}, {} kills, {:.1}s simulated",
            state.phase,
            state.wave.wave,
            state.wave.max_waves(),
            p.level,
            state.wave.total_kills,
            state.game_time_ms / 1000.0
        );
        let weapons: Vec<String> = p.weapons.iter().map(|w| format!("{} L{}", w.id(), w.level)).collect();
        log::info!("Weapons: {}", weapons.join(", "));
        for (sound, count) in tally.iter() {
            log::info!("  {:<14} {}", sound, count);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    let opts = headless::Options::from_args();
    log::info!("Goreblade (headless) as {} with seed {}", opts.character, opts.seed);
    if let Err(e) = headless::run(opts) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `goreblade::web::wasm_start`
}
