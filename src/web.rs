//! Browser bridge
//!
//! Exposes a session to a JS presentation layer. The page owns the
//! animation loop and rendering; it forwards input each frame and reads the
//! session back as JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioNotifier, LogAudio, SoundEffect};
use crate::catalog::Catalog;
use crate::sim::{GameState, MenuAction, TickInput, tick};
use crate::tuning::{LimitPreset, Tuning};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Goreblade core loaded");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_menu(code: &str) -> Option<MenuAction> {
    match code {
        "up" => Some(MenuAction::Up),
        "down" => Some(MenuAction::Down),
        "left" => Some(MenuAction::Left),
        "right" => Some(MenuAction::Right),
        "confirm" => Some(MenuAction::Confirm),
        "back" => Some(MenuAction::Back),
        _ => None,
    }
}

/// One game session driven from JS
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    audio: LogAudio,
}

#[wasm_bindgen]
impl WebGame {
    /// `preset` is "low", "medium" or "high"; anything else uses the defaults.
    /// Without a seed one is drawn from the browser's entropy source.
    #[wasm_bindgen(constructor)]
    pub fn new(character_id: &str, seed: Option<u32>, preset: Option<String>) -> Result<WebGame, JsValue> {
        let seed = seed.map(u64::from).unwrap_or_else(rand::random);
        let tuning = preset
            .as_deref()
            .and_then(LimitPreset::from_str)
            .map(Tuning::with_preset)
            .unwrap_or_default();
        let catalog = Catalog::builtin().map_err(js_err)?;
        let state = GameState::new(catalog, tuning, character_id, seed).map_err(js_err)?;
        log::info!("Session created for {} (seed {})", character_id, seed);
        Ok(WebGame { state, audio: LogAudio })
    }

    /// Characters available for selection, as JSON
    pub fn characters_json() -> Result<String, JsValue> {
        let catalog = Catalog::builtin().map_err(js_err)?;
        serde_json::to_string(catalog.characters()).map_err(js_err)
    }

    pub fn start(&mut self) -> bool {
        self.state.start()
    }

    /// Advance one frame. `menu` takes the snake_case action names.
    pub fn tick(&mut self, dt_ms: f32, move_x: f32, move_y: f32, menu: Option<String>, pause: bool) {
        let movement = Vec2::new(move_x, move_y);
        let input = TickInput {
            movement: if movement.length_squared() > 1.0 {
                movement.normalize()
            } else {
                movement
            },
            menu: menu.as_deref().and_then(parse_menu),
            pause,
        };
        tick(&mut self.state, &input, dt_ms);
    }

    pub fn select_upgrade(&mut self, index: usize) -> bool {
        self.state.select_upgrade(index)
    }

    pub fn snapshot_json(&self) -> String {
        self.state.snapshot_json()
    }

    /// Sounds raised since the last call
    pub fn drain_sounds_json(&mut self) -> Result<String, JsValue> {
        let sounds: Vec<SoundEffect> = self.state.drain_sounds();
        self.audio.notify_all(sounds.iter().copied());
        serde_json::to_string(&sounds).map_err(js_err)
    }

    /// Session events raised since the last call
    pub fn drain_events_json(&mut self) -> Result<String, JsValue> {
        let events = self.state.drain_events();
        serde_json::to_string(&events).map_err(js_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_menu() {
        assert_eq!(parse_menu("confirm"), Some(MenuAction::Confirm));
        assert_eq!(parse_menu("Confirm"), None);
    }
}
