//! Browser bindings
//!
//! The page owns rendering and the animation loop; it forwards key presses
//! and frame time here and reads back JSON snapshots and events.

use wasm_bindgen::prelude::*;

use crate::reporter::{ProgressReport, ProgressReporter, ReportError};
use crate::session::{Command, Session};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameStats, Input};

use super::input::parse_key;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Into Stellar starting...");
}

/// Reporter backed by page callbacks (the page does the actual syncing)
pub struct JsReporter {
    on_level_complete: js_sys::Function,
    on_progress: js_sys::Function,
}

impl ProgressReporter for JsReporter {
    fn report_level_complete(&mut self, new_level: u32, total_score: u64) -> Result<(), ReportError> {
        self.on_level_complete
            .call2(
                &JsValue::NULL,
                &JsValue::from(new_level),
                &JsValue::from_f64(total_score as f64),
            )
            .map(|_| ())
            .map_err(|e| ReportError::Unavailable(format!("{:?}", e)))
    }

    fn report_progress(&mut self, report: &ProgressReport) -> Result<(), ReportError> {
        let json = serde_json::to_string(report)
            .map_err(|e| ReportError::Rejected(e.to_string()))?;
        self.on_progress
            .call1(&JsValue::NULL, &JsValue::from_str(&json))
            .map(|_| ())
            .map_err(|e| ReportError::Unavailable(format!("{:?}", e)))
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game instance handed to the page
#[wasm_bindgen]
pub struct WebGame {
    session: Session<JsReporter>,
    settings: Settings,
}

#[wasm_bindgen]
impl WebGame {
    /// Start at the player's stored level and high score
    #[wasm_bindgen(constructor)]
    pub fn new(
        level: u32,
        high_score: f64,
        on_level_complete: js_sys::Function,
        on_progress: js_sys::Function,
    ) -> Result<WebGame, JsValue> {
        let mut settings = Settings::load();
        if settings.seed.is_none() {
            settings.seed = Some(js_sys::Date::now() as u64);
        }
        let stats = GameStats::starting_at(level, high_score.max(0.0) as u64);
        let reporter = JsReporter {
            on_level_complete,
            on_progress,
        };
        let session = Session::new(&settings, stats, reporter).map_err(js_error)?;
        Ok(WebGame { session, settings })
    }

    /// Handle a `KeyboardEvent.key`; returns true if the key was used
    pub fn handle_key(&mut self, key: &str) -> Result<bool, JsValue> {
        let Some(input) = parse_key(key) else {
            return Ok(false);
        };
        self.session.handle_input(input).map_err(js_error)?;
        Ok(true)
    }

    /// Advance wall-clock time by `dt_ms`
    pub fn update(&mut self, dt_ms: f64) -> Result<(), JsValue> {
        let ms = dt_ms.clamp(0.0, u32::MAX as f64) as u32;
        self.session.apply(Command::Elapsed(ms)).map_err(js_error)
    }

    pub fn toggle_pause(&mut self) -> Result<(), JsValue> {
        self.session.handle_input(Input::Pause).map_err(js_error)
    }

    pub fn end_game(&mut self) -> Result<(), JsValue> {
        self.session.handle_input(Input::EndGame).map_err(js_error)
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.session.restart().map_err(js_error)
    }

    /// Window lost focus or the tab was hidden
    pub fn blur(&mut self) -> Result<(), JsValue> {
        if self.settings.pause_on_blur && self.session.phase() == GamePhase::Playing {
            log::info!("Auto-paused (window blur)");
            self.toggle_pause()?;
        }
        Ok(())
    }

    /// Send unflushed progress to `on_progress`; false if nothing to send
    pub fn flush_progress(&mut self) -> Result<bool, JsValue> {
        self.session.flush_progress().map_err(js_error)
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.session.tick_interval_ms()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(js_error)
    }

    /// Events since the last call, each with its notice text
    pub fn take_events_json(&mut self) -> Result<String, JsValue> {
        let events: Vec<_> = self
            .session
            .take_events()
            .into_iter()
            .map(|event| {
                let (title, description) = event.notice();
                serde_json::json!({
                    "event": event,
                    "title": title,
                    "description": description,
                })
            })
            .collect();
        serde_json::to_string(&events).map_err(js_error)
    }
}
