use std::cell::RefCell;
use std::rc::Rc;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::store::{load_json, save_json, KeyValueStore, SETTINGS_KEY};
use crate::error::{BingoError, Result};

const SETTINGS_VERSION: u32 = 1;

/// Keys accepted from an imported settings file.
const IMPORTABLE_KEYS: [&str; 13] = [
    "soundEnabled",
    "soundVolume",
    "theme",
    "showWinAnimations",
    "showConfetti",
    "showEmojis",
    "animationSpeed",
    "fontSize",
    "reducedMotion",
    "highContrast",
    "trackStatistics",
    "showToasts",
    "toastDuration",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Normal,
    Large,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub sound_enabled: bool,

    #[serde(default = "default_volume")]
    pub sound_volume: f32,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_true")]
    pub show_win_animations: bool,

    #[serde(default = "default_true")]
    pub show_confetti: bool,

    #[serde(default = "default_true")]
    pub show_emojis: bool,

    #[serde(default)]
    pub animation_speed: AnimationSpeed,

    #[serde(default)]
    pub font_size: FontSize,

    #[serde(default)]
    pub reduced_motion: bool,

    #[serde(default)]
    pub high_contrast: bool,

    #[serde(default = "default_true")]
    pub track_statistics: bool,

    #[serde(default = "default_true")]
    pub show_toasts: bool,

    /// Milliseconds a toast stays on screen.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: u32,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}
fn default_true() -> bool {
    true
}
fn default_volume() -> f32 {
    0.5
}
fn default_toast_duration() -> u32 {
    3000
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SETTINGS_VERSION,
            sound_enabled: false,
            sound_volume: default_volume(),
            theme: Theme::default(),
            show_win_animations: true,
            show_confetti: true,
            show_emojis: true,
            animation_speed: AnimationSpeed::default(),
            font_size: FontSize::default(),
            reduced_motion: false,
            high_contrast: false,
            track_statistics: true,
            show_toasts: true,
            toast_duration: default_toast_duration(),
        }
    }
}

impl Settings {
    pub fn version(&self) -> u32 {
        self.version
    }

    fn migrate(&mut self) {
        if self.version == 0 {
            self.version = 1;
        }
        self.sound_volume = self.sound_volume.clamp(0.0, 1.0);
    }

    fn apply(&mut self, change: &SettingsChange) {
        if let Some(v) = change.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = change.sound_volume {
            self.sound_volume = v.clamp(0.0, 1.0);
        }
        if let Some(v) = change.theme {
            self.theme = v;
        }
        if let Some(v) = change.show_win_animations {
            self.show_win_animations = v;
        }
        if let Some(v) = change.show_confetti {
            self.show_confetti = v;
        }
        if let Some(v) = change.show_emojis {
            self.show_emojis = v;
        }
        if let Some(v) = change.animation_speed {
            self.animation_speed = v;
        }
        if let Some(v) = change.font_size {
            self.font_size = v;
        }
        if let Some(v) = change.reduced_motion {
            self.reduced_motion = v;
        }
        if let Some(v) = change.high_contrast {
            self.high_contrast = v;
        }
        if let Some(v) = change.track_statistics {
            self.track_statistics = v;
        }
        if let Some(v) = change.show_toasts {
            self.show_toasts = v;
        }
        if let Some(v) = change.toast_duration {
            self.toast_duration = v;
        }
    }
}

/// Partial settings update; `None` leaves a value as it is.
#[derive(Debug, Clone, Default)]
pub struct SettingsChange {
    pub sound_enabled: Option<bool>,
    pub sound_volume: Option<f32>,
    pub theme: Option<Theme>,
    pub show_win_animations: Option<bool>,
    pub show_confetti: Option<bool>,
    pub show_emojis: Option<bool>,
    pub animation_speed: Option<AnimationSpeed>,
    pub font_size: Option<FontSize>,
    pub reduced_motion: Option<bool>,
    pub high_contrast: Option<bool>,
    pub track_statistics: Option<bool>,
    pub show_toasts: Option<bool>,
    pub toast_duration: Option<u32>,
}

/// Read-only view of the current settings, consulted at every use.
pub trait SettingsProvider {
    fn settings(&self) -> Settings;
}

impl SettingsProvider for Settings {
    fn settings(&self) -> Settings {
        self.clone()
    }
}

impl SettingsProvider for RefCell<Settings> {
    fn settings(&self) -> Settings {
        self.borrow().clone()
    }
}

/// Owns the persisted settings.
pub struct SettingsManager {
    store: Rc<dyn KeyValueStore>,
    settings: RefCell<Settings>,
}

impl SettingsManager {
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let settings = match load_json::<Settings>(store.as_ref(), SETTINGS_KEY) {
            Some(mut settings) => {
                settings.migrate();
                settings
            }
            None => {
                let default = Settings::default();
                save_json(store.as_ref(), SETTINGS_KEY, &default);
                default
            }
        };
        Self {
            store,
            settings: RefCell::new(settings),
        }
    }

    fn replace(&self, settings: Settings) {
        save_json(self.store.as_ref(), SETTINGS_KEY, &settings);
        *self.settings.borrow_mut() = settings;
    }

    pub fn update(&self, change: &SettingsChange) {
        let mut settings = self.settings();
        settings.apply(change);
        self.replace(settings);
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = self.settings().theme.toggled();
        self.update(&SettingsChange {
            theme: Some(theme),
            ..Default::default()
        });
        theme
    }

    pub fn reset_settings(&self) {
        info!(target: "settings", "Settings reset to defaults");
        self.replace(Settings::default());
    }

    pub fn export_settings(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.settings())?)
    }

    /// Takes the known keys from `json` over the current values. Anything unparseable
    /// leaves the settings untouched.
    pub fn import_settings(&self, json: &str) -> Result<()> {
        let imported: Value = serde_json::from_str(json)?;
        let Value::Object(imported) = imported else {
            return Err(BingoError::InvalidSettings(
                "import must be a JSON object".to_string(),
            ));
        };

        let Value::Object(mut merged) = serde_json::to_value(self.settings())? else {
            return Err(BingoError::InvalidSettings(
                "current settings are not an object".to_string(),
            ));
        };
        let accepted: Map<String, Value> = imported
            .into_iter()
            .filter(|(key, _)| IMPORTABLE_KEYS.contains(&key.as_str()))
            .collect();
        if accepted.is_empty() {
            warn!(target: "settings", "Imported settings contained no known keys");
        }
        merged.extend(accepted);

        let mut settings: Settings = serde_json::from_value(Value::Object(merged))?;
        settings.migrate();
        self.replace(settings);
        Ok(())
    }
}

impl SettingsProvider for SettingsManager {
    fn settings(&self) -> Settings {
        self.settings.borrow().clone()
    }
}
