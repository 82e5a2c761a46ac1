use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Result, SmashError};

/// Audio feedback path selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundMode {
    /// Play a random laughter clip for each spawn.
    #[default]
    Laughter,
    /// Speak letters, words and shape descriptions.
    Speech,
    /// Stay silent, including completed words and scroll sounds.
    Off,
}

/// Which physical displays receive figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    All,
    Primary,
    /// Only the display at `selected_display_index`.
    Selected,
}

/// User-facing options read by the session controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub sound_mode: SoundMode,
    pub fade_enabled: bool,
    /// Seconds before a figure starts fading.
    pub fade_after: f64,
    pub show_faces: bool,
    pub mouse_draw_enabled: bool,
    /// Draw on plain pointer motion, without holding a button.
    pub clickless_mouse_draw: bool,
    pub force_uppercase: bool,
    pub max_figures: usize,
    pub block_system_keys: bool,
    pub display_mode: DisplayMode,
    pub selected_display_index: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sound_mode: SoundMode::Laughter,
            fade_enabled: true,
            fade_after: 10.0,
            show_faces: true,
            mouse_draw_enabled: true,
            clickless_mouse_draw: false,
            force_uppercase: true,
            max_figures: 50,
            block_system_keys: false,
            display_mode: DisplayMode::All,
            selected_display_index: 0,
        }
    }
}

impl SessionConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config.normalized())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// Rejects values that cannot be repaired.
    pub fn validate(&self) -> Result<()> {
        if self.fade_after.is_nan() {
            return Err(SmashError::InvalidConfig("fade_after must be a number"));
        }
        Ok(())
    }

    /// Clamps values the engine would otherwise misinterpret.
    pub fn normalized(mut self) -> Self {
        if self.fade_after.is_nan() || self.fade_after < 0.0 {
            self.fade_after = 0.0;
        }
        self
    }
}
