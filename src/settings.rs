//! Game settings and preferences
//!
//! Persisted separately from the high score.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::platform::{KeyValueStore, StorageError};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// The preset after this one, wrapping from High back to Low
    pub fn next(&self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum dust puffs drawn for this preset
    pub fn max_dust(&self) -> usize {
        match self {
            QualityPreset::Low => 8,
            QualityPreset::Medium => 32,
            QualityPreset::High => 128,
        }
    }

    /// Number of city parallax layers drawn
    pub fn parallax_layers(&self) -> usize {
        match self {
            QualityPreset::Low => 1,
            QualityPreset::Medium => 2,
            QualityPreset::High => 3,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(format!("unknown quality preset: {other}")),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Controls ===
    /// `KeyboardEvent.code` for jump / start / restart
    pub jump_key: String,
    /// `KeyboardEvent.code` for pause toggle
    pub pause_key: String,

    // === Visual Effects ===
    /// Landing dust
    pub dust: bool,
    /// Scrolling city backdrop
    pub parallax: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (static backdrop, no dust)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            jump_key: "Space".to_string(),
            pause_key: "Escape".to_string(),
            dust: true,
            parallax: true,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.dust = preset != QualityPreset::Low;
    }

    /// Step to the next quality preset; returns the new one
    pub fn cycle_quality(&mut self) -> QualityPreset {
        let next = self.quality.next();
        self.apply_preset(next);
        next
    }

    pub fn is_jump_key(&self, code: &str) -> bool {
        code == self.jump_key
    }

    pub fn is_pause_key(&self, code: &str) -> bool {
        code == self.pause_key
    }

    /// Effective parallax (respects reduced_motion)
    pub fn effective_parallax(&self) -> bool {
        self.parallax && !self.reduced_motion
    }

    /// Effective dust cap
    pub fn max_dust(&self) -> usize {
        if !self.dust || self.reduced_motion {
            0
        } else {
            self.quality.max_dust()
        }
    }

    /// Load settings; missing or malformed data falls back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get_item(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings: {e}");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set_item(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
