//! Player settings and preferences
//!
//! Persisted separately from the high score: LocalStorage on the web, a JSON
//! file on native.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Background stars for this preset
    pub fn star_count(&self) -> usize {
        match self {
            QualityPreset::Low => 250,
            QualityPreset::Medium => 600,
            QualityPreset::High => 1000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Background star field
    pub starfield: bool,

    // === Input ===
    /// Extra scale on touch-drag movement (1.0 = stock)
    pub touch_sensitivity: f32,

    // === Accessibility ===
    /// Reduced motion (no star field streaming)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            starfield: true,
            touch_sensitivity: 1.0,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective star field (respects reduced_motion)
    pub fn starfield_enabled(&self) -> bool {
        self.starfield && !self.reduced_motion
    }

    /// Effective star count
    pub fn star_count(&self) -> usize {
        if self.starfield_enabled() {
            self.quality.star_count()
        } else {
            0
        }
    }

    /// Parse from JSON, keeping defaults for missing fields
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings: quality={}", settings.quality.as_str());
                    settings
                }
                Err(err) => {
                    log::warn!("Ignoring bad settings file {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No settings found, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "void_drift_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings: quality={}", settings.quality.as_str());
                    return settings;
                }
            }
        }

        log::info!("No settings found, using defaults");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), GameError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| GameError::Storage("LocalStorage unavailable".into()))?;
        let json = serde_json::to_string(self)?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| GameError::Storage("LocalStorage write rejected".into()))?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_reduced_motion_disables_stars() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::from_preset(QualityPreset::High)
        };
        assert!(!settings.starfield_enabled());
        assert_eq!(settings.star_count(), 0);
        assert_eq!(Settings::from_preset(QualityPreset::High).star_count(), 1000);
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{ "quality": "Low", "reduced_motion": true }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.reduced_motion);
        assert_eq!(settings.touch_sensitivity, 1.0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("void_drift_settings_{}.json", std::process::id()));
        let settings = Settings::from_preset(QualityPreset::Low);
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
