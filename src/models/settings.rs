//! Player settings loaded from `rflow.toml`.

use crate::models::chart::ChartConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const SETTINGS_FILE: &str = "rflow.toml";

/// Judgement offset bounds (milliseconds).
pub const OFFSET_RANGE_MS: (i32, i32) = (-120, 120);
/// Scroll speed multiplier bounds. Presentation-only, never touches timing.
pub const SCROLL_RANGE: (f32, f32) = (0.6, 2.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chart: ChartConfig,
    /// Added to the clock before judging, compensating input/audio latency.
    pub offset_ms: i32,
    pub scroll_speed: f32,
    pub master_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chart: ChartConfig::default(),
            offset_ms: 0,
            scroll_speed: 1.1,
            master_volume: 0.5,
        }
    }
}

impl Settings {
    /// Loads settings from `rflow.toml` in the working directory, falling
    /// back to defaults when the file is missing or malformed. Every field
    /// comes back clamped to its allowed range.
    pub fn load() -> Self {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    fn load_from(path: &Path) -> Self {
        let settings = match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Settings>(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!(
                        "SETTINGS: Failed to parse {}: {e}, using defaults",
                        path.display()
                    );
                    Settings::default()
                }
            },
            Err(_) => {
                if path.exists() {
                    log::warn!("SETTINGS: Cannot read {}, using defaults", path.display());
                }
                Settings::default()
            }
        };
        settings.clamped()
    }

    pub fn save(&self) {
        self.save_to(Path::new(SETTINGS_FILE));
    }

    fn save_to(&self, path: &Path) {
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    log::warn!("SETTINGS: Failed to write {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("SETTINGS: Failed to serialize settings: {e}"),
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            chart: self.chart.clamped(),
            offset_ms: self.offset_ms.clamp(OFFSET_RANGE_MS.0, OFFSET_RANGE_MS.1),
            scroll_speed: self.scroll_speed.clamp(SCROLL_RANGE.0, SCROLL_RANGE.1),
            master_volume: self.master_volume.clamp(0.0, 1.0),
        }
    }

    pub fn offset_seconds(&self) -> f64 {
        f64::from(self.offset_ms) / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_out_of_range_fields() {
        let settings = Settings {
            offset_ms: 500,
            scroll_speed: 0.1,
            master_volume: 2.0,
            ..Settings::default()
        }
        .clamped();
        assert_eq!(settings.offset_ms, 120);
        assert_eq!(settings.scroll_speed, 0.6);
        assert_eq!(settings.master_volume, 1.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings {
            offset_ms: -30,
            ..Settings::default()
        };
        let content = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&content).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_changed_settings_survive_save_and_load() {
        let path = std::env::temp_dir().join("rflow-settings-roundtrip.toml");
        let settings = Settings {
            offset_ms: -45,
            scroll_speed: 1.4,
            ..Settings::default()
        };
        settings.save_to(&path);
        let loaded = Settings::load_from(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("rflow-settings-absent.toml");
        let _ = fs::remove_file(&path);
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let parsed: Settings = toml::from_str("offset_ms = 10").unwrap();
        assert_eq!(parsed.offset_ms, 10);
        assert_eq!(parsed.scroll_speed, 1.1);
        assert_eq!(parsed.chart, ChartConfig::default());
    }
}
