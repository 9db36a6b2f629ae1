//! Game settings and tuning
//!
//! Persisted as JSON next to the binary. Anything missing from the file falls
//! back to the defaults in `consts`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier on the pursuit agent's walking speed
    pub fn agent_speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    /// Multiplier on the side of the agent's capture reach
    pub fn reach_multiplier(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }
}

/// Game tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Player ===
    /// Pixels per second
    pub player_speed: f32,
    /// Seconds of invisibility from a pickup
    pub invisibility_seconds: f32,

    // === Pursuit agent ===
    /// Pixels per second, before the difficulty multiplier
    pub agent_speed: f32,
    /// Side of the capture square, before the difficulty multiplier
    pub reach_size: f32,
    /// Authored patrol path, one `U`/`D`/`L`/`R` per tile
    pub agent_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            player_speed: PLAYER_SPEED,
            invisibility_seconds: INVISIBILITY_SECONDS,
            agent_speed: AGENT_SPEED,
            reach_size: REACH_SIZE,
            agent_path: "RRRRDDDDLLLLUUUU".to_string(),
        }
    }
}

impl Settings {
    /// Create settings for a difficulty preset
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn effective_agent_speed(&self) -> f32 {
        self.agent_speed * self.difficulty.agent_speed_multiplier()
    }

    pub fn effective_reach_size(&self) -> f32 {
        self.reach_size * self.difficulty.reach_multiplier()
    }

    /// Load settings from `path`, using defaults if it is missing or invalid
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trip_names() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_effective_values() {
        let normal = Settings::default();
        assert_eq!(normal.effective_agent_speed(), AGENT_SPEED);
        assert_eq!(normal.effective_reach_size(), REACH_SIZE);

        let hard = Settings::from_difficulty(Difficulty::Hard);
        assert!(hard.effective_agent_speed() > normal.effective_agent_speed());
        assert!(hard.effective_reach_size() > normal.effective_reach_size());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"difficulty":"Easy","agent_path":"UD"}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.agent_path, "UD");
        assert_eq!(settings.player_speed, PLAYER_SPEED);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let path = std::env::temp_dir().join("maze_escape_settings_does_not_exist.json");
        let settings = Settings::load(&path);
        assert_eq!(settings.agent_path, Settings::default().agent_path);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "maze_escape_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            player_speed: 123.0,
            ..Settings::from_difficulty(Difficulty::Hard)
        };
        settings.save(&path).unwrap();
        let loaded = Settings::try_load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.difficulty, Difficulty::Hard);
        assert_eq!(loaded.player_speed, 123.0);
    }
}
