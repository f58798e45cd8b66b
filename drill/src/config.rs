//! Drill configuration and data-directory resolution.
//!
//! Data directory precedence:
//! 1. OPENING_DRILL_DATA_DIR environment variable
//! 2. ~/.config/opening-drill/data (production default)
//! 3. ./data (fallback for development)

use std::path::PathBuf;

use book::{DifficultyLevel, PlayerColor};

const DEFAULT_CONFIG_DIR: &str = ".config/opening-drill/data";
const DEV_DATA_DIR: &str = "./data";

/// Caller-supplied settings for one drill; immutable for its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillConfig {
    pub level: DifficultyLevel,
    pub time_limit_secs: u32,
    pub player_color: PlayerColor,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            level: DifficultyLevel::default(),
            time_limit_secs: 30,
            player_color: PlayerColor::White,
        }
    }
}

/// Get the data directory for persistence.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OPENING_DRILL_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR);
    }

    PathBuf::from(DEV_DATA_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_mid_band_white() {
        let cfg = DrillConfig::default();
        assert_eq!(cfg.level.rating(), 1200);
        assert_eq!(cfg.time_limit_secs, 30);
        assert_eq!(cfg.player_color, PlayerColor::White);
    }

    #[test]
    fn data_dir_is_never_empty() {
        let dir = get_data_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
