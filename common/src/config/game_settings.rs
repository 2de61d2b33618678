use serde::{Deserialize, Serialize};

use super::Validate;

/// Tunables for a run. Defaults reproduce the classic arcade rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Cells per side of the square grid.
    pub tile_count: u32,
    pub base_interval_ms: u64,
    /// Floor for the level-derived interval.
    pub min_interval_ms: u64,
    /// Interval reduction per level above 1.
    pub interval_step_ms: u64,
    /// Level `n` is left once the score reaches `n * level_score_step`.
    pub level_score_step: u32,
    /// Lifetime of the speed-boost and slow-down modifiers, in ticks.
    pub modifier_ticks: u32,
    pub item_place_attempts: u32,
    pub obstacle_place_attempts: u32,
    /// Obstacle count is `base_obstacle_count + level`.
    pub base_obstacle_count: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tile_count: 20,
            base_interval_ms: 100,
            min_interval_ms: 50,
            interval_step_ms: 5,
            level_score_step: 50,
            modifier_ticks: 180,
            item_place_attempts: 100,
            obstacle_place_attempts: 50,
            base_obstacle_count: 5,
        }
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.tile_count < 5 {
            return Err("tile_count must be at least 5".to_string());
        }
        if self.tile_count > 100 {
            return Err("tile_count must not exceed 100".to_string());
        }
        if self.min_interval_ms == 0 {
            return Err("min_interval_ms must be greater than 0".to_string());
        }
        if self.min_interval_ms > self.base_interval_ms {
            return Err("min_interval_ms must not exceed base_interval_ms".to_string());
        }
        if self.level_score_step == 0 {
            return Err("level_score_step must be greater than 0".to_string());
        }
        if self.item_place_attempts == 0 || self.obstacle_place_attempts == 0 {
            return Err("placement attempt caps must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let settings: GameSettings = serde_yaml_ng::from_str("tile_count: 32\n").unwrap();
        assert_eq!(settings.tile_count, 32);
        assert_eq!(settings.base_interval_ms, 100);
        assert_eq!(settings.modifier_ticks, 180);
    }

    #[test]
    fn test_floor_above_base_is_rejected() {
        let settings = GameSettings {
            min_interval_ms: 150,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_attempt_cap_is_rejected() {
        let settings = GameSettings {
            item_place_attempts: 0,
            ..GameSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
