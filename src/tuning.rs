//! Data-driven difficulty scaling
//!
//! A level number maps to the formation speed (sweep steps per second) and the
//! shoot-probability denominator (each frontline alien fires with probability
//! `1 / denominator` per tick).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;
use crate::error::SimError;
use crate::persistence;

/// The six difficulty parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Formation speed at level 1
    pub starting_speed: f32,
    /// Speed added per level
    pub speed_increase: f32,
    /// Maximum reachable speed
    pub speed_cap: f32,
    /// Shoot denominator at level 1
    pub starting_shoot_denominator: u32,
    /// Denominator removed per level (higher levels shoot more often)
    pub shoot_denominator_decrease: u32,
    /// Smallest reachable denominator
    pub shoot_denominator_floor: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            starting_speed: 2.0,
            speed_increase: 0.5,
            speed_cap: 4.0,
            // Draws happen every tick for every frontline alien
            starting_shoot_denominator: 400,
            shoot_denominator_decrease: 25,
            shoot_denominator_floor: 150,
        }
    }
}

impl DifficultyConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let config: Self = persistence::load_json(path)
            .map_err(|e| SimError::Configuration(e.to_string()))?;
        config.validate()?;
        log::info!("Loaded difficulty configuration from {}", path.display());
        Ok(config)
    }

    /// Reject parameter sets that would stall or invert the scaling
    pub fn validate(&self) -> Result<(), SimError> {
        let speeds = [self.starting_speed, self.speed_increase, self.speed_cap];
        if speeds.iter().any(|s| !s.is_finite()) {
            return Err(SimError::Configuration("speeds must be finite".into()));
        }
        if self.starting_speed <= 0.0 {
            return Err(SimError::Configuration(format!(
                "starting_speed must be positive, got {}",
                self.starting_speed
            )));
        }
        if self.speed_increase < 0.0 {
            return Err(SimError::Configuration(format!(
                "speed_increase must not be negative, got {}",
                self.speed_increase
            )));
        }
        if self.speed_cap < self.starting_speed {
            return Err(SimError::Configuration(format!(
                "speed_cap {} is below starting_speed {}",
                self.speed_cap, self.starting_speed
            )));
        }
        // The formation takes at most one step per tick
        let max_speed = 1.0 / SIM_DT;
        if self.speed_cap > max_speed {
            return Err(SimError::Configuration(format!(
                "speed_cap {} exceeds one step per tick ({max_speed})",
                self.speed_cap
            )));
        }
        if self.shoot_denominator_floor == 0 {
            return Err(SimError::Configuration(
                "shoot_denominator_floor must be at least 1".into(),
            ));
        }
        if self.starting_shoot_denominator < self.shoot_denominator_floor {
            return Err(SimError::Configuration(format!(
                "starting_shoot_denominator {} is below the floor {}",
                self.starting_shoot_denominator, self.shoot_denominator_floor
            )));
        }
        Ok(())
    }

    /// Formation speed for a level (levels start at 1)
    pub fn speed(&self, level: u32) -> f32 {
        let steps = level.max(1) - 1;
        (self.starting_speed + steps as f32 * self.speed_increase).min(self.speed_cap)
    }

    /// Shoot denominator for a level (levels start at 1)
    pub fn shoot_denominator(&self, level: u32) -> u32 {
        let steps = level.max(1) - 1;
        self.starting_shoot_denominator
            .saturating_sub(steps.saturating_mul(self.shoot_denominator_decrease))
            .max(self.shoot_denominator_floor)
    }
}

/// Difficulty values in effect for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub speed: f32,
    pub shoot_denominator: u32,
}

impl Difficulty {
    pub fn for_level(config: &DifficultyConfig, level: u32) -> Self {
        Self {
            speed: config.speed(level),
            shoot_denominator: config.shoot_denominator(level),
        }
    }

    /// Seconds between two formation steps
    pub fn sweep_period(&self) -> f32 {
        1.0 / self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> DifficultyConfig {
        DifficultyConfig {
            starting_speed: 2.0,
            speed_increase: 0.5,
            speed_cap: 4.0,
            starting_shoot_denominator: 50,
            shoot_denominator_decrease: 5,
            shoot_denominator_floor: 20,
        }
    }

    #[test]
    fn test_speed_scenarios() {
        let config = config();
        assert!((config.speed(1) - 2.0).abs() < 1e-6);
        assert!((config.speed(3) - 3.0).abs() < 1e-6);
        // Capped, not 4.5
        assert!((config.speed(6) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_shoot_denominator_floor() {
        let config = config();
        assert_eq!(config.shoot_denominator(1), 50);
        assert_eq!(config.shoot_denominator(2), 45);
        assert_eq!(config.shoot_denominator(7), 20);
        assert_eq!(config.shoot_denominator(100), 20);
        assert_eq!(config.shoot_denominator(u32::MAX), 20);
    }

    #[test]
    fn test_level_zero_treated_as_first() {
        let config = config();
        assert_eq!(config.speed(0), config.speed(1));
        assert_eq!(config.shoot_denominator(0), config.shoot_denominator(1));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "starting_speed": 1.5,
            "speed_increase": 0.25,
            "speed_cap": 3.0,
            "starting_shoot_denominator": 300,
            "shoot_denominator_decrease": 10,
            "shoot_denominator_floor": 100
        }"#;
        let config = DifficultyConfig::from_json_str(json).unwrap();
        assert_eq!(config.shoot_denominator_floor, 100);
        assert!((config.speed(2) - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_missing_field_is_configuration_error() {
        let result = DifficultyConfig::from_json_str(r#"{ "starting_speed": 1.0 }"#);
        assert!(matches!(result, Err(SimError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut bad = config();
        bad.starting_speed = 0.0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.speed_cap = 1.0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.speed_cap = 1.0 / SIM_DT + 1.0;
        assert!(matches!(bad.validate(), Err(SimError::Configuration(_))));

        let mut fastest = config();
        fastest.speed_cap = 1.0 / SIM_DT;
        assert!(fastest.validate().is_ok());

        let mut bad = config();
        bad.shoot_denominator_floor = 0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.speed_increase = f32::NAN;
        assert!(bad.validate().is_err());

        assert!(DifficultyConfig::default().validate().is_ok());
    }

    proptest! {
        #[test]
        fn prop_speed_monotonic_and_capped(
            start in 0.1f32..5.0,
            inc in 0.0f32..2.0,
            extra in 0.0f32..5.0,
            level in 1u32..500,
        ) {
            let config = DifficultyConfig {
                starting_speed: start,
                speed_increase: inc,
                speed_cap: start + extra,
                ..config()
            };
            let here = config.speed(level);
            let next = config.speed(level + 1);
            prop_assert!(next >= here);
            prop_assert!(here <= config.speed_cap);
        }

        #[test]
        fn prop_denominator_monotonic_and_floored(
            floor in 1u32..200,
            extra in 0u32..1000,
            dec in 0u32..100,
            level in 1u32..10_000,
        ) {
            let config = DifficultyConfig {
                starting_shoot_denominator: floor + extra,
                shoot_denominator_decrease: dec,
                shoot_denominator_floor: floor,
                ..config()
            };
            let here = config.shoot_denominator(level);
            let next = config.shoot_denominator(level + 1);
            prop_assert!(next <= here);
            prop_assert!(here >= floor);
        }
    }
}
