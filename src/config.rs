/// Game tunables.
///
/// Every field has a default, so a TOML file only needs to name the values
/// it overrides:
///
/// ```toml
/// frame_rate = 60
/// bombing_radius = 150.0
/// ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Play-area width in world units.
    pub width: f64,
    /// Play-area height in world units.
    pub height: f64,
    /// Frames simulated per second.
    pub frame_rate: u32,

    pub ship_diameter: f64,
    /// Ship displacement per key press, also the minimum pointer-chase speed.
    pub distance_per_step: f64,

    /// Enemies spawned per second.
    pub enemies_generation_rate: u32,
    pub enemy_radius: f64,
    /// Amplitude of the per-axis random walk.
    pub random_walk_step: f64,
    /// Distance an enemy closes on the ship each frame.
    pub enemy_chasing_step: f64,
    pub min_distance_from_ship: f64,
    /// Rejection-sampling attempts before a spawn accepts any position.
    pub spawn_retry_limit: u32,

    pub bomb_radius: f64,
    /// Enemies at or within this distance of a detonating bomb are destroyed.
    pub bombing_radius: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            frame_rate: 30,
            ship_diameter: 40.0,
            distance_per_step: 1.0,
            enemies_generation_rate: 2,
            enemy_radius: 3.0,
            random_walk_step: 2.0,
            enemy_chasing_step: 2.0,
            min_distance_from_ship: 100.0,
            spawn_retry_limit: 64,
            bomb_radius: 6.0,
            bombing_radius: 200.0,
        }
    }
}

impl GameConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("ship_diameter", self.ship_diameter)?;
        positive("distance_per_step", self.distance_per_step)?;
        non_negative("enemy_radius", self.enemy_radius)?;
        non_negative("random_walk_step", self.random_walk_step)?;
        non_negative("enemy_chasing_step", self.enemy_chasing_step)?;
        non_negative("min_distance_from_ship", self.min_distance_from_ship)?;
        non_negative("bomb_radius", self.bomb_radius)?;
        non_negative("bombing_radius", self.bombing_radius)?;

        if self.frame_rate == 0 {
            return Err(invalid("frame_rate", "must be at least 1"));
        }
        if self.enemies_generation_rate == 0 {
            return Err(invalid("enemies_generation_rate", "must be at least 1"));
        }
        if self.spawn_retry_limit == 0 {
            return Err(invalid("spawn_retry_limit", "must be at least 1"));
        }
        Ok(())
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate as f64)
    }

    pub fn spawn_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.enemies_generation_rate as f64)
    }

    /// Distance below which an enemy touches the ship.
    pub fn hit_distance(&self) -> f64 {
        self.ship_diameter / 2.0
    }

    /// Distance below which the ship touches the bomb.
    pub fn pickup_distance(&self) -> f64 {
        self.ship_diameter / 2.0 + self.bomb_radius
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("expected a positive number, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("expected a non-negative number, got {value}")))
    }
}
