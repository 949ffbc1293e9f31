//! Tunable game constants, loaded from a RON file.
//!
//! Every field has a default, so a config file only needs to list the values
//! it changes.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Sample config shipped with the crate, also the default lookup path.
pub const DEFAULT_CONFIG_PATH: &str = "assets/webshooter.ron";

/// Environment variable naming a config file when no CLI argument is given.
pub const CONFIG_ENV: &str = "WEBSHOOTER_CONFIG";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // Play-field
    pub field_width: f32,
    pub field_height: f32,

    // Player
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    pub starting_lives: u32,
    pub shield_margin: f32,
    pub shield_thickness: u16,

    // Projectiles
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,
    /// Horizontal offset of the side shots when double bullets are active.
    pub double_bullet_offset: f32,

    // Enemies
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_initial_speed: f32,
    pub enemy_speed_increment: f32,
    pub enemy_spawn_y_min: f32,
    pub enemy_spawn_y_max: f32,

    // Spawner, in frames
    pub initial_spawn_timer: u32,
    pub spawn_base_interval: u32,
    pub spawn_interval_step: u32,
    pub spawn_min_interval: u32,

    // Progression
    pub enemies_per_level: u32,
    pub score_per_hit: u32,
    pub boss_level: u32,
    pub boss_width: f32,
    pub boss_height: f32,
    pub boss_health: i32,
    pub boss_spawn_y: f32,

    // Pacing
    pub frame_ms: u64,
    pub game_over_hold_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,

            player_width: 50.0,
            player_height: 50.0,
            player_speed: 1.0,
            starting_lives: 3,
            shield_margin: 5.0,
            shield_thickness: 3,

            projectile_width: 5.0,
            projectile_height: 10.0,
            projectile_speed: 2.0,
            double_bullet_offset: 10.0,

            enemy_width: 50.0,
            enemy_height: 50.0,
            enemy_initial_speed: 0.8,
            enemy_speed_increment: 0.2,
            enemy_spawn_y_min: -100.0,
            enemy_spawn_y_max: -40.0,

            initial_spawn_timer: 500,
            spawn_base_interval: 1000,
            spawn_interval_step: 100,
            spawn_min_interval: 100,

            enemies_per_level: 5,
            score_per_hit: 10,
            boss_level: 10,
            boss_width: 100.0,
            boss_height: 100.0,
            boss_health: 10,
            boss_spawn_y: -100.0,

            frame_ms: 8,
            game_over_hold_ms: 2000,
        }
    }
}

impl GameConfig {
    /// Parse a config from RON text and validate it.
    pub fn from_ron(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&text, path)?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("player", self.player_width, self.player_height),
            ("projectile", self.projectile_width, self.projectile_height),
            ("enemy", self.enemy_width, self.enemy_height),
            ("boss", self.boss_width, self.boss_height),
        ];
        for (name, w, h) in sizes {
            if !(w > 0.0 && h > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} size must be positive")));
            }
            if w > self.field_width || h > self.field_height {
                return Err(ConfigError::Invalid(format!(
                    "{name} ({w}x{h}) does not fit the {}x{} field",
                    self.field_width, self.field_height
                )));
            }
        }
        if self.enemy_spawn_y_min > self.enemy_spawn_y_max {
            return Err(ConfigError::Invalid(
                "enemy_spawn_y_min must not exceed enemy_spawn_y_max".into(),
            ));
        }
        if self.enemies_per_level == 0 {
            return Err(ConfigError::Invalid("enemies_per_level must be at least 1".into()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1".into()));
        }
        if self.boss_health <= 0 {
            return Err(ConfigError::Invalid("boss_health must be positive".into()));
        }
        if self.frame_ms == 0 {
            return Err(ConfigError::Invalid("frame_ms must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<GameConfig, ConfigError> {
        GameConfig::from_ron(text, Path::new("test.ron"))
    }

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse("(enemies_per_level: 3, boss_level: 4)").unwrap();
        assert_eq!(config.enemies_per_level, 3);
        assert_eq!(config.boss_level, 4);
        assert_eq!(config.field_width, 800.0);
        assert_eq!(config.starting_lives, 3);
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let err = parse("(enemies_per_level: )").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn oversized_enemy_is_rejected() {
        let err = parse("(field_width: 40.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_kill_threshold_is_rejected() {
        let err = parse("(enemies_per_level: 0)").unwrap_err();
        assert!(err.to_string().contains("enemies_per_level"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = GameConfig::load(Path::new("definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn shipped_sample_parses() {
        let text = include_str!("../assets/webshooter.ron");
        let config = parse(text).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
