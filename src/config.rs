//! Game tunables, loadable from a TOML file.
//!
//! Every default matches the stock game: an 800×600 world at 30 FPS, a
//! player with 5 HP and 10 rounds, zombies every 7 seconds (quickening by a
//! quarter second per wave) and power-ups every 5 seconds (slowing by a
//! tenth of a second per drop).

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value that parses but cannot drive the game
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// World width in world units.
    pub width: i32,
    /// World height in world units.
    pub height: i32,
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Zombie Survival".to_string(),
            width: 800,
            height: 600,
            fps: 30,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: i32,
    pub height: i32,
    /// Units moved per tick while a direction key is held.
    pub speed: i32,
    pub hp: u32,
    pub max_hp: u32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_speed: i32,
    /// Gap between the player and a freshly fired bullet.
    pub bullet_padding: i32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            speed: 5,
            hp: 5,
            max_hp: 10,
            ammo: 10,
            max_ammo: 50,
            bullet_width: 10,
            bullet_height: 4,
            bullet_speed: 12,
            bullet_padding: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZombieConfig {
    pub width: i32,
    pub height: i32,
    pub speed: i32,
    pub spawn_interval_ms: u64,
    /// Subtracted from the interval after every wave.
    pub interval_difference_ms: i64,
    pub min_spawn_interval_ms: u64,
    pub max_wave_size: u32,
    /// Horizontal gap between zombies of the same wave.
    pub wave_gap: i32,
}

impl Default for ZombieConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 25,
            speed: 2,
            spawn_interval_ms: 7000,
            interval_difference_ms: 250,
            min_spawn_interval_ms: 1000,
            max_wave_size: 6,
            wave_gap: 15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub width: i32,
    pub height: i32,
    pub fall_speed: i32,
    pub spawn_interval_ms: u64,
    /// Subtracted from the interval after every drop; negative slows drops down.
    pub interval_difference_ms: i64,
    pub min_spawn_interval_ms: u64,
    pub max_spawn_interval_ms: u64,
    /// Resting distance between a landed pack and the bottom of the world.
    pub floor_margin: i32,
    pub lifetime_ms: u64,
    pub heal_amount: u32,
    pub ammo_count: u32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
            fall_speed: 4,
            spawn_interval_ms: 5000,
            interval_difference_ms: -100,
            min_spawn_interval_ms: 1000,
            max_spawn_interval_ms: 10_000,
            floor_margin: 25,
            lifetime_ms: 12_000,
            heal_amount: 1,
            ammo_count: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub kills_to_win: u32,
    pub notice_ms: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            kills_to_win: 30,
            notice_ms: 2000,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub zombie: ZombieConfig,
    pub power_up: PowerUpConfig,
    pub rules: RulesConfig,
}

impl GameConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Milliseconds simulated by one tick.
    pub fn frame_ms(&self) -> u64 {
        1000 / u64::from(self.window.fps.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.window.width <= 0 || self.window.height <= 0 {
            return invalid("window dimensions must be positive");
        }
        if self.window.fps == 0 || self.window.fps > 1000 {
            return invalid("fps must be between 1 and 1000");
        }
        let sizes = [
            self.player.width,
            self.player.height,
            self.player.bullet_width,
            self.player.bullet_height,
            self.zombie.width,
            self.zombie.height,
            self.power_up.width,
            self.power_up.height,
        ];
        if sizes.iter().any(|&s| s <= 0) {
            return invalid("sprite sizes must be positive");
        }
        if self.player.width > self.window.width || self.player.height > self.window.height {
            return invalid("player does not fit inside the window");
        }
        // Easy adds no bonus, so the configured zombie speed must move them by itself
        if self.zombie.speed <= 0 {
            return invalid("zombie speed must be positive");
        }
        if self.player.speed <= 0 {
            return invalid("player speed must be positive");
        }
        if self.power_up.fall_speed <= 0 {
            return invalid("power-up fall speed must be positive");
        }
        if self.player.bullet_speed <= 0 {
            return invalid("bullet speed must be positive");
        }
        if self.player.hp == 0 || self.player.hp > self.player.max_hp {
            return invalid("starting hp must be between 1 and max_hp");
        }
        if self.player.ammo > self.player.max_ammo {
            return invalid("starting ammo exceeds max_ammo");
        }
        if self.zombie.min_spawn_interval_ms == 0
            || self.zombie.min_spawn_interval_ms > self.zombie.spawn_interval_ms
        {
            return invalid("zombie min_spawn_interval_ms must be in 1..=spawn_interval_ms");
        }
        if self.power_up.min_spawn_interval_ms == 0
            || self.power_up.min_spawn_interval_ms > self.power_up.spawn_interval_ms
            || self.power_up.max_spawn_interval_ms < self.power_up.spawn_interval_ms
        {
            return invalid(
                "power-up spawn interval must be in min_spawn_interval_ms..=max_spawn_interval_ms",
            );
        }
        if self.zombie.max_wave_size == 0 {
            return invalid("max_wave_size must be at least 1");
        }
        if self.rules.kills_to_win == 0 {
            return invalid("kills_to_win must be at least 1");
        }
        Ok(())
    }
}
