//! All game entity types: pure data, no game rules.
//!
//! Positions and sizes are in world units (800×600 by default); the
//! renderer scales them onto terminal cells.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    Victory,
    GameOver,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }
}

/// A rectangle moving by a constant velocity every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub rect: Rect,
    pub x_speed: i32,
    pub y_speed: i32,
}

impl Sprite {
    pub fn at(rect: Rect) -> Self {
        Self {
            rect,
            x_speed: 0,
            y_speed: 0,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub sprite: Sprite,
}

// ── Player & zombies ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub sprite: Sprite,
    pub hp: u32,
    pub ammo: u32,
    /// Always ±bullet speed; the sign follows the last lateral movement.
    pub bullet_x_speed: i32,
    /// Bullets fired by the player that are still in flight.
    pub bullets: Vec<Bullet>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Zombie {
    pub sprite: Sprite,
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum PowerUpKind {
    HealthPack { heal_amount: u32 },
    AmmoPack { ammo_count: u32 },
}

impl fmt::Display for PowerUpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerUpKind::HealthPack { heal_amount } => write!(f, "HealthPack +{}", heal_amount),
            PowerUpKind::AmmoPack { ammo_count } => write!(f, "AmmoPack +{}", ammo_count),
        }
    }
}

/// A falling pack that comes to rest just above the bottom of the world.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub sprite: Sprite,
    pub kind: PowerUpKind,
    pub spawned_at_ms: u64,
}

// ── Timers & notices ──────────────────────────────────────────────────────────

/// Spawn clock shared by a whole class of entities.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnTimer {
    pub interval_ms: u64,
    /// Subtracted from `interval_ms` after each spawn (negative slows it down).
    pub interval_difference_ms: i64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
    pub last_spawn_ms: u64,
}

/// Short message shown on the HUD until `expires_at_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub expires_at_ms: u64,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// Tunables copied out of `GameConfig` so `tick` stays self-contained.
#[derive(Clone, Debug)]
pub struct Rules {
    pub player_speed: i32,
    pub max_hp: u32,
    pub max_ammo: u32,
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_padding: i32,
    pub zombie_width: i32,
    pub zombie_height: i32,
    pub zombie_speed: i32,
    pub max_wave_size: u32,
    pub wave_gap: i32,
    pub power_up_width: i32,
    pub power_up_height: i32,
    pub power_up_fall_speed: i32,
    pub power_up_floor_margin: i32,
    pub power_up_lifetime_ms: u64,
    pub heal_amount: u32,
    pub ammo_count: u32,
    pub kills_to_win: u32,
    pub notice_ms: u64,
}

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub zombies: Vec<Zombie>,
    pub power_ups: Vec<PowerUp>,
    pub zombie_timer: SpawnTimer,
    pub power_up_timer: SpawnTimer,
    /// Number of zombie waves released so far.
    pub waves: u32,
    pub kills: u32,
    pub notice: Option<Notice>,
    pub level: Level,
    pub status: GameStatus,
    pub frame: u64,
    /// Simulated clock, advanced by `frame_ms` every tick.
    pub elapsed_ms: u64,
    pub frame_ms: u64,
    pub width: i32,
    pub height: i32,
    pub rules: Rules,
}
