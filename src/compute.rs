//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG and log lines.

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Bullet, GameState, GameStatus, Level, Notice, Player, PowerUp, PowerUpKind, Rect, Rules,
    SpawnTimer, Sprite, Zombie,
};

// ── Difficulty tables ────────────────────────────────────────────────────────

fn zombie_speed_bonus(level: &Level) -> i32 {
    match level {
        Level::Easy => 0,
        Level::Medium => 1,
        Level::Hard => 3,
    }
}

/// Initial zombie spawn interval as a percentage of the configured one.
fn zombie_interval_percent(level: &Level) -> u64 {
    match level {
        Level::Easy => 120,
        Level::Medium => 100,
        Level::Hard => 70,
    }
}

/// Zombies released by wave number `wave` (counted from 0).
pub fn wave_size(wave: u32, max_wave_size: u32) -> u32 {
    (1 + wave / 2).min(max_wave_size)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state for a given level.
pub fn init_state(level: Level, config: &GameConfig) -> GameState {
    let width = config.window.width;
    let height = config.window.height;
    let p = &config.player;
    let z = &config.zombie;
    let pu = &config.power_up;

    let zombie_interval = (z.spawn_interval_ms * zombie_interval_percent(&level) / 100)
        .max(z.min_spawn_interval_ms);

    let rules = Rules {
        player_speed: p.speed,
        max_hp: p.max_hp,
        max_ammo: p.max_ammo,
        bullet_width: p.bullet_width,
        bullet_height: p.bullet_height,
        bullet_padding: p.bullet_padding,
        zombie_width: z.width,
        zombie_height: z.height,
        zombie_speed: z.speed + zombie_speed_bonus(&level),
        max_wave_size: z.max_wave_size,
        wave_gap: z.wave_gap,
        power_up_width: pu.width,
        power_up_height: pu.height,
        power_up_fall_speed: pu.fall_speed,
        power_up_floor_margin: pu.floor_margin,
        power_up_lifetime_ms: pu.lifetime_ms,
        heal_amount: pu.heal_amount,
        ammo_count: pu.ammo_count,
        kills_to_win: config.rules.kills_to_win,
        notice_ms: config.rules.notice_ms,
    };

    GameState {
        player: Player {
            sprite: Sprite::at(Rect::new(
                (width - p.width) / 2,
                (height - p.height) / 2,
                p.width,
                p.height,
            )),
            hp: p.hp,
            ammo: p.ammo,
            bullet_x_speed: p.bullet_speed.abs(),
            bullets: Vec::new(),
        },
        zombies: Vec::new(),
        power_ups: Vec::new(),
        zombie_timer: SpawnTimer {
            interval_ms: zombie_interval,
            interval_difference_ms: z.interval_difference_ms,
            min_interval_ms: z.min_spawn_interval_ms,
            max_interval_ms: zombie_interval,
            last_spawn_ms: 0,
        },
        power_up_timer: SpawnTimer {
            interval_ms: pu.spawn_interval_ms,
            interval_difference_ms: pu.interval_difference_ms,
            min_interval_ms: pu.min_spawn_interval_ms,
            max_interval_ms: pu.max_spawn_interval_ms,
            last_spawn_ms: 0,
        },
        waves: 0,
        kills: 0,
        notice: None,
        level,
        status: GameStatus::Playing,
        frame: 0,
        elapsed_ms: 0,
        frame_ms: config.frame_ms(),
        width,
        height,
        rules,
    }
}

// ── Geometry helpers ─────────────────────────────────────────────────────────

/// Strict overlap test; rectangles that only share an edge do not collide.
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

pub fn move_sprite(sprite: &Sprite) -> Sprite {
    Sprite {
        rect: Rect {
            x: sprite.rect.x + sprite.x_speed,
            y: sprite.rect.y + sprite.y_speed,
            ..sprite.rect
        },
        ..sprite.clone()
    }
}

/// True once a sprite has fully crossed the world edge it is heading toward.
fn has_left_world(sprite: &Sprite, width: i32) -> bool {
    (sprite.x_speed > 0 && sprite.rect.x >= width) || (sprite.x_speed < 0 && sprite.rect.right() <= 0)
}

// ── Timers ───────────────────────────────────────────────────────────────────

pub fn spawn_due(timer: &SpawnTimer, now_ms: u64) -> bool {
    now_ms.saturating_sub(timer.last_spawn_ms) >= timer.interval_ms
}

/// Record a spawn at `now_ms` and step the interval by its difference.
pub fn advance_timer(timer: &SpawnTimer, now_ms: u64) -> SpawnTimer {
    let next = (timer.interval_ms as i64 - timer.interval_difference_ms).max(0) as u64;
    SpawnTimer {
        interval_ms: next.max(timer.min_interval_ms).min(timer.max_interval_ms),
        last_spawn_ms: now_ms,
        ..timer.clone()
    }
}

fn post_notice(state: &mut GameState, text: String) {
    info!("{}", text);
    state.notice = Some(Notice {
        text,
        expires_at_ms: state.elapsed_ms + state.rules.notice_ms,
    });
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Set the player's velocity from a direction on each axis (-1, 0 or 1).
pub fn steer_player(state: &GameState, x_dir: i32, y_dir: i32) -> GameState {
    let speed = state.rules.player_speed;
    GameState {
        player: Player {
            sprite: Sprite {
                x_speed: x_dir.signum() * speed,
                y_speed: y_dir.signum() * speed,
                ..state.player.sprite.clone()
            },
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Where a bullet fired right now would appear, vertically centred on the
/// player.  Its left edge sits `padding` units past whichever player edge
/// it last faced.
pub fn bullet_spawn_rect(player: &Player, rules: &Rules) -> Rect {
    let body = player.sprite.rect;
    let x = if player.bullet_x_speed >= 0 {
        body.right() + rules.bullet_padding
    } else {
        body.x - rules.bullet_padding
    };
    let y = body.center_y() - rules.bullet_height / 2;
    Rect::new(x, y, rules.bullet_width, rules.bullet_height)
}

/// Fire one round in the facing direction, if there is ammo left.
pub fn player_shoot(state: &GameState) -> GameState {
    let mut next = state.clone();
    if state.status != GameStatus::Playing {
        return next;
    }
    if state.player.ammo == 0 {
        post_notice(&mut next, "Out of ammo!".to_string());
        return next;
    }

    next.player.ammo -= 1;
    next.player.bullets.push(Bullet {
        sprite: Sprite {
            rect: bullet_spawn_rect(&state.player, &state.rules),
            x_speed: state.player.bullet_x_speed,
            y_speed: 0,
        },
    });
    debug!("shot fired, {} rounds left", next.player.ammo);
    next
}

// ── Per-frame pieces ─────────────────────────────────────────────────────────

/// Move the player, keep it inside the world and turn it toward its motion.
fn update_player(player: &Player, width: i32, height: i32) -> Player {
    let moved = move_sprite(&player.sprite);
    let rect = Rect {
        x: moved.rect.x.min(width - moved.rect.w).max(0),
        y: moved.rect.y.min(height - moved.rect.h).max(0),
        ..moved.rect
    };

    let speed = player.bullet_x_speed.abs();
    let bullet_x_speed = if moved.x_speed > 0 {
        speed
    } else if moved.x_speed < 0 {
        -speed
    } else {
        player.bullet_x_speed
    };

    Player {
        sprite: Sprite { rect, ..moved },
        bullet_x_speed,
        ..player.clone()
    }
}

/// Let a power-up fall, resting its bottom edge on `floor`.
fn fall(sprite: &Sprite, floor: i32) -> Sprite {
    let mut moved = move_sprite(sprite);
    if moved.rect.bottom() >= floor {
        moved.rect.y = floor - moved.rect.h;
    }
    moved
}

pub fn apply_power_up(player: &Player, kind: &PowerUpKind, rules: &Rules) -> Player {
    match kind {
        PowerUpKind::HealthPack { heal_amount } => Player {
            hp: (player.hp + heal_amount).min(rules.max_hp),
            ..player.clone()
        },
        PowerUpKind::AmmoPack { ammo_count } => Player {
            ammo: (player.ammo + ammo_count).min(rules.max_ammo),
            ..player.clone()
        },
    }
}

fn spawn_wave(state: &GameState, rng: &mut impl Rng) -> Vec<Zombie> {
    let r = &state.rules;
    let count = wave_size(state.waves, r.max_wave_size) as i32;
    let from_left = rng.gen_bool(0.5);
    let max_y = (state.height - r.zombie_height).max(0);

    (0..count)
        .map(|i| {
            let offset = i * (r.zombie_width + r.wave_gap);
            let (x, x_speed) = if from_left {
                (-r.zombie_width - offset, r.zombie_speed)
            } else {
                (state.width + offset, -r.zombie_speed)
            };
            Zombie {
                sprite: Sprite {
                    rect: Rect::new(x, rng.gen_range(0..=max_y), r.zombie_width, r.zombie_height),
                    x_speed,
                    y_speed: 0,
                },
            }
        })
        .collect()
}

fn spawn_power_up(state: &GameState, rng: &mut impl Rng) -> PowerUp {
    let r = &state.rules;
    let x = rng.gen_range(0..=(state.width - r.power_up_width).max(0));
    let kind = if rng.gen_bool(0.5) {
        PowerUpKind::HealthPack { heal_amount: r.heal_amount }
    } else {
        PowerUpKind::AmmoPack { ammo_count: r.ammo_count }
    };
    PowerUp {
        sprite: Sprite {
            rect: Rect::new(x, -r.power_up_height, r.power_up_width, r.power_up_height),
            x_speed: 0,
            y_speed: r.power_up_fall_speed,
        },
        kind,
        spawned_at_ms: state.elapsed_ms,
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
/// A finished game is returned unchanged.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }

    let mut next = state.clone();
    next.frame += 1;
    next.elapsed_ms += state.frame_ms;
    let now = next.elapsed_ms;
    let rules = state.rules.clone();

    // ── 1. Move everything ───────────────────────────────────────────────────
    next.player = update_player(&state.player, state.width, state.height);

    let bullets: Vec<Bullet> = state
        .player
        .bullets
        .iter()
        .map(|b| Bullet { sprite: move_sprite(&b.sprite) })
        .filter(|b| !has_left_world(&b.sprite, state.width))
        .collect();

    let zombies: Vec<Zombie> = state
        .zombies
        .iter()
        .map(|z| Zombie { sprite: move_sprite(&z.sprite) })
        .filter(|z| !has_left_world(&z.sprite, state.width))
        .collect();

    let floor = state.height - rules.power_up_floor_margin;
    let power_ups: Vec<PowerUp> = state
        .power_ups
        .iter()
        .filter(|p| now.saturating_sub(p.spawned_at_ms) < rules.power_up_lifetime_ms)
        .map(|p| PowerUp {
            sprite: fall(&p.sprite, floor),
            ..p.clone()
        })
        .collect();

    // ── 2. Collision: bullets ↔ zombies ──────────────────────────────────────
    let mut killed: Vec<usize> = Vec::new();
    let mut spent: Vec<usize> = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        for (zi, zombie) in zombies.iter().enumerate() {
            if !killed.contains(&zi) && collides(&bullet.sprite.rect, &zombie.sprite.rect) {
                killed.push(zi);
                spent.push(bi);
                break;
            }
        }
    }

    let zombies: Vec<Zombie> = zombies
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !killed.contains(i))
        .map(|(_, z)| z)
        .collect();
    let bullets: Vec<Bullet> = bullets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !spent.contains(i))
        .map(|(_, b)| b)
        .collect();

    if !killed.is_empty() {
        next.kills += killed.len() as u32;
        info!("{} zombie(s) down, {} total", killed.len(), next.kills);
    }

    // ── 3. Collision: zombies ↔ player ───────────────────────────────────────
    let body = next.player.sprite.rect;
    let (biters, zombies): (Vec<Zombie>, Vec<Zombie>) = zombies
        .into_iter()
        .partition(|z| collides(&z.sprite.rect, &body));

    if !biters.is_empty() {
        next.player.hp = next.player.hp.saturating_sub(biters.len() as u32);
        let text = format!("Ouch! HP: {}", next.player.hp);
        post_notice(&mut next, text);
    }

    // ── 4. Collision: power-ups ↔ player ─────────────────────────────────────
    let (picked, power_ups): (Vec<PowerUp>, Vec<PowerUp>) = power_ups
        .into_iter()
        .partition(|p| collides(&p.sprite.rect, &body));

    for pack in &picked {
        next.player = apply_power_up(&next.player, &pack.kind, &rules);
        let text = format!("Picked up {}", pack.kind);
        post_notice(&mut next, text);
    }

    next.player.bullets = bullets;
    next.zombies = zombies;
    next.power_ups = power_ups;

    // ── 5. Spawning ──────────────────────────────────────────────────────────
    if spawn_due(&next.zombie_timer, now) {
        let wave = spawn_wave(&next, rng);
        info!("wave {} released: {} zombie(s)", next.waves + 1, wave.len());
        next.zombies.extend(wave);
        next.waves += 1;
        next.zombie_timer = advance_timer(&next.zombie_timer, now);
    }

    if spawn_due(&next.power_up_timer, now) {
        let pack = spawn_power_up(&next, rng);
        debug!("{} dropped at x={}", pack.kind, pack.sprite.rect.x);
        next.power_ups.push(pack);
        next.power_up_timer = advance_timer(&next.power_up_timer, now);
    }

    // ── 6. Win / lose ────────────────────────────────────────────────────────
    if next.player.hp == 0 {
        next.status = GameStatus::GameOver;
        post_notice(&mut next, "Game over!".to_string());
    } else if next.kills >= rules.kills_to_win {
        next.status = GameStatus::Victory;
        let text = format!("You survived! {} zombies down", next.kills);
        post_notice(&mut next, text);
    }

    next
}
