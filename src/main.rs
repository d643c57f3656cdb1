use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use zombie_survival::compute::{init_state, player_shoot, steer_player, tick};
use zombie_survival::config::GameConfig;
use zombie_survival::display::{self, CONTROLS_HINT};
use zombie_survival::entities::{GameState, GameStatus, Level};
use zombie_survival::logging;

const CONFIG_ENV: &str = "ZOMBIE_SURVIVAL_CONFIG";

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between shots while Space is held.
/// 8 frames @ 30 FPS ≈ 3.75 shots/sec, so a held trigger doesn't empty the clip.
const SHOOT_COOLDOWN: u32 = 8;

/// Frames a key stays "down" after its last press or repeat event.  Terminals
/// without release events only tell us a key is still held through repeats,
/// which arrive well inside 4 frames (about 133 ms at 30 FPS).
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Level),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = format!("☠  {}  ☠", config.window.title.to_uppercase());
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(&title))?;

    let goal = format!("Put down {} zombies to survive", config.rules.kills_to_win);
    out.queue(cursor::MoveTo(
        cx.saturating_sub(goal.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&goal))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select difficulty:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Easy  ", Color::Green,  "Slow shamblers, long breathers"),
        ("2", "Medium", Color::Yellow, "Balanced horde"),
        ("3", "Hard  ", Color::Red,    "Fast and relentless!"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<8}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" - {}", desc)))?;
    }

    // Power-up legend
    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 3))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Power-ups (walk over falling packs):"))?;

    let legend: &[(&str, Color, String)] = &[
        ("+", Color::Magenta, format!(" HealthPack - +{} HP", config.power_up.heal_amount)),
        ("≡", Color::Yellow,  format!(" AmmoPack   - +{} rounds", config.power_up.ammo_count)),
    ];
    for (i, (sym, color, desc)) in legend.iter().enumerate() {
        let row = cy + 4 + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(desc))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 7))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(CONTROLS_HINT))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. })) => {
                match code {
                    KeyCode::Char('1') => return Ok(MenuResult::Start(Level::Easy)),
                    KeyCode::Char('2') => return Ok(MenuResult::Start(Level::Medium)),
                    KeyCode::Char('3') => return Ok(MenuResult::Start(Level::Hard)),
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(MenuResult::Quit);
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(MenuResult::Quit);
                    }
                    _ => {}
                }
            }
            Ok(_) => {}
            // Input thread is gone; nothing more can be read.
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the still-fresh keys
/// (within `HOLD_WINDOW` frames) decide the player's velocity on both axes
/// and whether the trigger is down, so Space can be held while moving.
///
/// Keyboard-enhancement capable terminals send proper `Release` events and
/// keys are dropped at once; classic terminals only repeat `Press`, and
/// keys expire after `HOLD_WINDOW` frames of silence.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    frame_time: Duration,
) -> Result<bool> {
    let mut rng = thread_rng();

    // key → frame of its latest press/repeat
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;

    let left_keys = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
    let right_keys = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
    let up_keys = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
    let down_keys = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        loop {
            match rx.try_recv() {
                Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(true);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if state.status != GameStatus::Playing =>
                            {
                                return Ok(false);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Ok(_) => {}
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return Ok(true),
            }
        }

        // ── Apply held-key actions every frame ────────────────────────────────
        if state.status == GameStatus::Playing {
            let x_dir = i32::from(any_held(&key_frame, &right_keys, frame))
                - i32::from(any_held(&key_frame, &left_keys, frame));
            let y_dir = i32::from(any_held(&key_frame, &down_keys, frame))
                - i32::from(any_held(&key_frame, &up_keys, frame));
            *state = steer_player(state, x_dir, y_dir);

            if shoot_cooldown == 0 && is_held(&key_frame, &KeyCode::Char(' '), frame) {
                *state = player_shoot(state);
                shoot_cooldown = SHOOT_COOLDOWN;
            }

            *state = tick(state, &mut rng);
        }

        shoot_cooldown = shoot_cooldown.saturating_sub(1);

        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        display::render(out, state, cols, rows)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// First CLI argument, then `ZOMBIE_SURVIVAL_CONFIG`, then built-in defaults.
fn load_config() -> Result<GameConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => GameConfig::load_from_file(&path)
            .with_context(|| format!("failed to load config from {}", path)),
        None => Ok(GameConfig::default()),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = load_config()?;

    if let Err(err) = logging::init(logging::DEFAULT_LOG_FILE) {
        eprintln!("logging disabled: {}", err);
    }
    info!("starting {} ({}x{} @ {} fps)", config.window.title, config.window.width, config.window.height, config.window.fps);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(terminal::SetTitle(&config.window.title))?;
    out.execute(cursor::Hide)?;

    // Ask for release/repeat events; terminals that refuse keep working
    // through the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Keyboard reads block, so they live on their own thread and reach the
    // frame loop over a channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // game loop is gone
                }
            }
            Err(err) => {
                warn!("input thread stopped: {}", err);
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    // Undo raw mode and the alternate screen whatever `run` returned
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exiting");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> Result<()> {
    let frame_time = Duration::from_millis(config.frame_ms());

    loop {
        match show_menu(out, rx, config)? {
            MenuResult::Quit => break,
            MenuResult::Start(level) => {
                info!("new game on {:?}", level);
                let mut state = init_state(level, config);
                let quit = game_loop(out, &mut state, rx, frame_time)?;

                info!(
                    "game ended: {:?}, {} kills, {} waves, {} ms",
                    state.status, state.kills, state.waves, state.elapsed_ms
                );

                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
