//! Rendering layer. All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game state.  No game logic is performed; this module only translates
//! world rectangles into terminal cells and queues crossterm commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::entities::{GameState, GameStatus, Level, PowerUpKind, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkGrey;
const C_HUD_HP: Color = Color::Red;
const C_HUD_AMMO: Color = Color::Yellow;
const C_HUD_KILLS: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_ZOMBIE: Color = Color::Green;
const C_BULLET: Color = Color::Cyan;
const C_HEALTH_PACK: Color = Color::Magenta;
const C_AMMO_PACK: Color = Color::Yellow;
const C_NOTICE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

pub const CONTROLS_HINT: &str = "← → ↑ ↓ / WASD : Move   SPACE : Shoot   Q : Quit";

// ── Coordinate mapping ────────────────────────────────────────────────────────

/// Map a world point onto the bordered play area of a `cols × rows`
/// terminal (columns 1..cols-1, rows 2..rows-2).  Points outside the world
/// have no cell.
pub fn world_to_cell(x: i32, y: i32, state: &GameState, cols: u16, rows: u16) -> Option<(u16, u16)> {
    if x < 0 || y < 0 || x >= state.width || y >= state.height {
        return None;
    }
    let inner_cols = i64::from(cols.saturating_sub(2).max(1));
    let inner_rows = i64::from(rows.saturating_sub(4).max(1));
    let col = 1 + i64::from(x) * inner_cols / i64::from(state.width);
    let row = 2 + i64::from(y) * inner_rows / i64::from(state.height);
    Some((col as u16, row as u16))
}

/// Cells covered by the visible part of `rect`: (left, top, right, bottom),
/// all inclusive.
fn rect_cells(rect: &Rect, state: &GameState, cols: u16, rows: u16) -> Option<(u16, u16, u16, u16)> {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = (rect.right() - 1).min(state.width - 1);
    let y1 = (rect.bottom() - 1).min(state.height - 1);
    if x0 > x1 || y0 > y1 {
        return None;
    }
    let (left, top) = world_to_cell(x0, y0, state, cols, rows)?;
    let (right, bottom) = world_to_cell(x1, y1, state, cols, rows)?;
    Some((left, top, right, bottom))
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame onto a `cols × rows` terminal.
pub fn render<W: Write>(out: &mut W, state: &GameState, cols: u16, rows: u16) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_hud(out, state, cols)?;

    for pack in &state.power_ups {
        let color = match pack.kind {
            PowerUpKind::HealthPack { .. } => C_HEALTH_PACK,
            PowerUpKind::AmmoPack { .. } => C_AMMO_PACK,
        };
        let glyph = match pack.kind {
            PowerUpKind::HealthPack { .. } => '+',
            PowerUpKind::AmmoPack { .. } => '≡',
        };
        draw_rect(out, &pack.sprite.rect, state, cols, rows, glyph, color)?;
    }
    for zombie in &state.zombies {
        draw_rect(out, &zombie.sprite.rect, state, cols, rows, 'Z', C_ZOMBIE)?;
    }
    for bullet in &state.player.bullets {
        draw_rect(out, &bullet.sprite.rect, state, cols, rows, '-', C_BULLET)?;
    }
    draw_player(out, state, cols, rows)?;

    draw_notice(out, state, cols)?;
    draw_controls_hint(out, rows)?;

    match state.status {
        GameStatus::GameOver => draw_end_screen(out, state, cols, rows, "GAME  OVER", Color::Red)?,
        GameStatus::Victory => draw_end_screen(out, state, cols, rows, " SURVIVED! ", Color::Green)?,
        GameStatus::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row rows-2 — bottom bar
    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

pub fn format_clock(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn draw_hud<W: Write>(out: &mut W, state: &GameState, cols: u16) -> std::io::Result<()> {
    // HP and ammo — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HP))?;
    out.queue(Print(format!("HP:{:<2} {}", state.player.hp, "♥".repeat(state.player.hp as usize))))?;
    out.queue(style::SetForegroundColor(C_HUD_AMMO))?;
    out.queue(Print(format!("  Ammo:{:>3}", state.player.ammo)))?;

    // Level — centre
    let (level_str, level_color) = match state.level {
        Level::Easy => ("[ EASY ]", Color::Green),
        Level::Medium => ("[ MEDIUM ]", Color::Yellow),
        Level::Hard => ("[ HARD ]", Color::Red),
    };
    let lx = (cols / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(level_color))?;
    out.queue(Print(level_str))?;

    // Kills, wave and clock — right
    let right_str = format!(
        "Kills:{}/{}  Wave:{}  {}",
        state.kills,
        state.rules.kills_to_win,
        state.waves,
        format_clock(state.elapsed_ms)
    );
    let rx = cols.saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_KILLS))?;
    out.queue(Print(&right_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_rect<W: Write>(
    out: &mut W,
    rect: &Rect,
    state: &GameState,
    cols: u16,
    rows: u16,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let Some((left, top, right, bottom)) = rect_cells(rect, state, cols, rows) else {
        return Ok(());
    };
    let line: String = std::iter::repeat(glyph)
        .take(usize::from(right - left + 1))
        .collect();

    out.queue(style::SetForegroundColor(color))?;
    for row in top..=bottom {
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, state: &GameState, cols: u16, rows: u16) -> std::io::Result<()> {
    draw_rect(out, &state.player.sprite.rect, state, cols, rows, '@', C_PLAYER)?;

    // Facing marker on the side bullets leave from
    if let Some((left, top, right, _)) = rect_cells(&state.player.sprite.rect, state, cols, rows) {
        let (col, marker) = if state.player.bullet_x_speed >= 0 {
            (right + 1, "›")
        } else {
            (left.saturating_sub(1), "‹")
        };
        if col >= 1 && col < cols.saturating_sub(1) {
            out.queue(cursor::MoveTo(col, top))?;
            out.queue(Print(marker))?;
        }
    }
    Ok(())
}

// ── Notice (top border) & controls hint (last row) ────────────────────────────

fn draw_notice<W: Write>(out: &mut W, state: &GameState, cols: u16) -> std::io::Result<()> {
    let Some(notice) = &state.notice else {
        return Ok(());
    };
    if state.elapsed_ms >= notice.expires_at_ms && state.status == GameStatus::Playing {
        return Ok(());
    }
    let text = format!(" {} ", notice.text);
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, 1))?;
    out.queue(style::SetForegroundColor(C_NOTICE))?;
    out.queue(Print(&text))?;
    Ok(())
}

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(CONTROLS_HINT))?;
    Ok(())
}

// ── End-of-game overlay ───────────────────────────────────────────────────────

fn draw_end_screen<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    rows: u16,
    title: &str,
    color: Color,
) -> std::io::Result<()> {
    let title_line = format!("║    {:<12}    ║", title);
    let lines: [(String, Color); 3] = [
        ("╔════════════════════╗".to_string(), color),
        (title_line, color),
        ("╚════════════════════╝".to_string(), color),
    ];
    let details: [(String, Color); 3] = [
        (format!("Zombies down: {:>4}", state.kills), Color::Yellow),
        (format!("Survived:    {}", format_clock(state.elapsed_ms)), Color::Yellow),
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];

    let cx = cols / 2;
    let total_rows = (lines.len() + details.len()) as u16;
    let start_row = (rows / 2).saturating_sub(total_rows / 2);

    for (i, (msg, color)) in lines.iter().chain(details.iter()).enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    Ok(())
}
