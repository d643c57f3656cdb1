use zombie_survival::compute::{init_state, player_shoot};
use zombie_survival::config::GameConfig;
use zombie_survival::display::*;
use zombie_survival::entities::*;

fn make_state() -> GameState {
    init_state(Level::Medium, &GameConfig::default())
}

fn render_to_string(state: &GameState) -> String {
    let mut buf: Vec<u8> = Vec::new();
    render(&mut buf, state, 80, 24).expect("render into memory");
    String::from_utf8_lossy(&buf).into_owned()
}

#[test]
fn world_corners_map_inside_border() {
    let s = make_state();
    assert_eq!(world_to_cell(0, 0, &s, 80, 24), Some((1, 2)));
    // 1 + 799 * 78 / 800, 2 + 599 * 20 / 600
    assert_eq!(world_to_cell(799, 599, &s, 80, 24), Some((78, 21)));
}

#[test]
fn points_outside_world_have_no_cell() {
    let s = make_state();
    assert_eq!(world_to_cell(-1, 0, &s, 80, 24), None);
    assert_eq!(world_to_cell(800, 0, &s, 80, 24), None);
    assert_eq!(world_to_cell(0, 600, &s, 80, 24), None);
}

#[test]
fn clock_formats_minutes_and_seconds() {
    assert_eq!(format_clock(0), "00:00");
    assert_eq!(format_clock(83_500), "01:23");
}

#[test]
fn hud_shows_progress_and_level() {
    let out = render_to_string(&make_state());
    assert!(out.contains("Kills:0/30"));
    assert!(out.contains("[ MEDIUM ]"));
    assert!(out.contains("Ammo: 10"));
    assert!(out.contains(CONTROLS_HINT));
    assert!(!out.contains("GAME  OVER"));
}

#[test]
fn active_notice_is_drawn() {
    let mut s = make_state();
    s.player.ammo = 0;
    let out = render_to_string(&player_shoot(&s));
    assert!(out.contains("Out of ammo!"));
}

#[test]
fn expired_notice_is_hidden() {
    let mut s = make_state();
    s.notice = Some(Notice { text: "Picked up AmmoPack +5".to_string(), expires_at_ms: 100 });
    s.elapsed_ms = 200;
    assert!(!render_to_string(&s).contains("Picked up"));
}

#[test]
fn end_screens_are_drawn() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    assert!(render_to_string(&s).contains("GAME  OVER"));

    s.status = GameStatus::Victory;
    let out = render_to_string(&s);
    assert!(out.contains("SURVIVED!"));
    assert!(out.contains("R - Play Again"));
}

#[test]
fn off_screen_entities_are_skipped() {
    let mut s = make_state();
    s.zombies.push(Zombie {
        sprite: Sprite { rect: Rect::new(-25, 100, 25, 25), x_speed: 3, y_speed: 0 },
    });
    let out = render_to_string(&s);
    assert!(!out.contains('Z'));
}
