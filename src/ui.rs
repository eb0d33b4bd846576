//! Terminal frame composition
//!
//! Turns a read-only [`GameState`] into a grid of styled cells. No terminal
//! I/O happens here; the binary writes the grid out with crossterm.

use crossterm::style::Color;

use crate::consts::{BACKGROUND_HEIGHT, LANE_HEIGHT, SKY_HEIGHT};
use crate::sim::{EntityKind, GameState};
use crate::tuning::Tuning;

const TITLE: &str = "WILSON'S REVENGE";

const C_PLAYER: Color = Color::AnsiValue(226);
const C_JUMP: Color = Color::AnsiValue(39);
const C_INVINCIBLE: Color = Color::AnsiValue(46);
const C_OBSTACLE: Color = Color::AnsiValue(196);
const C_CAR: Color = Color::AnsiValue(201);
const C_ENEMY: Color = Color::AnsiValue(160);
const C_TREE: Color = Color::AnsiValue(34);
const C_SUN: Color = Color::AnsiValue(220);
const C_SHOT: Color = Color::AnsiValue(255);
const C_TITLE: Color = Color::AnsiValue(214);
const C_GROUND: Color = Color::AnsiValue(240);
const C_DEATH: Color = Color::AnsiValue(196);
const C_GUN: Color = Color::AnsiValue(214);
const C_AMMO: Color = Color::AnsiValue(45);
const C_POWER_UP: Color = Color::AnsiValue(51);
const C_POWER_DOWN: Color = Color::AnsiValue(130);
const C_NO_JUMP: Color = Color::AnsiValue(1);
const C_YES_JUMP: Color = Color::AnsiValue(10);
const C_PAUSE: Color = Color::AnsiValue(208);
const C_TEXT: Color = Color::Reset;

/// One character cell of the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
    pub bold: bool,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        color: C_TEXT,
        bold: false,
    };
}

/// A composed frame: HUD line, playfield rows and key hints
#[derive(Debug, Clone)]
pub struct Frame {
    pub header: String,
    pub rows: Vec<Vec<Cell>>,
    pub footer: &'static str,
}

impl Frame {
    /// Playfield rows as plain text (handy for tests and logs)
    pub fn plain_rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.ch).collect())
            .collect()
    }
}

/// A line of styled text for the title and game-over screens
pub type Line = (String, Color);

const OBSTACLE: &[&str] = &["[XX]", "[XX]", "[XX]"];
const CAR: &[&str] = &[" ____ ", "[_||_\\", "\"O--O\""];
const ENEMY: &[&str] = &[" (X) ", " /|\\ ", " / \\ "];
const TREE: &[&str] = &["  ^  ", " / \\ ", "/   \\", "  |  "];
const GUN: &[&str] = &["~-="];
const AMMO: &[&str] = &["[A]"];
const POWER_UP: &[&str] = &["[P+]"];
const POWER_DOWN: &[&str] = &["[P-]"];
const NO_JUMP: &[&str] = &["[XJ]"];
const YES_JUMP: &[&str] = &["[OJ]"];

/// Sprite rows for an entity, with the lane row of the first line
fn sprite(kind: EntityKind) -> (usize, &'static [&'static str], Color) {
    match kind {
        EntityKind::Obstacle => (1, OBSTACLE, C_OBSTACLE),
        EntityKind::Car => (1, CAR, C_CAR),
        EntityKind::Enemy => (1, ENEMY, C_ENEMY),
        EntityKind::Gun => (2, GUN, C_GUN),
        EntityKind::Ammo => (2, AMMO, C_AMMO),
        EntityKind::PowerUp => (2, POWER_UP, C_POWER_UP),
        EntityKind::PowerDown => (2, POWER_DOWN, C_POWER_DOWN),
        EntityKind::DisableJump => (2, NO_JUMP, C_NO_JUMP),
        EntityKind::EnableJump => (2, YES_JUMP, C_YES_JUMP),
        EntityKind::Tree => (0, TREE, C_TREE),
    }
}

/// Write `text` at column `x` of row `y`, clipping at the edges
fn stamp(rows: &mut [Vec<Cell>], x: i32, y: usize, text: &str, color: Color, bold: bool) {
    let Some(row) = rows.get_mut(y) else {
        return;
    };
    for (i, ch) in text.chars().enumerate() {
        let col = x + i as i32;
        if col >= 0 && (col as usize) < row.len() {
            row[col as usize] = Cell { ch, color, bold };
        }
    }
}

/// Total playfield height for a lane count
pub fn playfield_height(lanes: usize) -> usize {
    SKY_HEIGHT + BACKGROUND_HEIGHT + lanes * LANE_HEIGHT
}

/// Row of the top of a lane
fn lane_top(lane: usize) -> usize {
    SKY_HEIGHT + BACKGROUND_HEIGHT + lane * LANE_HEIGHT
}

/// Compose the in-game view
pub fn compose(state: &GameState, tuning: &Tuning) -> Frame {
    let width = tuning.game_width.max(0.0) as usize;
    let height = playfield_height(tuning.lanes);
    let mut rows = vec![vec![Cell::BLANK; width]; height];
    let sun_x = width as i32 - 15;

    stamp(&mut rows, sun_x, 1, "\\ | /", C_SUN, false);
    stamp(&mut rows, sun_x - 1, 2, "-- O --", C_SUN, false);
    stamp(&mut rows, sun_x, 3, "/ | \\", C_SUN, false);

    for bg in &state.background {
        let (_, lines, color) = sprite(bg.kind);
        for (i, line) in lines.iter().enumerate() {
            stamp(&mut rows, bg.x as i32, SKY_HEIGHT + 1 + i, line, color, false);
        }
    }

    let ground = "_".repeat(width);
    for lane in 0..tuning.lanes {
        let top = lane_top(lane);
        stamp(&mut rows, 0, top + LANE_HEIGHT - 1, &ground, C_GROUND, false);

        for obj in state.objects.iter().filter(|o| o.lane == lane) {
            let (offset, lines, color) = sprite(obj.kind);
            for (i, line) in lines.iter().enumerate() {
                stamp(&mut rows, obj.x as i32, top + offset + i, line, color, true);
            }
        }
    }

    draw_player(&mut rows, state, tuning, width);

    if state.is_paused() {
        let text = " PAUSED ";
        let x = (width.saturating_sub(text.len()) / 2) as i32;
        stamp(&mut rows, x, height / 2, text, C_PAUSE, true);
    }

    Frame {
        header: header_line(state),
        rows,
        footer: " [↑ / ↓] Move | [ → ] Jump | [Space] Shoot | [P] Pause | [Q] Quit",
    }
}

fn draw_player(rows: &mut [Vec<Cell>], state: &GameState, tuning: &Tuning, width: usize) {
    let player = &state.player;
    let x = tuning.player_x as i32;
    let mut y = lane_top(player.lane) + 1;

    let color = if state.effects.is_invincible() {
        C_INVINCIBLE
    } else if player.is_jumping() {
        C_JUMP
    } else {
        C_PLAYER
    };

    if player.is_jumping() {
        y -= 1;
        stamp(rows, x, y, " (o> ", color, true);
        stamp(rows, x, y + 1, "<| |>", color, true);
        stamp(rows, x, y + 2, " L L ", color, true);
        return;
    }

    stamp(rows, x, y, " (o> ", color, true);
    if player.has_gun {
        stamp(rows, x + 4, y, "--=", color, true);
        if player.is_shooting() {
            let start = x + 7;
            let beam = "-".repeat(width.saturating_sub(start.max(0) as usize));
            stamp(rows, start, y, &beam, C_SHOT, true);
        }
    }
    stamp(rows, x, y + 1, " / ) ", color, true);
    stamp(rows, x, y + 2, " L L ", color, true);
}

/// Score, ammo, speed and active effects
pub fn header_line(state: &GameState) -> String {
    let mut status = String::new();
    if state.effects.is_invincible() {
        status.push_str(" [INVINCIBLE]");
    }
    if state.effects.is_double_score() {
        status.push_str(" [2X POINTS]");
    }
    if state.player.jump_disabled {
        status.push_str(" [JUMP DISABLED]");
    }
    format!(
        " {} | Score: {} | Ammo: {} | Speed: {:.2}{}",
        TITLE, state.score, state.player.ammo, state.speed, status
    )
}

/// Title screen with controls and the collectable legend
pub fn title_lines() -> Vec<Line> {
    let text = |s: &str| (s.to_string(), C_TEXT);
    vec![
        text(""),
        (format!("   {}", TITLE), C_TITLE),
        text(""),
        text("   Wilson is back, and this time it's personal."),
        text(""),
        text("   [↑ / ↓] Move Up/Down | [ → ] Jump | [SPC] Shoot"),
        text("   [ P ]   Pause / Resume"),
        text(""),
        text("   COLLECTABLES:"),
        ("   ~-=:  Get Gun + 5 Ammo".to_string(), C_GUN),
        ("   [A]:  +3 Ammo".to_string(), C_AMMO),
        ("   [P+]: Double Points + Invincible (5s)".to_string(), C_POWER_UP),
        ("   [P-]: Lose 100 Points".to_string(), C_POWER_DOWN),
        ("   [XJ]: DISABLE JUMPING!".to_string(), C_NO_JUMP),
        ("   [OJ]: ENABLE JUMPING!".to_string(), C_YES_JUMP),
        text(""),
        text("   Press [SPACE] to Start"),
    ]
}

/// Final score and restart hint
pub fn game_over_lines(score: u64) -> Vec<Line> {
    vec![
        (String::new(), C_TEXT),
        ("   lo siento, Wilson".to_string(), C_DEATH),
        (String::new(), C_TEXT),
        ("   WILSON MET HIS FATE...".to_string(), C_TEXT),
        (String::new(), C_TEXT),
        (format!("   FINAL SCORE: {}", score), C_TEXT),
        (String::new(), C_TEXT),
        ("   [R] RESTART  [Q] QUIT".to_string(), C_TEXT),
    ]
}
