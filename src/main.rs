//! Wilson's Revenge entry point
//!
//! Owns the terminal session, maps keys to engine commands and drives the
//! fixed-period frame loop. All game rules live in the library.

use std::io::{self, BufWriter, Write, stdout};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Attribute, Color, Print},
    terminal,
};

use wilson_revenge::consts::{FRAME_MILLIS, SEED_ENV, TUNING_ENV};
use wilson_revenge::ui::{self, Frame, Line};
use wilson_revenge::{Command, Engine, GamePhase, GameState, Tuning};

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Command(Command),
    Quit,
}

/// Map a key to an action for the current phase
fn map_key(key: KeyEvent, state: &GameState) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Command(Command::Restart),
        KeyCode::Char('p') | KeyCode::Char('P') => Action::Command(Command::TogglePause),
        KeyCode::Char(' ') if state.phase == GamePhase::Title => Action::Command(Command::Start),
        KeyCode::Char(' ') => Action::Command(Command::Shoot),
        KeyCode::Up => Action::Command(Command::MoveUp),
        KeyCode::Down => Action::Command(Command::MoveDown),
        KeyCode::Right => Action::Command(Command::Jump),
        _ => return None,
    };
    Some(action)
}

/// Default balance unless an override file is named in the environment
fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var(TUNING_ENV) else {
        return Tuning::default();
    };
    match Tuning::load(&path) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }
    }
}

/// Seed from the environment for reproducible runs, else from the clock
fn run_seed() -> u64 {
    std::env::var(SEED_ENV)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        })
}

fn draw_lines<W: Write>(out: &mut W, lines: &[Line]) -> io::Result<()> {
    for (row, (text, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(0, row as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(text))?;
    }
    Ok(())
}

fn draw_frame<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(Color::Reset))?;
    out.queue(Print(&frame.header))?;

    let top = 2u16;
    for (y, row) in frame.rows.iter().enumerate() {
        out.queue(cursor::MoveTo(0, top + y as u16))?;
        let mut current: Option<(Color, bool)> = None;
        for cell in row {
            if current != Some((cell.color, cell.bold)) {
                out.queue(style::SetAttribute(Attribute::Reset))?;
                out.queue(style::SetForegroundColor(cell.color))?;
                if cell.bold {
                    out.queue(style::SetAttribute(Attribute::Bold))?;
                }
                current = Some((cell.color, cell.bold));
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(style::SetAttribute(Attribute::Reset))?;
    out.queue(cursor::MoveTo(0, top + frame.rows.len() as u16 + 1))?;
    out.queue(style::SetForegroundColor(Color::Reset))?;
    out.queue(Print(frame.footer))?;
    Ok(())
}

/// Render one complete screen for the current phase
fn render<W: Write>(out: &mut W, engine: &Engine) -> io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let state = engine.state();
    match state.phase {
        GamePhase::Title => draw_lines(out, &ui::title_lines())?,
        GamePhase::GameOver => draw_lines(out, &ui::game_over_lines(state.score))?,
        GamePhase::Running | GamePhase::Paused => {
            draw_frame(out, &ui::compose(state, engine.tuning()))?
        }
    }

    out.queue(style::ResetColor)?;
    out.flush()
}

/// Poll input until the next frame is due, tick, repeat
fn game_loop<W: Write>(out: &mut W, engine: &mut Engine) -> io::Result<()> {
    let period = Duration::from_millis(FRAME_MILLIS);
    let mut next_frame = Instant::now() + period;
    let mut dirty = true;

    loop {
        if dirty {
            render(out, engine)?;
            dirty = false;
        }

        let timeout = next_frame.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match map_key(key, engine.state()) {
                        Some(Action::Quit) => return Ok(()),
                        Some(Action::Command(command)) => {
                            engine.apply(command);
                            dirty = true;
                        }
                        None => {}
                    }
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        let now = Instant::now();
        if now >= next_frame {
            if engine.state().is_running() {
                engine.advance_frame();
                dirty = true;
            }
            for event in engine.drain_events() {
                log::trace!("{:?}", event);
            }
            next_frame += period;
            // Don't try to catch up after a stall
            if next_frame < now {
                next_frame = now + period;
            }
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let tuning = load_tuning();
    let seed = run_seed();
    log::info!("Wilson's Revenge starting with seed {}", seed);
    let mut engine = Engine::new(tuning, seed);

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    let result = game_loop(&mut out, &mut engine);

    // Always restore the terminal
    let _ = out.execute(style::ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("Terminal error: {}", e);
    }
    log::info!("Final score {}", engine.state().score);
    result
}
