use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::grid::Dir;

/// Minimum drag length, in terminal columns, before a drag counts as a swipe.
pub const SWIPE_THRESHOLD: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Dir),
    Regenerate,
    Resize(isize),
    ToggleDisplayMode,
    Quit,
}

/// Turns raw terminal events into commands. A mouse press starts a swipe and
/// the matching release finishes it.
#[derive(Debug, Default)]
pub struct InputMapper {
    swipe_start: Option<(u16, u16)>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, event: &Event) -> Option<Command> {
        match event {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => self.map_mouse(mouse),
            _ => None,
        }
    }

    fn map_mouse(&mut self, mouse: &MouseEvent) -> Option<Command> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.swipe_start = Some((mouse.column, mouse.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (x0, y0) = self.swipe_start.take()?;
                let dx = mouse.column as i32 - x0 as i32;
                let dy = mouse.row as i32 - y0 as i32;
                swipe_direction(dx, dy, SWIPE_THRESHOLD).map(Command::Move)
            }
            _ => None,
        }
    }
}

pub fn map_key(key: &KeyEvent) -> Option<Command> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Move(Dir::Up)),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::Move(Dir::Right)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Move(Dir::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::Move(Dir::Left)),
        KeyCode::Char('r') | KeyCode::Enter => Some(Command::Regenerate),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::Resize(1)),
        KeyCode::Char('-') => Some(Command::Resize(-1)),
        KeyCode::Char('m') => Some(Command::ToggleDisplayMode),
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Direction of a drag of `dx` columns and `dy` rows, or `None` when it is
/// too short. Rows count double since a terminal cell is about twice as tall
/// as it is wide.
pub fn swipe_direction(dx: i32, dy: i32, threshold: i32) -> Option<Dir> {
    let abs_dx = dx.abs();
    let abs_dy = dy.abs() * 2;
    if abs_dx.max(abs_dy) <= threshold {
        return None;
    }
    if abs_dx > abs_dy {
        Some(if dx > 0 { Dir::Right } else { Dir::Left })
    } else {
        Some(if dy > 0 { Dir::Down } else { Dir::Up })
    }
}
