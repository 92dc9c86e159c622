/// Terminal events → game input.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use crate::entities::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Steer(Direction),
    /// Pointer moved to this terminal cell.
    Pointer { col: u16, row: u16 },
    Restart,
    Quit,
    Resize { cols: u16, rows: u16 },
}

/// Arrow keys and their `WASD` aliases.  Anything else is not a direction.
pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

pub fn translate(event: &Event) -> Option<Input> {
    match *event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) => {
            // Release events only arrive on keyboard-enhanced terminals
            if kind == KeyEventKind::Release {
                return None;
            }
            match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Input::Quit),
                KeyCode::Char('r') | KeyCode::Char('R') => Some(Input::Restart),
                other => direction_for(other).map(Input::Steer),
            }
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Input::Pointer {
                col: mouse.column,
                row: mouse.row,
            }),
            _ => None,
        },
        Event::Resize(cols, rows) => Some(Input::Resize { cols, rows }),
        _ => None,
    }
}
