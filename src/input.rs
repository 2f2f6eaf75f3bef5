use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::game::InputOutcome;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the unit `(dx, dy)` step for this direction. `y` grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete input tokens consumed by the game cores.
///
/// The cores never see raw device state; everything arrives as one of these.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Confirm,
    Cancel,
    Pause,
    Quit,
    Settings,
    /// Number key `1..=9`, used for difficulty shortcuts.
    Digit(u8),
    /// Left mouse press at a terminal cell.
    Click { column: u16, row: u16 },
    /// Hard stop requested (Ctrl-C); leaves the program from any phase.
    Exit,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Polls crossterm for keyboard and mouse events and maps them to [`GameInput`].
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one event. Unmapped events yield `Ok(None)`.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        Ok(match event::read()? {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => map_mouse(mouse),
            _ => None,
        })
    }
}

/// Feeds polled inputs to `handle` until `deadline`.
///
/// Polls at least once per call, with a zero timeout when the deadline has
/// already passed, and keeps draining while events are queued. A frame whose
/// drawing overran the deadline therefore still reads the keyboard. Stops
/// early when `handle` asks to exit.
pub fn pump_until<P, H>(deadline: Instant, mut poll: P, mut handle: H) -> io::Result<InputOutcome>
where
    P: FnMut(Duration) -> io::Result<Option<GameInput>>,
    H: FnMut(GameInput) -> InputOutcome,
{
    loop {
        let timeout = deadline.saturating_duration_since(Instant::now());
        match poll(timeout)? {
            Some(input) => {
                if handle(input) == InputOutcome::Exit {
                    return Ok(InputOutcome::Exit);
                }
            }
            None if Instant::now() >= deadline => return Ok(InputOutcome::Continue),
            None => {}
        }
    }
}

/// Maps one key event to an input token. Release and repeat events are ignored.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            .then_some(GameInput::Exit);
    }

    let input = match key.code {
        KeyCode::Up => GameInput::Direction(Direction::Up),
        KeyCode::Down => GameInput::Direction(Direction::Down),
        KeyCode::Left => GameInput::Direction(Direction::Left),
        KeyCode::Right => GameInput::Direction(Direction::Right),
        KeyCode::Enter | KeyCode::Char(' ') => GameInput::Confirm,
        KeyCode::Esc => GameInput::Cancel,
        KeyCode::Char('p') | KeyCode::Char('P') => GameInput::Pause,
        KeyCode::Char('q') | KeyCode::Char('Q') => GameInput::Quit,
        KeyCode::Char('d') | KeyCode::Char('D') => GameInput::Settings,
        KeyCode::Char(c @ '1'..='9') => GameInput::Digit(c as u8 - b'0'),
        _ => return None,
    };

    Some(input)
}

/// Maps one mouse event to an input token. Only left presses are reported.
#[must_use]
pub fn map_mouse(mouse: MouseEvent) -> Option<GameInput> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(GameInput::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}
