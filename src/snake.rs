use std::collections::{HashSet, VecDeque};

use crate::config::GridSize;
use crate::input::{direction_change_is_valid, Direction};

/// Grid position in logical cell coordinates.
///
/// Coordinates are signed so a head that has just left the board can still be
/// represented and reported as a wall hit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns true when the position lies inside the bounds.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the cell at the middle of the grid.
    #[must_use]
    pub fn center_of(bounds: GridSize) -> Self {
        Self {
            x: i32::from(bounds.width / 2),
            y: i32::from(bounds.height / 2),
        }
    }
}

/// The snake: an ordered run of cells from head to tail plus its heading.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending_direction: Direction,
    grow: bool,
}

impl Snake {
    /// Creates a one-cell snake at `start` with the provided direction.
    #[must_use]
    pub fn new(start: Position, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_front(start);

        Self {
            body,
            direction,
            pending_direction: direction,
            grow: false,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            direction,
            pending_direction: direction,
            grow: false,
        }
    }

    /// Returns to a single-segment snake, dropping any queued turn or growth.
    pub fn reset(&mut self, start: Position, direction: Direction) {
        *self = Self::new(start, direction);
    }

    /// Requests a turn for the next move.
    ///
    /// A reversal of the current heading is rejected while the snake is longer
    /// than one cell. Returns whether the request was accepted. Several
    /// requests between moves overwrite each other; each is checked against
    /// the heading of the last move, not against the previous request.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.body.len() > 1 && !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.pending_direction = direction;
        true
    }

    /// Like [`Snake::set_direction`], but rejects a reversal at any length.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.pending_direction = direction;
        true
    }

    /// Sets both heading and queued turn without the reversal check.
    ///
    /// Used when a stationary snake starts moving.
    pub fn set_direction_unchecked(&mut self, direction: Direction) {
        self.direction = direction;
        self.pending_direction = direction;
    }

    /// Queues growth on the next movement tick.
    pub fn mark_growth(&mut self) {
        self.grow = true;
    }

    /// Returns true while growth is queued for the next move.
    #[must_use]
    pub fn growth_pending(&self) -> bool {
        self.grow
    }

    /// Moves one cell along the pending direction.
    ///
    /// The tail is kept when growth was queued. Returns whether the snake grew.
    pub fn advance(&mut self) -> bool {
        self.direction = self.pending_direction;
        let next_head = self.next_head_position();

        self.body.push_front(next_head);
        let grew = self.grow;
        if !grew {
            let _ = self.body.pop_back();
        }
        self.grow = false;

        grew
    }

    /// Returns the head position for the next movement tick.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().step(self.pending_direction)
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Every occupied cell, head included.
    #[must_use]
    pub fn occupied(&self) -> HashSet<Position> {
        self.body.iter().copied().collect()
    }

    /// Every occupied cell except the head.
    #[must_use]
    pub fn occupied_excluding_head(&self) -> HashSet<Position> {
        self.body.iter().skip(1).copied().collect()
    }

    /// Iterates over the segments behind the head.
    pub fn body_excluding_head(&self) -> impl Iterator<Item = &Position> {
        self.body.iter().skip(1)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the direction of the last move.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the direction the next move will take.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
