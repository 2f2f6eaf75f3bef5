//! Pure collision checks over a snapshot of the board.

use serde::Deserialize;

use crate::config::GridSize;
use crate::snake::{Position, Snake};

/// Why a round ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// How the head is matched against food.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCollision {
    /// Head and food must share the same cell.
    ExactCell,
    /// Cell centers projected into pixel space must be closer than one cell.
    Proximity { cell_pixels: u32 },
}

/// True iff `head` lies outside `[0, width) × [0, height)`.
#[must_use]
pub fn hits_wall(head: Position, bounds: GridSize) -> bool {
    !head.is_within_bounds(bounds)
}

/// True iff `head` equals one of the `body` cells. The body must not include the head.
#[must_use]
pub fn hits_self<'a, I>(head: Position, body: I) -> bool
where
    I: IntoIterator<Item = &'a Position>,
{
    body.into_iter().any(|segment| *segment == head)
}

/// True when the head reaches the food under the given policy.
#[must_use]
pub fn hits_food(head: Position, food: Position, policy: FoodCollision) -> bool {
    match policy {
        FoodCollision::ExactCell => head == food,
        FoodCollision::Proximity { cell_pixels } => {
            pixel_distance(head, food, cell_pixels) < f64::from(cell_pixels)
        }
    }
}

/// Euclidean distance between the pixel centers of two cells.
#[must_use]
pub fn pixel_distance(a: Position, b: Position, cell_pixels: u32) -> f64 {
    let (ax, ay) = pixel_center(a, cell_pixels);
    let (bx, by) = pixel_center(b, cell_pixels);
    (ax - bx).hypot(ay - by)
}

fn pixel_center(position: Position, cell_pixels: u32) -> (f64, f64) {
    let size = f64::from(cell_pixels);
    (
        f64::from(position.x) * size + size / 2.0,
        f64::from(position.y) * size + size / 2.0,
    )
}

/// Checks both terminal conditions for the snake's current head.
///
/// Wall and self hits are equally fatal; when both apply the wall is reported.
#[must_use]
pub fn detect_death(snake: &Snake, bounds: GridSize) -> Option<DeathReason> {
    let head = snake.head();
    let wall = hits_wall(head, bounds);
    let own_body = hits_self(head, snake.body_excluding_head());

    if wall {
        Some(DeathReason::WallCollision)
    } else if own_body {
        Some(DeathReason::SelfCollision)
    } else {
        None
    }
}
