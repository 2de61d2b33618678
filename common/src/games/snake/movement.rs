use std::collections::HashSet;

use super::snake::Snake;
use super::types::{DeathReason, Direction, Mode, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No committed heading yet; nothing moved.
    Stayed,
    Moved { grew: bool },
    /// The chain is left exactly as it was before the step.
    Terminal(DeathReason),
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Terminal(_))
    }
}

/// Next head cell, or `None` when it leaves a walled grid.
pub fn next_head(head: Point, direction: Direction, mode: Mode, tile_count: i32) -> Option<Point> {
    let next = head.offset(direction);
    if mode.wraps_edges() {
        Some(next.wrapped(tile_count))
    } else if next.is_inside(tile_count) {
        Some(next)
    } else {
        None
    }
}

/// Moves the chain one cell along `heading`.
///
/// A heading pointing back into the neck is not special-cased: it lands on a
/// body cell and ends the run like any other bite.
pub fn advance(
    snake: &mut Snake,
    heading: Option<Direction>,
    mode: Mode,
    tile_count: i32,
    obstacles: &HashSet<Point>,
    item_position: Point,
) -> StepOutcome {
    let Some(direction) = heading else {
        return StepOutcome::Stayed;
    };

    let Some(head) = next_head(snake.head(), direction, mode, tile_count) else {
        return StepOutcome::Terminal(DeathReason::WallCollision);
    };

    let grows = head == item_position;
    if snake.would_bite(head, grows) {
        return StepOutcome::Terminal(DeathReason::SelfCollision);
    }
    if mode.has_obstacles() && obstacles.contains(&head) {
        return StepOutcome::Terminal(DeathReason::ObstacleCollision);
    }

    snake.advance(head, grows);
    StepOutcome::Moved { grew: grows }
}
