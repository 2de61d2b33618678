use super::game_state::{GamePhase, GameSnapshot};
use super::movement;
use super::types::{Direction, Mode, Point};

/// Greedy autopilot working from published snapshots.
pub struct BotController;

impl BotController {
    /// Heading to request for the next tick, `None` when no run is live.
    pub fn calculate_move(snapshot: &GameSnapshot) -> Option<Direction> {
        if snapshot.phase != GamePhase::Running {
            return None;
        }
        let head = *snapshot.snake.first()?;
        let tile_count = snapshot.tile_count as i32;
        let target = snapshot.item.position;

        let mut best_dir = None;
        let mut best_distance = i32::MAX;

        for dir in Self::get_valid_directions(snapshot.heading) {
            if let Some(next_pos) = movement::next_head(head, dir, snapshot.mode, tile_count)
                && Self::is_safe_position(next_pos, snapshot)
            {
                let distance = Self::manhattan_distance(next_pos, target, snapshot.mode, tile_count);
                if distance < best_distance {
                    best_distance = distance;
                    best_dir = Some(dir);
                }
            }
        }

        best_dir.or(snapshot.heading)
    }

    /// Turns the axis rule accepts, plus carrying straight on.
    fn get_valid_directions(current: Option<Direction>) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| current.is_none_or(|c| !d.is_opposite(&c)))
            .collect()
    }

    fn manhattan_distance(a: Point, b: Point, mode: Mode, tile_count: i32) -> i32 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();

        if mode.wraps_edges() {
            dx.min(tile_count - dx) + dy.min(tile_count - dy)
        } else {
            dx + dy
        }
    }

    fn is_safe_position(pos: Point, snapshot: &GameSnapshot) -> bool {
        if snapshot.obstacles.contains(&pos) {
            return false;
        }

        let grows = pos == snapshot.item.position;
        let body = match snapshot.snake.split_last() {
            Some((_, without_tail)) if !grows => without_tail,
            _ => snapshot.snake.as_slice(),
        };
        !body.contains(&pos)
    }
}
