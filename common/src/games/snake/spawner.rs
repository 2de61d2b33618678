//! Random item and obstacle placement.
//!
//! Placement is rejection sampling with a bounded number of attempts. It is
//! best effort: an item falls back to the last sampled cell, an obstacle that
//! finds no free cell is skipped.

use std::collections::HashSet;

use crate::games::SessionRng;
use crate::log;
use super::items::ItemKind;
use super::snake::Snake;
use super::types::Point;

/// Maps a uniform draw in `[0, 1)` onto the catalog.
pub fn choose_item_kind(draw: f64) -> ItemKind {
    let mut cumulative_chance = 0.0;
    for kind in ItemKind::CATALOG {
        cumulative_chance += kind.chance();
        if draw <= cumulative_chance {
            return kind;
        }
    }
    ItemKind::Normal
}

pub fn random_item_kind(rng: &mut SessionRng) -> ItemKind {
    choose_item_kind(rng.chance_draw())
}

fn random_cell(rng: &mut SessionRng, tile_count: i32) -> Point {
    let x = rng.coordinate(tile_count);
    let y = rng.coordinate(tile_count);
    Point::new(x, y)
}

pub fn place_item(
    rng: &mut SessionRng,
    tile_count: i32,
    snake: &Snake,
    obstacles: Option<&HashSet<Point>>,
    max_attempts: u32,
) -> Point {
    let mut candidate = random_cell(rng, tile_count);
    for _ in 1..max_attempts {
        let blocked = snake.contains(&candidate)
            || obstacles.is_some_and(|obstacles| obstacles.contains(&candidate));
        if !blocked {
            return candidate;
        }
        candidate = random_cell(rng, tile_count);
    }

    let blocked = snake.contains(&candidate)
        || obstacles.is_some_and(|obstacles| obstacles.contains(&candidate));
    if blocked {
        log!(
            "No free cell for item after {} attempts, using ({}, {})",
            max_attempts,
            candidate.x,
            candidate.y
        );
    }
    candidate
}

pub fn place_obstacles(
    rng: &mut SessionRng,
    tile_count: i32,
    count: u32,
    snake: &Snake,
    item: Point,
    max_attempts: u32,
) -> HashSet<Point> {
    let mut obstacles = HashSet::new();
    let mut skipped = 0;

    for _ in 0..count {
        let placed = (0..max_attempts)
            .map(|_| random_cell(rng, tile_count))
            .find(|candidate| {
                !snake.contains(candidate) && *candidate != item && !obstacles.contains(candidate)
            });

        match placed {
            Some(obstacle) => {
                obstacles.insert(obstacle);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log!("Skipped {} of {} obstacles: no free cell found", skipped, count);
    }
    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_cells_except(tile_count: i32, free: &[Point]) -> Vec<Point> {
        let mut cells = Vec::new();
        for y in 0..tile_count {
            for x in 0..tile_count {
                let point = Point::new(x, y);
                if !free.contains(&point) {
                    cells.push(point);
                }
            }
        }
        cells
    }

    #[test]
    fn test_zero_draw_is_normal() {
        assert_eq!(choose_item_kind(0.0), ItemKind::Normal);
    }

    #[test]
    fn test_draws_follow_cumulative_ranges() {
        assert_eq!(choose_item_kind(0.7), ItemKind::Normal);
        assert_eq!(choose_item_kind(0.8), ItemKind::Golden);
        assert_eq!(choose_item_kind(0.9), ItemKind::Speed);
        assert_eq!(choose_item_kind(0.99), ItemKind::Slow);
    }

    #[test]
    fn test_draw_past_total_falls_back_to_normal() {
        assert_eq!(choose_item_kind(1.5), ItemKind::Normal);
    }

    #[test]
    fn test_random_kinds_roughly_match_chances() {
        let mut rng = SessionRng::new(7);
        let normal = (0..10_000)
            .filter(|_| random_item_kind(&mut rng) == ItemKind::Normal)
            .count();
        assert!((6_500..7_500).contains(&normal), "normal count {}", normal);
    }

    #[test]
    fn test_item_avoids_snake_and_obstacles() {
        let free = Point::new(2, 3);
        let mut cells = all_cells_except(5, &[free, Point::new(0, 0)]);
        let obstacle = cells.pop().unwrap();
        let snake = Snake::from_cells(&cells);
        let obstacles = HashSet::from([obstacle, Point::new(0, 0)]);

        let mut rng = SessionRng::new(11);
        let item = place_item(&mut rng, 5, &snake, Some(&obstacles), 10_000);
        assert_eq!(item, free);
    }

    #[test]
    fn test_item_ignores_obstacles_when_none_given() {
        let snake = Snake::from_cells(&all_cells_except(5, &[Point::new(4, 4)]));
        let mut rng = SessionRng::new(3);
        let item = place_item(&mut rng, 5, &snake, None, 10_000);
        assert_eq!(item, Point::new(4, 4));
    }

    #[test]
    fn test_full_grid_accepts_last_candidate() {
        let snake = Snake::from_cells(&all_cells_except(5, &[]));
        let mut rng = SessionRng::new(5);
        let item = place_item(&mut rng, 5, &snake, None, 100);
        assert!(item.is_inside(5));
        assert!(snake.contains(&item));
    }

    #[test]
    fn test_obstacles_are_distinct_and_avoid_snake_and_item() {
        let snake = Snake::from_cells(&[Point::new(10, 10), Point::new(10, 11)]);
        let item = Point::new(3, 3);
        let mut rng = SessionRng::new(42);

        let obstacles = place_obstacles(&mut rng, 20, 6, &snake, item, 50);
        assert_eq!(obstacles.len(), 6);
        assert!(!obstacles.contains(&item));
        assert!(obstacles.iter().all(|o| !snake.contains(o) && o.is_inside(20)));
    }

    #[test]
    fn test_obstacles_without_room_are_skipped() {
        let free = [Point::new(1, 1), Point::new(2, 2)];
        let snake = Snake::from_cells(&all_cells_except(5, &free));
        let mut rng = SessionRng::new(9);

        let obstacles = place_obstacles(&mut rng, 5, 6, &snake, Point::new(2, 2), 500);
        assert_eq!(obstacles, HashSet::from([Point::new(1, 1)]));
    }
}
