use std::collections::{HashSet, VecDeque};

use super::types::Point;

/// Head-first chain of cells with an occupancy index.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    pub fn new(start_pos: Point) -> Self {
        Self {
            body: VecDeque::from([start_pos]),
            body_set: HashSet::from([start_pos]),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_cells(cells: &[Point]) -> Self {
        Self {
            body: cells.iter().copied().collect(),
            body_set: cells.iter().copied().collect(),
        }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.body_set.contains(point)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    /// Whether `next_head` lands on the body as it will be after this move.
    /// The tail cell is vacated unless the chain grows.
    pub fn would_bite(&self, next_head: Point, grows: bool) -> bool {
        self.body_set.contains(&next_head) && (grows || next_head != self.tail())
    }

    pub fn advance(&mut self, next_head: Point, grows: bool) {
        if !grows {
            let tail = self.body.pop_back().expect("Snake body should never be empty");
            self.body_set.remove(&tail);
        }
        self.body.push_front(next_head);
        self.body_set.insert(next_head);
    }
}
