//! Grid coordinates
//!
//! Points are signed so that pattern offsets and out-of-map candidates can be
//! expressed before they are filtered against a grid size.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A cell coordinate (or a relative offset when used inside a pattern).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when the point lies inside a square map of `size` cells per side.
    pub fn is_in(&self, size: usize) -> bool {
        let size = size as i32;
        self.x >= 0 && self.x < size && self.y >= 0 && self.y < size
    }

    /// True when the point is inside the map and touches one of its borders.
    pub fn is_border(&self, size: usize) -> bool {
        let last = size as i32 - 1;
        self.is_in(size) && (self.x == 0 || self.y == 0 || self.x == last || self.y == last)
    }

    /// Strict 4-adjacency. A point is not adjacent to itself.
    pub fn is_adjacent(&self, other: Point) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx + dy == 1
    }

    /// The four unit neighbors, unfiltered.
    pub fn neighbors(&self) -> [Point; 4] {
        [
            Point::new(self.x - 1, self.y),
            Point::new(self.x, self.y + 1),
            Point::new(self.x + 1, self.y),
            Point::new(self.x, self.y - 1),
        ]
    }

    /// Row-major index for a square map. Caller guarantees `is_in(size)`.
    pub fn to_index(&self, size: usize) -> usize {
        self.y as usize * size + self.x as usize
    }

    pub fn from_index(index: usize, size: usize) -> Self {
        Self::new((index % size) as i32, (index / size) as i32)
    }

    /// Manhattan distance.
    pub fn distance(&self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Euclidean distance.
    pub fn real_distance(&self, other: Point) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Which map borders this point lies on, as a bit set (W, E, N, S).
    pub(crate) fn border_mask(&self, size: usize) -> u8 {
        let last = size as i32 - 1;
        let mut mask = 0;
        if self.x == 0 {
            mask |= 1;
        }
        if self.x == last {
            mask |= 2;
        }
        if self.y == 0 {
            mask |= 4;
        }
        if self.y == last {
            mask |= 8;
        }
        mask
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{}}}", self.x, self.y)
    }
}
