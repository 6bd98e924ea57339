//! Reusable neighborhood shapes
//!
//! A [`Pattern`] is an ordered list of offsets relative to an origin. Shapes
//! that depend on a parameter (radius, target offset) are built once per
//! parameter by a [`PatternLibrary`] and shared afterwards. Patterns never
//! know about a grid: clipping to the map happens in [`Pattern::apply`], so
//! the same cached instance serves every grid size.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::rc::Rc;

use crate::point::Point;

/// The four unit neighbors, in W, S, E, N order.
pub const ADJACENT: [Point; 4] = [
    Point::new(-1, 0),
    Point::new(0, 1),
    Point::new(1, 0),
    Point::new(0, -1),
];

/// Angular step used to sample circle outlines.
const CIRCLE_STEP: f64 = 0.2;

/// Immutable ordered list of relative points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    offsets: Vec<Point>,
}

impl Pattern {
    pub fn new(offsets: Vec<Point>) -> Self {
        Self { offsets }
    }

    pub fn adjacent() -> Self {
        Self::new(ADJACENT.to_vec())
    }

    pub fn offsets(&self) -> &[Point] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.offsets.iter()
    }

    /// Translate the pattern to `origin`, dropping points outside `[0, size)`.
    pub fn apply(&self, origin: Point, size: usize) -> Vec<Point> {
        self.offsets
            .iter()
            .map(|&offset| origin + offset)
            .filter(|p| p.is_in(size))
            .collect()
    }

    /// Like [`apply`](Self::apply) but keeps only points on the map border.
    pub fn apply_borders(&self, origin: Point, size: usize) -> Vec<Point> {
        self.offsets
            .iter()
            .map(|&offset| origin + offset)
            .filter(|p| p.is_border(size))
            .collect()
    }
}

/// Memoized pattern generators.
///
/// Built once per generation run and handed to generators by shared
/// reference. The caches use interior mutability, so a library is confined
/// to one thread, which matches the sequential pipeline.
#[derive(Default)]
pub struct PatternLibrary {
    diamonds: RefCell<HashMap<usize, Rc<Pattern>>>,
    diamond_outlines: RefCell<HashMap<usize, Rc<Pattern>>>,
    squares: RefCell<HashMap<usize, Rc<Pattern>>>,
    square_outlines: RefCell<HashMap<usize, Rc<Pattern>>>,
    circles: RefCell<HashMap<usize, Rc<Pattern>>>,
    lines: RefCell<HashMap<Point, Rc<Pattern>>>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filled diamond of Manhattan radius `dist`, origin included.
    pub fn adjacent_diamond(&self, dist: usize) -> Rc<Pattern> {
        cached(&self.diamonds, dist, || {
            let (filled, _) = expand_diamond(dist);
            Pattern::new(filled)
        })
    }

    /// Cells reached in exactly the last expansion round: the diamond outline.
    pub fn adjacent_outline(&self, dist: usize) -> Rc<Pattern> {
        cached(&self.diamond_outlines, dist, || {
            let (_, frontier) = expand_diamond(dist);
            Pattern::new(frontier)
        })
    }

    /// Filled `(2*dist+1)²` square.
    pub fn square(&self, dist: usize) -> Rc<Pattern> {
        cached(&self.squares, dist, || {
            let d = dist as i32;
            let mut offsets = Vec::with_capacity((2 * dist + 1).pow(2));
            for x in -d..=d {
                for y in -d..=d {
                    offsets.push(Point::new(x, y));
                }
            }
            Pattern::new(offsets)
        })
    }

    /// Border cells of the `(2*dist+1)²` square.
    pub fn square_outline(&self, dist: usize) -> Rc<Pattern> {
        cached(&self.square_outlines, dist, || {
            if dist == 0 {
                return Pattern::new(vec![Point::ORIGIN]);
            }
            let d = dist as i32;
            let mut offsets = Vec::with_capacity(8 * dist);
            for x in -d..=d {
                for y in -d..=d {
                    if x == -d || y == -d || x == d || y == d {
                        offsets.push(Point::new(x, y));
                    }
                }
            }
            Pattern::new(offsets)
        })
    }

    /// Approximate circle outline of radius `size + 1`.
    ///
    /// Sampled every 0.2 radians with coordinates truncated toward zero;
    /// consecutive duplicates are dropped. Not an exact digital circle.
    pub fn circle(&self, size: usize) -> Rc<Pattern> {
        cached(&self.circles, size, || Pattern::new(sample_circle(Point::ORIGIN, (size + 1) as f64)))
    }

    /// Straight line from the origin toward `to`, target excluded.
    ///
    /// Steps along the unit vector and rounds each step to the nearest cell.
    pub fn line(&self, to: Point) -> Rc<Pattern> {
        cached(&self.lines, to, || {
            let dist = (to.x as f64).hypot(to.y as f64);
            if dist == 0.0 {
                return Pattern::new(Vec::new());
            }
            let unit_x = to.x as f64 / dist;
            let unit_y = to.y as f64 / dist;
            let offsets = (0..dist as usize)
                .map(|idx| {
                    Point::new(
                        (unit_x * idx as f64).round() as i32,
                        (unit_y * idx as f64).round() as i32,
                    )
                })
                .collect();
            Pattern::new(offsets)
        })
    }
}

fn cached<K, F>(cache: &RefCell<HashMap<K, Rc<Pattern>>>, key: K, build: F) -> Rc<Pattern>
where
    K: std::hash::Hash + Eq,
    F: FnOnce() -> Pattern,
{
    if let Some(pattern) = cache.borrow().get(&key) {
        return Rc::clone(pattern);
    }
    let pattern = Rc::new(build());
    cache.borrow_mut().insert(key, Rc::clone(&pattern));
    pattern
}

/// Breadth-first 4-neighbor expansion from the origin.
/// Returns (every visited offset, last round's frontier).
fn expand_diamond(dist: usize) -> (Vec<Point>, Vec<Point>) {
    let mut known = HashSet::new();
    known.insert(Point::ORIGIN);
    let mut filled = vec![Point::ORIGIN];
    let mut frontier = vec![Point::ORIGIN];

    for _ in 0..dist {
        let mut round = Vec::new();
        for current in &frontier {
            for step in ADJACENT {
                let candidate = *current + step;
                if known.insert(candidate) {
                    round.push(candidate);
                }
            }
        }
        filled.extend_from_slice(&round);
        frontier = round;
    }

    (filled, frontier)
}

/// Circle outline sampling shared by patterns and feature placement.
pub(crate) fn sample_circle(center: Point, radius: f64) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::new();
    let mut angle = 0.0f64;
    while angle < 2.0 * PI {
        let (s, c) = angle.sin_cos();
        let p = Point::new(center.x + (c * radius) as i32, center.y + (s * radius) as i32);
        if points.last().map_or(true, |last| last.distance(p) != 0) {
            points.push(p);
        }
        angle += CIRCLE_STEP;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_clips_to_map() {
        let lib = PatternLibrary::new();
        let diamond = lib.adjacent_diamond(3);
        for origin in [Point::new(0, 0), Point::new(9, 9), Point::new(1, 8)] {
            for p in diamond.apply(origin, 10) {
                assert!(p.x >= 0 && p.x < 10 && p.y >= 0 && p.y < 10);
            }
        }
        let corner = Pattern::adjacent().apply(Point::new(0, 0), 10);
        assert_eq!(corner.len(), 2);
    }

    #[test]
    fn test_diamond_is_cached() {
        let lib = PatternLibrary::new();
        let a = lib.adjacent_diamond(4);
        let b = lib.adjacent_diamond(4);
        assert!(Rc::ptr_eq(&a, &b));
        assert!(!Rc::ptr_eq(&a, &lib.adjacent_diamond(3)));
    }

    #[test]
    fn test_diamond_shape() {
        let lib = PatternLibrary::new();
        // 2d² + 2d + 1 cells, all within Manhattan radius, no duplicates
        for d in 0..6usize {
            let diamond = lib.adjacent_diamond(d);
            assert_eq!(diamond.len(), 2 * d * d + 2 * d + 1);
            let unique: HashSet<_> = diamond.iter().collect();
            assert_eq!(unique.len(), diamond.len());
            assert!(diamond.iter().all(|p| p.distance(Point::ORIGIN) <= d as i32));
        }
    }

    #[test]
    fn test_outline_is_last_ring() {
        let lib = PatternLibrary::new();
        let outline = lib.adjacent_outline(3);
        assert_eq!(outline.len(), 12);
        assert!(outline.iter().all(|p| p.distance(Point::ORIGIN) == 3));
        assert_eq!(lib.adjacent_outline(0).offsets(), &[Point::ORIGIN]);
    }

    #[test]
    fn test_square_outline() {
        let lib = PatternLibrary::new();
        let outline = lib.square_outline(2);
        assert_eq!(outline.len(), 16);
        assert!(outline.iter().all(|p| p.x.abs() == 2 || p.y.abs() == 2));
        assert_eq!(lib.square(2).len(), 25);
    }

    #[test]
    fn test_circle_has_no_consecutive_duplicates() {
        let lib = PatternLibrary::new();
        let circle = lib.circle(10);
        assert!(!circle.is_empty());
        for pair in circle.offsets().windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        // Truncation toward zero keeps every point within the radius
        assert!(circle.iter().all(|p| Point::ORIGIN.real_distance(*p) <= 11.0));
        assert!(circle.offsets().contains(&Point::new(0, 10)));
    }

    #[test]
    fn test_line_excludes_target() {
        let lib = PatternLibrary::new();
        let line = lib.line(Point::new(0, 5));
        assert_eq!(
            line.offsets(),
            &[
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(0, 2),
                Point::new(0, 3),
                Point::new(0, 4)
            ]
        );
        assert!(lib.line(Point::ORIGIN).is_empty());
        for pair in lib.line(Point::new(7, -3)).offsets().windows(2) {
            assert!((pair[0].x - pair[1].x).abs() <= 1 && (pair[0].y - pair[1].y).abs() <= 1);
        }
    }
}
