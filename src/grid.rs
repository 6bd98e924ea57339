//! Dense square terrain grid
//!
//! Cells are stored row-major (`y * size + x`). Unlike a wrapping world
//! tilemap, a region grid has hard edges: every coordinate outside
//! `[0, size)` is a caller bug and panics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pattern::{sample_circle, Pattern};
use crate::point::Point;
use crate::terrain::TerrainKind;

/// A single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    pub location: Point,
    pub kind: TerrainKind,
}

impl Node {
    pub fn new(id: usize, location: Point, kind: TerrainKind) -> Self {
        Self { id, location, kind }
    }

    /// Copy of this node carrying another terrain kind.
    pub fn with_kind(&self, kind: TerrainKind) -> Self {
        Self { kind, ..*self }
    }
}

/// Square grid of `size * size` nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    nodes: Vec<Node>,
}

impl Grid {
    /// Create a grid with every cell set to `base`.
    pub fn new(size: usize, base: TerrainKind) -> Self {
        let nodes = (0..size * size)
            .map(|idx| Node::new(idx, Point::from_index(idx, size), base))
            .collect();
        Self { size, nodes }
    }

    /// Rebuild a grid from already laid-out nodes (persistence path).
    /// Returns `None` when the node count does not match `size²`, when
    /// `size` does not fit `i32` coordinates, or when a location is off the map.
    pub fn from_nodes(size: usize, mut nodes: Vec<Node>) -> Option<Self> {
        if size > i32::MAX as usize || size.checked_mul(size)? != nodes.len() {
            return None;
        }
        if nodes.iter().any(|n| !n.location.is_in(size)) {
            return None;
        }
        nodes.sort_by_key(|n| n.location.to_index(size));
        for (idx, node) in nodes.iter_mut().enumerate() {
            if node.location != Point::from_index(idx, size) {
                return None;
            }
            node.id = idx;
        }
        Some(Self { size, nodes })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn contains(&self, p: Point) -> bool {
        p.is_in(self.size)
    }

    fn index(&self, p: Point) -> usize {
        assert!(
            p.is_in(self.size),
            "Grid: location {} out of bounds for size {}",
            p,
            self.size
        );
        p.to_index(self.size)
    }

    pub fn get(&self, p: Point) -> &Node {
        &self.nodes[self.index(p)]
    }

    pub fn get_mut(&mut self, p: Point) -> &mut Node {
        let idx = self.index(p);
        &mut self.nodes[idx]
    }

    pub fn get_xy(&self, x: i32, y: i32) -> &Node {
        self.get(Point::new(x, y))
    }

    pub fn kind(&self, p: Point) -> TerrainKind {
        self.get(p).kind
    }

    pub fn set_kind(&mut self, p: Point, kind: TerrainKind) {
        self.get_mut(p).kind = kind;
    }

    /// Overwrite the node at `node.location`, keeping the grid's own id.
    pub fn set(&mut self, node: Node) {
        let slot = self.get_mut(node.location);
        slot.kind = node.kind;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn count(&self, kind: TerrainKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// Nodes covered by `pattern` translated to `origin`.
    pub fn select_pattern(&self, origin: Point, pattern: &Pattern) -> Vec<&Node> {
        pattern
            .apply(origin, self.size)
            .into_iter()
            .map(|p| self.get(p))
            .collect()
    }

    /// Nodes covered by `pattern` that satisfy `predicate`.
    pub fn select_pattern_if<F>(&self, origin: Point, pattern: &Pattern, predicate: F) -> Vec<&Node>
    where
        F: Fn(&Node) -> bool,
    {
        self.select_pattern(origin, pattern)
            .into_iter()
            .filter(|n| predicate(n))
            .collect()
    }

    /// Every border location, each listed once.
    pub fn border_points(&self) -> Vec<Point> {
        border_points(self.size)
    }

    /// Paint a `(2*dist+1)²` square centered on `center`, clipped to the map.
    pub fn fill_square(&mut self, kind: TerrainKind, dist: usize, center: Point) {
        for p in square_points(center, dist, self.size) {
            self.set_kind(p, kind);
        }
    }

    /// Paint a filled disc centered on `center`.
    pub fn fill_circle(&mut self, kind: TerrainKind, dist: usize, center: Point) {
        for p in points_within_circle(center, dist, self.size) {
            self.set_kind(p, kind);
        }
    }

    /// Paint a line of half-width `width` from `from` toward `to`.
    pub fn add_line(&mut self, kind: TerrainKind, from: Point, to: Point, width: i32) {
        for p in line_points(from, to, width, self.size) {
            self.set_kind(p, kind);
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.nodes.chunks(self.size.max(1)) {
            for node in row {
                write!(f, "{} ", node.kind.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub(crate) fn border_points(size: usize) -> Vec<Point> {
    let last = size as i32 - 1;
    (0..size * size)
        .map(|idx| Point::from_index(idx, size))
        .filter(|p| p.x == 0 || p.y == 0 || p.x == last || p.y == last)
        .collect()
}

pub(crate) fn square_points(center: Point, dist: usize, size: usize) -> Vec<Point> {
    let d = dist as i32;
    let mut points = Vec::new();
    for x in (center.x - d).max(0)..(center.x + d + 1).min(size as i32) {
        for y in (center.y - d).max(0)..(center.y + d + 1).min(size as i32) {
            points.push(Point::new(x, y));
        }
    }
    points
}

/// Cells whose rounded Euclidean distance to `center` is at most `dist`.
pub fn points_within_circle(center: Point, dist: usize, size: usize) -> Vec<Point> {
    let d = dist as i32;
    let mut points = Vec::new();
    for x in (center.x - d).max(0)..=(center.x + d).min(size as i32 - 1) {
        for y in (center.y - d).max(0)..=(center.y + d).min(size as i32 - 1) {
            let p = Point::new(x, y);
            if center.real_distance(p).round() as i32 <= d {
                points.push(p);
            }
        }
    }
    points
}

/// Approximate circle outline of radius `dist` around `origin`, clipped to the map.
pub fn points_at_distance(origin: Point, dist: usize, size: usize) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::new();
    for p in sample_circle(origin, dist as f64) {
        if p.is_in(size) && points.last() != Some(&p) {
            points.push(p);
        }
    }
    points
}

pub(crate) fn line_points(from: Point, to: Point, width: i32, size: usize) -> Vec<Point> {
    let dist = from.real_distance(to);
    if dist == 0.0 {
        return Vec::new();
    }
    let unit_x = (to.x - from.x) as f64 / dist;
    let unit_y = (to.y - from.y) as f64 / dist;

    let mut points = Vec::new();
    for idx in 0..dist as usize {
        let step = Point::new(
            from.x + (unit_x * idx as f64).round() as i32,
            from.y + (unit_y * idx as f64).round() as i32,
        );
        points.push(step);

        // Perpendicular spread
        let local = step.real_distance(to);
        let perp_x = -((to.y - step.y) as f64 / local);
        let perp_y = (to.x - step.x) as f64 / local;
        for w in -width..width {
            points.push(Point::new(
                step.x + (perp_x * w as f64).round() as i32,
                step.y + (perp_y * w as f64).round() as i32,
            ));
        }
    }
    points.retain(|p| p.is_in(size));
    points.dedup();
    points
}
