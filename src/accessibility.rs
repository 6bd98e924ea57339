//! Reachability analysis over a committed grid
//!
//! Hazardous terrain saturates its surroundings: every hazard cell adds one
//! to each cell of the square around it, in one of two accumulators (wide
//! reach for Forest and Desert, narrow reach for Sea and Mountain). Cells
//! over either threshold are Inaccessible. The remaining cells are grouped
//! into 4-connected components; only the largest one is kept.
//!
//! The grid is *usable* when a single component exists and it covers at
//! least `min_fill_ratio` of the map. An unusable grid answers `false` to
//! every [`AccessibilityGrid::is_accessible`] query.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{self, Grid};
use crate::pattern::Pattern;
use crate::point::Point;
use crate::terrain::TerrainKind;

/// Hazard radii and saturation thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityParams {
    /// Square radius of Forest and Desert hazards
    pub wide_radius: usize,
    /// Square radius of Sea and Mountain hazards
    pub narrow_radius: usize,
    pub wide_threshold: i32,
    pub narrow_threshold: i32,
    /// Minimum share of the map the kept component must cover
    pub min_fill_ratio: f64,
}

impl Default for AccessibilityParams {
    fn default() -> Self {
        Self {
            wide_radius: 3,
            narrow_radius: 1,
            wide_threshold: 46,
            narrow_threshold: 8,
            min_fill_ratio: 0.4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Reach {
    Wide,
    Narrow,
}

fn hazard_reach(kind: TerrainKind) -> Option<Reach> {
    match kind {
        TerrainKind::Forest | TerrainKind::Desert => Some(Reach::Wide),
        TerrainKind::Sea | TerrainKind::Mountain => Some(Reach::Narrow),
        _ => None,
    }
}

/// Per-cell classification plus a scratch integer channel.
///
/// `data` starts as the combined hazard depth. Consumers that need the
/// channel for something else (distance labels, costs) reset it first.
#[derive(Clone, Debug)]
pub struct AccessibilityGrid {
    size: usize,
    cells: Vec<TerrainKind>,
    data: Vec<i32>,
    available: usize,
    components: usize,
    fill_rate: f64,
    usable: bool,
}

impl AccessibilityGrid {
    pub fn analyze(grid: &Grid, params: &AccessibilityParams) -> Self {
        Self::analyze_with_ground(grid, params, TerrainKind::Plain)
    }

    /// Analyze `grid`, treating cells of the region's `ground` kind as open.
    pub fn analyze_with_ground(grid: &Grid, params: &AccessibilityParams, ground: TerrainKind) -> Self {
        let size = grid.size();
        let total = size * size;
        let mut wide = vec![0i32; total];
        let mut narrow = vec![0i32; total];

        for node in grid.iter() {
            if node.kind == ground {
                continue;
            }
            match hazard_reach(node.kind) {
                Some(Reach::Wide) => accumulate(&mut wide, node.location, params.wide_radius, size),
                Some(Reach::Narrow) => accumulate(&mut narrow, node.location, params.narrow_radius, size),
                None => {}
            }
        }

        let mut cells = vec![TerrainKind::Accessible; total];
        let mut data = vec![0i32; total];
        for idx in 0..total {
            data[idx] = wide[idx] + narrow[idx];
            if wide[idx] > params.wide_threshold || narrow[idx] > params.narrow_threshold {
                cells[idx] = TerrainKind::Inaccessible;
            }
        }

        let mut components = find_components(&cells, size);
        components.sort_by_key(|c| std::cmp::Reverse(c.len()));
        let component_count = components.len();
        for minor in components.iter().skip(1) {
            for &idx in minor {
                cells[idx] = TerrainKind::Inaccessible;
            }
        }

        let available = components.first().map_or(0, |c| c.len());
        let share = if total == 0 {
            0.0
        } else {
            available as f64 / total as f64
        };
        let usable = component_count == 1 && share >= params.min_fill_ratio;

        log::debug!(
            "accessibility: {} component(s), kept {} of {} cells, usable={}",
            component_count,
            available,
            total,
            usable
        );

        Self {
            size,
            cells,
            data,
            available,
            components: component_count,
            fill_rate: if usable { share } else { 0.0 },
            usable,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_usable(&self) -> bool {
        self.usable
    }

    /// Share of the map covered by the kept component, 0 when unusable.
    pub fn fill_rate(&self) -> f64 {
        self.fill_rate
    }

    /// Cells in the kept component.
    pub fn available(&self) -> usize {
        self.available
    }

    /// Components found before the minor ones were discarded.
    pub fn component_count(&self) -> usize {
        self.components
    }

    fn index(&self, p: Point) -> usize {
        assert!(
            p.is_in(self.size),
            "AccessibilityGrid: location {} out of bounds for size {}",
            p,
            self.size
        );
        p.to_index(self.size)
    }

    /// Raw classification, regardless of usability.
    pub fn classification(&self, p: Point) -> TerrainKind {
        self.cells[self.index(p)]
    }

    pub fn is_accessible(&self, p: Point) -> bool {
        self.usable && self.classification(p) == TerrainKind::Accessible
    }

    pub fn data(&self, p: Point) -> i32 {
        self.data[self.index(p)]
    }

    pub fn set_data(&mut self, p: Point, value: i32) {
        let idx = self.index(p);
        self.data[idx] = value;
    }

    pub fn add_data(&mut self, p: Point, delta: i32) {
        let idx = self.index(p);
        self.data[idx] += delta;
    }

    /// Overwrite the whole scratch channel.
    pub fn reset_data(&mut self, value: i32) {
        self.data.iter_mut().for_each(|d| *d = value);
    }

    pub fn accessible_cells(&self) -> Vec<Point> {
        (0..self.size * self.size)
            .map(|idx| Point::from_index(idx, self.size))
            .filter(|p| self.is_accessible(*p))
            .collect()
    }

    /// Accessible points covered by `pattern` at `origin`.
    pub fn select_pattern(&self, origin: Point, pattern: &Pattern) -> Vec<Point> {
        pattern
            .apply(origin, self.size)
            .into_iter()
            .filter(|p| self.is_accessible(*p))
            .collect()
    }

    /// Update the data of every accessible point covered by `pattern`.
    pub fn apply<F>(&mut self, origin: Point, pattern: &Pattern, mut f: F)
    where
        F: FnMut(Point, i32) -> i32,
    {
        for p in self.select_pattern(origin, pattern) {
            let idx = p.to_index(self.size);
            self.data[idx] = f(p, self.data[idx]);
        }
    }
}

impl fmt::Display for AccessibilityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.size.max(1);
        for row in self.data.chunks(width) {
            for value in row {
                write!(f, "{:3} ", value)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        for row in self.cells.chunks(width) {
            for kind in row {
                write!(f, "{} ", kind.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn accumulate(depth: &mut [i32], center: Point, radius: usize, size: usize) {
    for p in grid::square_points(center, radius, size) {
        depth[p.to_index(size)] += 1;
    }
}

/// 4-connected components of Accessible cells, as lists of flat indices.
fn find_components(cells: &[TerrainKind], size: usize) -> Vec<Vec<usize>> {
    let mut seen = vec![false; cells.len()];
    let mut components = Vec::new();

    for start in 0..cells.len() {
        if seen[start] || cells[start] != TerrainKind::Accessible {
            continue;
        }
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        let mut members = Vec::new();
        while let Some(idx) = queue.pop_front() {
            members.push(idx);
            for n in Point::from_index(idx, size).neighbors() {
                if !n.is_in(size) {
                    continue;
                }
                let nidx = n.to_index(size);
                if !seen[nidx] && cells[nidx] == TerrainKind::Accessible {
                    seen[nidx] = true;
                    queue.push_back(nidx);
                }
            }
        }
        components.push(members);
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(grid: &Grid) -> AccessibilityGrid {
        AccessibilityGrid::analyze(grid, &AccessibilityParams::default())
    }

    /// Mountain square of radius 5 around (10,10) with a 3x3 Plain pocket.
    fn enclosed_pocket() -> Grid {
        let mut grid = Grid::new(20, TerrainKind::Plain);
        grid.fill_square(TerrainKind::Mountain, 5, Point::new(10, 10));
        grid.fill_square(TerrainKind::Plain, 1, Point::new(10, 10));
        grid
    }

    #[test]
    fn test_lone_mountain_stays_accessible() {
        let mut grid = Grid::new(20, TerrainKind::Plain);
        grid.set_kind(Point::new(10, 10), TerrainKind::Mountain);
        let access = analyze(&grid);
        assert!(access.is_usable());
        assert_eq!(access.available(), 400);
        assert!(grid
            .iter()
            .all(|n| access.classification(n.location) == TerrainKind::Accessible));
    }

    #[test]
    fn test_enclosed_pocket_is_not_usable() {
        let access = analyze(&enclosed_pocket());
        assert!(!access.is_usable());
        assert_eq!(access.fill_rate(), 0.0);
        assert_eq!(access.component_count(), 2);
        assert_eq!(access.classification(Point::new(10, 10)), TerrainKind::Inaccessible);
        assert!(!access.is_accessible(Point::new(0, 0)));
    }

    #[test]
    fn test_gap_restores_usability() {
        let mut grid = enclosed_pocket();
        for y in 12..=15 {
            grid.set_kind(Point::new(10, y), TerrainKind::Plain);
        }
        let access = analyze(&grid);
        assert!(access.is_usable());
        assert_eq!(access.component_count(), 1);
        assert!(access.is_accessible(Point::new(10, 10)));
        // Deep inside the ring stays saturated
        assert!(!access.is_accessible(Point::new(6, 6)));
        assert!(access.fill_rate() > 0.4);
    }

    #[test]
    fn test_forest_saturation_threshold() {
        let mut grid = Grid::new(20, TerrainKind::Plain);
        grid.fill_square(TerrainKind::Forest, 3, Point::new(10, 10));
        let access = analyze(&grid);
        assert_eq!(access.data(Point::new(10, 10)), 49);
        assert_eq!(access.classification(Point::new(10, 10)), TerrainKind::Inaccessible);
        assert!(access.is_usable());

        for x in 7..10 {
            grid.set_kind(Point::new(x, 7), TerrainKind::Plain);
        }
        let access = analyze(&grid);
        assert_eq!(access.data(Point::new(10, 10)), 46);
        assert!(access.is_accessible(Point::new(10, 10)));
    }

    #[test]
    fn test_mountain_saturation_threshold() {
        let mut grid = Grid::new(20, TerrainKind::Plain);
        grid.fill_square(TerrainKind::Mountain, 1, Point::new(10, 10));
        let access = analyze(&grid);
        assert_eq!(access.classification(Point::new(10, 10)), TerrainKind::Inaccessible);

        grid.set_kind(Point::new(11, 11), TerrainKind::Plain);
        let access = analyze(&grid);
        assert!(access.is_accessible(Point::new(10, 10)));
    }

    #[test]
    fn test_river_is_not_a_hazard() {
        let mut grid = Grid::new(10, TerrainKind::Plain);
        grid.fill_square(TerrainKind::River, 2, Point::new(5, 5));
        let access = analyze(&grid);
        assert_eq!(access.available(), 100);
    }

    #[test]
    fn test_small_component_below_fill_ratio() {
        let mut grid = Grid::new(20, TerrainKind::Plain);
        for x in 4..20 {
            for y in 0..20 {
                grid.set_kind(Point::new(x, y), TerrainKind::Sea);
            }
        }
        let access = analyze(&grid);
        assert_eq!(access.component_count(), 1);
        assert!(!access.is_usable());
        assert!(access.accessible_cells().is_empty());
    }

    #[test]
    fn test_open_ground_is_not_a_hazard() {
        let grid = Grid::new(30, TerrainKind::Desert);
        let params = AccessibilityParams::default();
        assert!(!AccessibilityGrid::analyze(&grid, &params).is_usable());
        assert!(AccessibilityGrid::analyze_with_ground(&grid, &params, TerrainKind::Desert).is_usable());
    }

    #[test]
    fn test_apply_touches_accessible_cells_only() {
        let mut grid = Grid::new(10, TerrainKind::Plain);
        grid.fill_square(TerrainKind::Mountain, 1, Point::new(2, 2));
        let mut access = analyze(&grid);
        access.reset_data(0);
        let square = crate::pattern::PatternLibrary::new().square(2);
        access.apply(Point::new(2, 2), &square, |_, d| d + 5);
        assert_eq!(access.data(Point::new(2, 2)), 0);
        assert_eq!(access.data(Point::new(4, 4)), 5);
        assert_eq!(access.data(Point::new(5, 5)), 0);
    }
}
