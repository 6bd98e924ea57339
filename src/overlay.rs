//! Base + Delta double buffer
//!
//! The pipeline keeps one committed [`Grid`] (the base) for the whole run.
//! Each level writes into a fresh, all-`None` delta through an [`Overlay`];
//! reads see the delta cell once it has been written and the base cell
//! otherwise. Compaction copies written delta cells into the base.
//!
//! Two guards apply to writes:
//! - a delta cell can be written once per level through [`Overlay::set`]
//!   ([`Overlay::set_force`] skips this one);
//! - a base cell the [`CellProtection`] policy protects is never written.

use crate::accessibility::{AccessibilityGrid, AccessibilityParams};
use crate::grid::{self, Grid, Node};
use crate::pattern::Pattern;
use crate::point::Point;
use crate::terrain::TerrainKind;

/// Decides whether a committed base cell may still be overwritten.
pub trait CellProtection {
    fn is_protected(&self, kind: TerrainKind) -> bool;
}

/// Only unset and Plain cells are writable.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultProtection;

impl CellProtection for DefaultProtection {
    fn is_protected(&self, kind: TerrainKind) -> bool {
        !matches!(kind, TerrainKind::None | TerrainKind::Plain)
    }
}

/// Like [`DefaultProtection`], but the region's base ground is also open.
#[derive(Clone, Copy, Debug)]
pub struct OpenGroundProtection {
    pub ground: TerrainKind,
}

impl CellProtection for OpenGroundProtection {
    fn is_protected(&self, kind: TerrainKind) -> bool {
        kind != self.ground && DefaultProtection.is_protected(kind)
    }
}

/// Saved delta contents, used to undo a rejected placement.
#[derive(Clone, Debug)]
pub struct DeltaSnapshot(Grid);

pub struct Overlay {
    base: Grid,
    delta: Grid,
    ground: TerrainKind,
    protection: Box<dyn CellProtection>,
}

impl Overlay {
    /// Overlay over `base` using the default {None, Plain} rule.
    pub fn new(base: Grid) -> Self {
        Self::with_protection(base, TerrainKind::Plain, Box::new(DefaultProtection))
    }

    /// Overlay for a region whose open ground is `ground` (Plain, Desert...).
    pub fn for_ground(base: Grid, ground: TerrainKind) -> Self {
        if ground == TerrainKind::Plain {
            Self::new(base)
        } else {
            Self::with_protection(base, ground, Box::new(OpenGroundProtection { ground }))
        }
    }

    pub fn with_protection(base: Grid, ground: TerrainKind, protection: Box<dyn CellProtection>) -> Self {
        let delta = Grid::new(base.size(), TerrainKind::None);
        Self {
            base,
            delta,
            ground,
            protection,
        }
    }

    pub fn size(&self) -> usize {
        self.base.size()
    }

    /// Kind treated as open ground by generators.
    pub fn ground(&self) -> TerrainKind {
        self.ground
    }

    pub fn base(&self) -> &Grid {
        &self.base
    }

    pub fn delta(&self) -> &Grid {
        &self.delta
    }

    pub fn into_base(self) -> Grid {
        self.base
    }

    /// Discard the current delta and start an empty one.
    pub fn reset_delta(&mut self) {
        self.delta = Grid::new(self.base.size(), TerrainKind::None);
    }

    pub fn snapshot(&self) -> DeltaSnapshot {
        DeltaSnapshot(self.delta.clone())
    }

    pub fn restore(&mut self, snapshot: DeltaSnapshot) {
        self.delta = snapshot.0;
    }

    /// Merged view of a cell: delta if written, base otherwise.
    pub fn get(&self, p: Point) -> Node {
        let written = self.delta.get(p);
        if written.kind == TerrainKind::None {
            *self.base.get(p)
        } else {
            *written
        }
    }

    pub fn kind(&self, p: Point) -> TerrainKind {
        self.get(p).kind
    }

    /// Whether the committed base cell at `p` is protected from writes.
    pub fn is_protected(&self, p: Point) -> bool {
        self.protection.is_protected(self.base.kind(p))
    }

    /// Unprotected cell currently showing open ground (Plain or the region ground).
    pub fn is_open(&self, p: Point) -> bool {
        let kind = self.kind(p);
        !self.is_protected(p) && (kind == TerrainKind::Plain || kind == self.ground)
    }

    /// Guarded write. Returns true if the delta was modified.
    pub fn set(&mut self, node: Node) -> bool {
        if self.delta.kind(node.location) != TerrainKind::None {
            return false;
        }
        self.set_force(node)
    }

    pub fn set_kind(&mut self, p: Point, kind: TerrainKind) -> bool {
        let node = self.get(p).with_kind(kind);
        self.set(node)
    }

    /// Write even if the delta cell was already written this level.
    /// Protected base cells and `None` writes are still refused.
    pub fn set_force(&mut self, node: Node) -> bool {
        if node.kind == TerrainKind::None || self.is_protected(node.location) {
            return false;
        }
        self.delta.set(node);
        true
    }

    pub fn set_force_kind(&mut self, p: Point, kind: TerrainKind) -> bool {
        let node = self.get(p).with_kind(kind);
        self.set_force(node)
    }

    /// Copy every written delta cell into the base.
    pub fn compact(&mut self) -> &Grid {
        for node in self.delta.iter() {
            if node.kind != TerrainKind::None {
                self.base.set(*node);
            }
        }
        &self.base
    }

    /// Base with the delta applied, leaving both untouched.
    pub fn merged(&self) -> Grid {
        let mut merged = self.base.clone();
        for node in self.delta.iter() {
            if node.kind != TerrainKind::None {
                merged.set(*node);
            }
        }
        merged
    }

    pub fn accessibility(&self, params: &AccessibilityParams) -> AccessibilityGrid {
        AccessibilityGrid::analyze_with_ground(&self.merged(), params, self.ground)
    }

    pub fn select_pattern(&self, origin: Point, pattern: &Pattern) -> Vec<Node> {
        pattern
            .apply(origin, self.size())
            .into_iter()
            .map(|p| self.get(p))
            .collect()
    }

    pub fn select_pattern_borders(&self, origin: Point, pattern: &Pattern) -> Vec<Node> {
        pattern
            .apply_borders(origin, self.size())
            .into_iter()
            .map(|p| self.get(p))
            .collect()
    }

    /// Merged view of every border cell.
    pub fn borders(&self) -> Vec<Node> {
        grid::border_points(self.size())
            .into_iter()
            .map(|p| self.get(p))
            .collect()
    }

    pub fn fill_square(&mut self, kind: TerrainKind, dist: usize, center: Point) {
        for p in grid::square_points(center, dist, self.size()) {
            self.set_kind(p, kind);
        }
    }

    pub fn fill_circle(&mut self, kind: TerrainKind, dist: usize, center: Point) {
        for p in grid::points_within_circle(center, dist, self.size()) {
            self.set_kind(p, kind);
        }
    }

    pub fn add_line(&mut self, kind: TerrainKind, from: Point, to: Point, width: i32) {
        for p in grid::line_points(from, to, width, self.size()) {
            self.set_kind(p, kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_base() -> Grid {
        let mut base = Grid::new(10, TerrainKind::Plain);
        base.set_kind(Point::new(2, 2), TerrainKind::Mountain);
        base.set_kind(Point::new(7, 0), TerrainKind::Sea);
        base
    }

    #[test]
    fn test_get_falls_back_to_base() {
        let mut overlay = Overlay::new(sample_base());
        assert_eq!(overlay.kind(Point::new(2, 2)), TerrainKind::Mountain);
        assert_eq!(overlay.kind(Point::new(4, 4)), TerrainKind::Plain);
        overlay.set_kind(Point::new(4, 4), TerrainKind::Forest);
        assert_eq!(overlay.kind(Point::new(4, 4)), TerrainKind::Forest);
        assert_eq!(overlay.base().kind(Point::new(4, 4)), TerrainKind::Plain);
    }

    #[test]
    fn test_set_writes_once_per_level() {
        let mut overlay = Overlay::new(sample_base());
        let p = Point::new(5, 5);
        assert!(overlay.set_kind(p, TerrainKind::Forest));
        assert!(!overlay.set_kind(p, TerrainKind::Sea));
        assert_eq!(overlay.kind(p), TerrainKind::Forest);
        assert!(overlay.set_force_kind(p, TerrainKind::Sea));
        assert_eq!(overlay.kind(p), TerrainKind::Sea);
    }

    #[test]
    fn test_set_never_touches_protected_base() {
        for kind in TerrainKind::all_ground() {
            let mut base = Grid::new(5, TerrainKind::Plain);
            base.set_kind(Point::new(1, 1), *kind);
            let mut overlay = Overlay::new(base);
            overlay.set_kind(Point::new(1, 1), TerrainKind::River);
            overlay.set_force_kind(Point::new(1, 1), TerrainKind::Desert);
            overlay.compact();
            let committed = overlay.base().kind(Point::new(1, 1));
            if *kind == TerrainKind::Plain {
                assert_eq!(committed, TerrainKind::Desert);
            } else {
                assert_eq!(committed, *kind);
            }
        }
    }

    #[test]
    fn test_set_force_refuses_none() {
        let mut overlay = Overlay::new(sample_base());
        assert!(!overlay.set_force_kind(Point::new(3, 3), TerrainKind::None));
        assert_eq!(overlay.delta().kind(Point::new(3, 3)), TerrainKind::None);
    }

    #[test]
    fn test_compact_is_idempotent() {
        let mut overlay = Overlay::new(sample_base());
        overlay.fill_circle(TerrainKind::Forest, 2, Point::new(5, 5));
        let once = overlay.compact().clone();
        let twice = overlay.compact().clone();
        assert_eq!(once, twice);
        assert_eq!(once.kind(Point::new(2, 2)), TerrainKind::Mountain);
        assert_eq!(once.kind(Point::new(5, 5)), TerrainKind::Forest);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut overlay = Overlay::new(sample_base());
        overlay.set_kind(Point::new(0, 0), TerrainKind::Forest);
        let snapshot = overlay.snapshot();
        overlay.fill_square(TerrainKind::Sea, 2, Point::new(5, 5));
        assert_eq!(overlay.kind(Point::new(5, 5)), TerrainKind::Sea);
        overlay.restore(snapshot);
        assert_eq!(overlay.kind(Point::new(5, 5)), TerrainKind::Plain);
        assert_eq!(overlay.kind(Point::new(0, 0)), TerrainKind::Forest);
    }

    #[test]
    fn test_open_ground_protection() {
        let base = Grid::new(6, TerrainKind::Desert);
        let mut overlay = Overlay::for_ground(base, TerrainKind::Desert);
        assert!(overlay.is_open(Point::new(3, 3)));
        assert!(overlay.set_kind(Point::new(3, 3), TerrainKind::Mountain));
        overlay.compact();
        overlay.reset_delta();
        assert!(overlay.is_protected(Point::new(3, 3)));
        assert!(!overlay.set_kind(Point::new(3, 3), TerrainKind::Forest));
    }

    #[test]
    fn test_borders_cover_edges() {
        let overlay = Overlay::new(sample_base());
        let borders = overlay.borders();
        assert_eq!(borders.len(), 36);
        assert!(borders.iter().any(|n| n.kind == TerrainKind::Sea));
    }

    #[test]
    fn test_select_pattern_borders_keeps_edge_cells() {
        let overlay = Overlay::new(sample_base());
        let selected = overlay.select_pattern_borders(Point::new(7, 1), &Pattern::adjacent());
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].location, Point::new(7, 0));
        assert_eq!(selected[0].kind, TerrainKind::Sea);
        assert_eq!(overlay.select_pattern(Point::new(7, 1), &Pattern::adjacent()).len(), 4);
    }
}
