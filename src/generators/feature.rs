//! Landscape feature placement shared by mountains, seas, forests and deserts
//!
//! A feature is a chain of filled discs laid from a random start cell toward
//! a random target on the circle of radius `range` around it. Placement is
//! rejected (and the delta restored) when it turns a usable map unusable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::{points_at_distance, points_within_circle};
use crate::overlay::Overlay;
use crate::pipeline::{GenContext, GeneratorLevel, MapGenerator};
use crate::point::Point;
use crate::range::IntRange;
use crate::terrain::TerrainKind;

/// Bounds a feature generator rolls its own ranges from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureParams {
    /// Smallest disc radius
    pub width_min: i32,
    /// Largest disc radius is rolled from this range at construction
    pub width_max: IntRange,
    /// Shortest start-to-target distance
    pub range_min: i32,
    /// Longest start-to-target distance is rolled from this range
    pub range_max: IntRange,
    /// Extra spacing between consecutive discs
    pub disparity: i32,
    /// Placement attempts before giving up
    pub attempts: usize,
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self {
            width_min: 3,
            width_max: IntRange::new(3, 5),
            range_min: 3,
            range_max: IntRange::new(10, 20),
            disparity: 1,
            attempts: 3,
        }
    }
}

pub struct FeatureGenerator {
    name: &'static str,
    kind: TerrainKind,
    level: GeneratorLevel,
    width: IntRange,
    range: IntRange,
    disparity: i32,
    attempts: usize,
    avoid: &'static [TerrainKind],
}

impl FeatureGenerator {
    pub fn new<R: Rng + ?Sized>(
        name: &'static str,
        kind: TerrainKind,
        level: GeneratorLevel,
        params: &FeatureParams,
        rng: &mut R,
    ) -> Self {
        let width = IntRange::new(params.width_min, params.width_max.roll(rng));
        let range = IntRange::new(params.range_min, params.range_max.roll(rng));
        Self::with_ranges(name, kind, level, width, range, params.disparity, params.attempts)
    }

    pub fn with_ranges(
        name: &'static str,
        kind: TerrainKind,
        level: GeneratorLevel,
        width: IntRange,
        range: IntRange,
        disparity: i32,
        attempts: usize,
    ) -> Self {
        Self {
            name,
            kind,
            level,
            width,
            range,
            disparity,
            attempts,
            avoid: &[],
        }
    }

    /// Never paint over cells currently showing one of `kinds`.
    pub fn avoiding(mut self, kinds: &'static [TerrainKind]) -> Self {
        self.avoid = kinds;
        self
    }

    pub fn kind(&self) -> TerrainKind {
        self.kind
    }

    pub fn width(&self) -> IntRange {
        self.width
    }

    pub fn range(&self) -> IntRange {
        self.range
    }

    /// Lay discs from `start` toward `target`. Returns the number of cells written.
    fn stamp(&self, overlay: &mut Overlay, start: Point, target: Point, width: i32, range: i32) -> usize {
        let dist = start.real_distance(target);
        if dist == 0.0 {
            return 0;
        }
        let unit_x = (target.x - start.x) as f64 / dist;
        let unit_y = (target.y - start.y) as f64 / dist;
        let size = overlay.size();
        let step = (width + self.disparity).max(1);

        let mut written = 0;
        let mut idx = width - self.disparity;
        while idx < range - (width - self.disparity) {
            let center = Point::new(
                start.x + (unit_x * idx as f64).round() as i32,
                start.y + (unit_y * idx as f64).round() as i32,
            );
            for p in points_within_circle(center, width.max(0) as usize, size) {
                if self.avoid.contains(&overlay.kind(p)) {
                    continue;
                }
                if overlay.set_kind(p, self.kind) {
                    written += 1;
                }
            }
            idx += step;
        }
        written
    }
}

impl MapGenerator for FeatureGenerator {
    fn name(&self) -> &str {
        self.name
    }

    fn level(&self) -> GeneratorLevel {
        self.level
    }

    fn generate(&self, overlay: &mut Overlay, ctx: &mut GenContext<'_>) -> Result<()> {
        let width = self.width.roll(ctx.rng);
        let range = self.range.roll(ctx.rng);
        let size = overlay.size();
        if size == 0 {
            return Ok(());
        }

        for attempt in 1..=self.attempts {
            let start = Point::new(ctx.rng.gen_range(0..size as i32), ctx.rng.gen_range(0..size as i32));
            log::debug!("{}: attempt {} starting at {}", self.name, attempt, start);
            if overlay.is_protected(start) {
                log::debug!("{}: {} already filled, trying elsewhere", self.name, start);
                continue;
            }

            let targets = points_at_distance(start, range.max(0) as usize, size);
            let mut target = None;
            for _ in 0..targets.len() {
                let candidate = targets[ctx.rng.gen_range(0..targets.len())];
                if !overlay.is_protected(candidate) {
                    target = Some(candidate);
                    break;
                }
            }
            let Some(target) = target else {
                log::debug!("{}: no open target around {}", self.name, start);
                continue;
            };

            let usable_before = overlay.accessibility(ctx.accessibility).is_usable();
            let snapshot = overlay.snapshot();
            let written = self.stamp(overlay, start, target, width, range);

            if usable_before && !overlay.accessibility(ctx.accessibility).is_usable() {
                log::debug!("{}: placement {} -> {} cuts the map, reverting", self.name, start, target);
                overlay.restore(snapshot);
                continue;
            }

            log::info!(
                "{}: added {} cells (width {}, range {}) from {} to {}",
                self.name,
                written,
                width,
                range,
                start,
                target
            );
            return Ok(());
        }

        log::warn!(
            "{}: failed to place feature (width {}, range {}) after {} attempts",
            self.name,
            width,
            range,
            self.attempts
        );
        Ok(())
    }
}
