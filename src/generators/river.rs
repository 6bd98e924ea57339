//! River path synthesis (River level)
//!
//! A river runs from a Plain cell next to a mountain (or, failing that, next
//! to the map border) to a sea cell or a border cell lying on the circle of
//! radius `length` around it. The path follows a distance field grown from
//! the terminus, with `directness` extra steps the walk may spend wandering.

use std::collections::{BTreeSet, HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::accessibility::AccessibilityGrid;
use crate::error::{MapGenError, Result};
use crate::overlay::Overlay;
use crate::pipeline::{GenContext, GeneratorLevel, MapGenerator};
use crate::point::Point;
use crate::range::IntRange;
use crate::terrain::TerrainKind;

pub const NAME: &str = "RiverGenerator";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverParams {
    pub length_min: i32,
    /// Upper length bound, rolled at construction
    pub length_max: IntRange,
    pub directness_min: i32,
    /// Upper directness bound, rolled at construction
    pub directness_max: IntRange,
    pub attempts: usize,
}

impl Default for RiverParams {
    fn default() -> Self {
        Self {
            length_min: 6,
            length_max: IntRange::new(10, 20),
            directness_min: 3,
            directness_max: IntRange::new(3, 10),
            attempts: 3,
        }
    }
}

pub struct RiverGenerator {
    length: IntRange,
    directness: IntRange,
    attempts: usize,
}

/// Candidate (origin, terminus) pairs, split by preference.
#[derive(Default)]
struct Candidates {
    to_sea: BTreeSet<(Point, Point)>,
    to_border: BTreeSet<(Point, Point)>,
}

impl Candidates {
    fn is_empty(&self) -> bool {
        self.to_sea.is_empty() && self.to_border.is_empty()
    }

    /// Sea termini win over border termini.
    fn into_pairs(self) -> Vec<(Point, Point)> {
        if self.to_sea.is_empty() {
            self.to_border.into_iter().collect()
        } else {
            self.to_sea.into_iter().collect()
        }
    }
}

impl RiverGenerator {
    pub fn new<R: Rng + ?Sized>(params: &RiverParams, rng: &mut R) -> Self {
        let length = IntRange::new(params.length_min, params.length_max.roll(rng));
        let directness = IntRange::new(params.directness_min, params.directness_max.roll(rng));
        Self::with_ranges(length, directness, params.attempts)
    }

    pub fn with_ranges(length: IntRange, directness: IntRange, attempts: usize) -> Self {
        Self {
            length,
            directness,
            attempts,
        }
    }

    pub fn length(&self) -> IntRange {
        self.length
    }

    pub fn directness(&self) -> IntRange {
        self.directness
    }

    /// Find a river path without writing it.
    ///
    /// Returns the ordered chain of cells from origin to terminus (a Sea
    /// terminus is left out), or `None` when every attempt failed.
    pub fn synthesize(&self, overlay: &Overlay, ctx: &mut GenContext<'_>) -> Result<Option<Vec<Point>>> {
        let length = self.length.roll(ctx.rng).max(1);
        let directness = self.directness.roll(ctx.rng).max(0);

        let mut pairs = self.search_pairs(overlay, ctx, length as usize);
        if pairs.is_empty() {
            log::info!("{}: no origin/terminus pair for length {}", NAME, length);
            return Ok(None);
        }
        log::debug!("{}: {} candidate pair(s), length {}, directness {}", NAME, pairs.len(), length, directness);

        let mut access = overlay.accessibility(ctx.accessibility);
        for attempt in 1..=self.attempts {
            if ctx.is_cancelled() {
                return Err(MapGenError::Cancelled(GeneratorLevel::River));
            }
            if pairs.is_empty() {
                log::debug!("{}: every candidate pair failed", NAME);
                break;
            }
            // A failed pair is never drawn again
            let (origin, terminus) = pairs.swap_remove(ctx.rng.gen_range(0..pairs.len()));
            log::debug!("{}: attempt {} from {} to {}", NAME, attempt, origin, terminus);

            distance_field(overlay, &mut access, terminus);
            if let Some(mut chain) = walk(overlay, &access, origin, terminus, directness, ctx.rng) {
                if overlay.kind(terminus) == TerrainKind::Sea {
                    chain.pop();
                }
                return Ok(Some(chain));
            }
            log::debug!("{}: walk from {} hit a dead end", NAME, origin);
        }

        log::warn!("{}: gave up after {} attempts", NAME, self.attempts);
        Ok(None)
    }

    fn search_pairs(&self, overlay: &Overlay, ctx: &GenContext<'_>, length: usize) -> Vec<(Point, Point)> {
        let mountain_seeds: Vec<Point> = overlay
            .merged()
            .iter()
            .filter(|n| n.kind == TerrainKind::Mountain)
            .map(|n| n.location)
            .collect();
        let from_mountains = self.collect_pairs(overlay, ctx, &mountain_seeds, length);
        if !from_mountains.is_empty() {
            return from_mountains.into_pairs();
        }

        let border_seeds: Vec<Point> = overlay
            .borders()
            .into_iter()
            .filter(|n| overlay.is_open(n.location))
            .map(|n| n.location)
            .collect();
        log::debug!("{}: no mountain source, trying {} border seeds", NAME, border_seeds.len());
        self.collect_pairs(overlay, ctx, &border_seeds, length).into_pairs()
    }

    fn collect_pairs(&self, overlay: &Overlay, ctx: &GenContext<'_>, seeds: &[Point], length: usize) -> Candidates {
        let size = overlay.size();
        let circle = ctx.patterns.circle(length);
        let mut candidates = Candidates::default();

        for &seed in seeds {
            let seed_borders = seed.border_mask(size);
            for origin in seed.neighbors() {
                if !origin.is_in(size) || !overlay.is_open(origin) {
                    continue;
                }
                for terminus in circle.apply(origin, size) {
                    let to_sea = overlay.kind(terminus) == TerrainKind::Sea;
                    let to_border = terminus.is_border(size) && overlay.is_open(terminus);
                    if !to_sea && !to_border {
                        continue;
                    }
                    if seed_borders & terminus.border_mask(size) != 0 {
                        continue;
                    }
                    let line = ctx.patterns.line(terminus - origin);
                    if line.apply(origin, size).into_iter().any(|p| overlay.is_protected(p)) {
                        continue;
                    }
                    if to_sea {
                        candidates.to_sea.insert((origin, terminus));
                    } else {
                        candidates.to_border.insert((origin, terminus));
                    }
                }
            }
        }

        candidates
    }
}

/// Label every reachable open cell with its ring distance from `terminus`.
/// Unreached cells keep -1.
fn distance_field(overlay: &Overlay, access: &mut AccessibilityGrid, terminus: Point) {
    let size = overlay.size();
    access.reset_data(-1);
    access.set_data(terminus, 0);

    let mut queue = VecDeque::from([terminus]);
    while let Some(current) = queue.pop_front() {
        let label = access.data(current);
        for next in current.neighbors() {
            if !next.is_in(size) || access.data(next) != -1 {
                continue;
            }
            if access.is_accessible(next) && overlay.is_open(next) {
                access.set_data(next, label + 1);
                queue.push_back(next);
            }
        }
    }
}

/// Greedy randomized descent of the distance field.
fn walk<R: Rng + ?Sized>(
    overlay: &Overlay,
    access: &AccessibilityGrid,
    origin: Point,
    terminus: Point,
    directness: i32,
    rng: &mut R,
) -> Option<Vec<Point>> {
    let size = overlay.size();
    let origin_label = access.data(origin);
    if origin_label < 0 {
        return None;
    }

    let mut remaining = origin_label + directness;
    let mut visited = HashSet::from([origin]);
    let mut chain = vec![origin];
    let mut current = origin;

    while current != terminus {
        let label = access.data(current);
        let mut options: Vec<(Point, i32)> = current
            .neighbors()
            .into_iter()
            .filter(|p| p.is_in(size) && !visited.contains(p))
            .filter(|p| *p == terminus || overlay.is_open(*p))
            .map(|p| (p, access.data(p)))
            .filter(|(_, l)| *l >= 0)
            .collect();
        options.shuffle(rng);

        let wander = |&(_, l): &(Point, i32)| l >= label && l < remaining;
        let slack = remaining - label;
        let mut next = None;
        if slack > 0 && rng.gen_bool(slack as f64 / remaining as f64) {
            next = options.iter().copied().find(wander);
        }
        if next.is_none() {
            next = options.iter().copied().find(|&(_, l)| l < label);
        }
        if next.is_none() {
            next = options.iter().copied().find(wander);
        }

        let (step, _) = next?;
        visited.insert(step);
        chain.push(step);
        remaining -= 1;
        current = step;
    }

    Some(chain)
}

impl MapGenerator for RiverGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn level(&self) -> GeneratorLevel {
        GeneratorLevel::River
    }

    fn generate(&self, overlay: &mut Overlay, ctx: &mut GenContext<'_>) -> Result<()> {
        let Some(chain) = self.synthesize(overlay, ctx)? else {
            return Ok(());
        };
        for p in &chain {
            overlay.set_force_kind(*p, TerrainKind::River);
        }
        log::info!(
            "{}: added river of {} cells from {} to {}",
            NAME,
            chain.len(),
            chain.first().copied().unwrap_or_default(),
            chain.last().copied().unwrap_or_default()
        );
        Ok(())
    }
}
