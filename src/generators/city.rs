//! City placement (Structure level)
//!
//! The map is visited in sectors every `spacing` cells. Each sector center
//! gets a few random tries inside the square around it; a try succeeds on an
//! accessible open cell away from the map border and from earlier cities.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::overlay::Overlay;
use crate::pipeline::{GenContext, GeneratorLevel, MapGenerator};
use crate::point::Point;
use crate::range::IntRange;
use crate::terrain::TerrainKind;

pub const NAME: &str = "CityGenerator";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityParams {
    /// Cities per 10 cells of map side, lower bound
    pub density_min: i32,
    /// Upper density bound, rolled at construction
    pub density_max: IntRange,
    /// Distance between sector centers
    pub spacing: usize,
    /// Random offsets tried per sector
    pub tries: usize,
    /// Half-size of the square offsets are drawn from
    pub jitter: usize,
    /// No two cities within this Manhattan distance
    pub exclusion: usize,
    /// Cells kept free along every border
    pub border_margin: usize,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            density_min: 1,
            density_max: IntRange::new(3, 5),
            spacing: 5,
            tries: 3,
            jitter: 2,
            exclusion: 3,
            border_margin: 2,
        }
    }
}

pub struct CityGenerator {
    density: IntRange,
    params: CityParams,
}

impl CityGenerator {
    pub fn new<R: Rng + ?Sized>(params: &CityParams, rng: &mut R) -> Self {
        let density = IntRange::new(params.density_min, params.density_max.roll(rng));
        Self::with_density(density, params.clone())
    }

    pub fn with_density(density: IntRange, params: CityParams) -> Self {
        Self { density, params }
    }

    pub fn density(&self) -> IntRange {
        self.density
    }

    fn away_from_border(&self, p: Point, size: usize) -> bool {
        let margin = self.params.border_margin as i32;
        let size = size as i32;
        p.x >= margin && p.y >= margin && p.x < size - margin && p.y < size - margin
    }
}

impl MapGenerator for CityGenerator {
    fn name(&self) -> &str {
        NAME
    }

    fn level(&self) -> GeneratorLevel {
        GeneratorLevel::Structure
    }

    fn generate(&self, overlay: &mut Overlay, ctx: &mut GenContext<'_>) -> Result<()> {
        let density = self.density.roll(ctx.rng).max(0) as usize;
        let size = overlay.size();
        let quota = (size / 10) * density;
        log::info!(
            "{}: density {}, size {} => up to {} cities",
            NAME,
            density,
            size,
            quota
        );
        if quota == 0 || self.params.spacing == 0 {
            return Ok(());
        }

        let access = overlay.accessibility(ctx.accessibility);
        let square = ctx.patterns.square(self.params.jitter);
        let refuse = ctx.patterns.adjacent_diamond(self.params.exclusion);
        let mut excluded = vec![false; size * size];
        let mut placed = 0;

        'sectors: for row in (self.params.spacing..size).step_by(self.params.spacing) {
            for col in (self.params.spacing..size).step_by(self.params.spacing) {
                let center = Point::new(col as i32, row as i32);
                for _ in 0..self.params.tries {
                    let offset = square.offsets()[ctx.rng.gen_range(0..square.len())];
                    let candidate = center + offset;
                    if !candidate.is_in(size)
                        || excluded[candidate.to_index(size)]
                        || !self.away_from_border(candidate, size)
                        || !access.is_accessible(candidate)
                        || !overlay.is_open(candidate)
                    {
                        continue;
                    }
                    if !overlay.set_kind(candidate, TerrainKind::CityNode) {
                        continue;
                    }
                    for p in refuse.apply(candidate, size) {
                        excluded[p.to_index(size)] = true;
                    }
                    log::debug!("{}: city at {}", NAME, candidate);
                    placed += 1;
                    if placed >= quota {
                        break 'sectors;
                    }
                    break;
                }
            }
        }

        log::info!("{}: placed {} of {} cities", NAME, placed, quota);
        Ok(())
    }
}
