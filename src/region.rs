//! Region templates
//!
//! A template names the generators a region may draw from (with relative
//! frequencies), how many draws to make, the map size range and the base
//! ground. Building a template rolls all of that into a ready [`Region`].

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerationConfig;
use crate::error::{MapGenError, Result};
use crate::generators::GeneratorKind;
use crate::grid::Grid;
use crate::pipeline::Pipeline;
use crate::range::IntRange;
use crate::terrain::TerrainKind;

#[derive(Clone, Debug, PartialEq)]
pub struct RegionTemplate {
    pub name: &'static str,
    pub ground: TerrainKind,
    /// Number of random generator draws
    pub usable: IntRange,
    pub size: IntRange,
    /// Generator families with their draw weight
    pub available: Vec<(GeneratorKind, u32)>,
    /// Always added, after the random draws
    pub forced: Vec<GeneratorKind>,
}

impl RegionTemplate {
    pub const NAMES: [&'static str; 4] = ["Elvenwood", "Highlands", "Lakeland", "Scorchinglands"];

    pub fn all() -> Vec<RegionTemplate> {
        Self::NAMES.iter().filter_map(|name| Self::named(name).ok()).collect()
    }

    pub fn named(name: &str) -> Result<RegionTemplate> {
        use GeneratorKind::*;

        let (name, ground, usable, available) = match name {
            "Elvenwood" => (
                "Elvenwood",
                TerrainKind::Plain,
                IntRange::new(3, 5),
                vec![(Forest, 5), (Mountain, 2), (River, 1)],
            ),
            "Highlands" => (
                "Highlands",
                TerrainKind::Plain,
                IntRange::new(3, 5),
                vec![(Forest, 2), (Mountain, 3), (River, 1)],
            ),
            "Lakeland" => (
                "Lakeland",
                TerrainKind::Plain,
                IntRange::new(3, 5),
                vec![(Forest, 2), (Mountain, 1), (Sea, 1), (River, 3)],
            ),
            "Scorchinglands" => (
                "Scorchinglands",
                TerrainKind::Desert,
                IntRange::new(1, 2),
                vec![(Forest, 1), (Mountain, 3)],
            ),
            _ => return Err(MapGenError::UnknownRegion(name.to_string())),
        };

        Ok(RegionTemplate {
            name,
            ground,
            usable,
            size: IntRange::new(30, 50),
            available,
            forced: vec![City],
        })
    }

    /// Roll size and generator roster. `size` overrides the rolled size.
    pub fn build<R: Rng + ?Sized>(
        &self,
        config: &GenerationConfig,
        size: Option<usize>,
        rng: &mut R,
    ) -> Result<Region> {
        config.validate()?;
        let size = match size {
            Some(0) => return Err(MapGenError::InvalidConfig("region size must be positive".into())),
            Some(size) => size,
            None => self.size.roll(rng).max(1) as usize,
        };

        let pool: Vec<GeneratorKind> = self
            .available
            .iter()
            .flat_map(|&(kind, weight)| std::iter::repeat(kind).take(weight as usize))
            .collect();

        let mut pipeline = Pipeline::new()
            .with_ground(self.ground)
            .with_accessibility(config.accessibility.clone());
        let mut roster = Vec::new();

        if !pool.is_empty() {
            let draws = self.usable.roll(rng).max(0);
            for _ in 0..draws {
                let kind = pool[rng.gen_range(0..pool.len())];
                pipeline.add(kind.build(config, rng));
                roster.push(kind);
            }
        }
        for kind in &self.forced {
            pipeline.add(kind.build(config, rng));
            roster.push(*kind);
        }

        log::info!(
            "region {}: size {}, ground {}, {} generator(s)",
            self.name,
            size,
            self.ground,
            roster.len()
        );

        Ok(Region {
            name: self.name,
            size,
            ground: self.ground,
            roster,
            pipeline,
        })
    }
}

/// A rolled region, ready to generate.
pub struct Region {
    pub name: &'static str,
    pub size: usize,
    pub ground: TerrainKind,
    /// Generators drawn for this region, in draw order
    pub roster: Vec<GeneratorKind>,
    pub pipeline: Pipeline,
}

impl Region {
    pub fn generate(&self, rng: &mut ChaCha8Rng) -> Result<Grid> {
        self.pipeline.generate(Grid::new(self.size, self.ground), rng)
    }
}
