//! Desert patches (Landscape level)

use rand::Rng;

use super::feature::{FeatureGenerator, FeatureParams};
use crate::pipeline::GeneratorLevel;
use crate::terrain::TerrainKind;

pub const NAME: &str = "DesertGenerator";

pub fn desert_generator<R: Rng + ?Sized>(params: &FeatureParams, rng: &mut R) -> FeatureGenerator {
    FeatureGenerator::new(NAME, TerrainKind::Desert, GeneratorLevel::Landscape, params, rng)
}
