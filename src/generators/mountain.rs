//! Mountain ranges (Ground level)

use rand::Rng;

use super::feature::{FeatureGenerator, FeatureParams};
use crate::pipeline::GeneratorLevel;
use crate::terrain::TerrainKind;

pub const NAME: &str = "MountainGenerator";

pub fn mountain_generator<R: Rng + ?Sized>(params: &FeatureParams, rng: &mut R) -> FeatureGenerator {
    FeatureGenerator::new(NAME, TerrainKind::Mountain, GeneratorLevel::Ground, params, rng)
}
