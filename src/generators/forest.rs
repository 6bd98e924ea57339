//! Forests (Landscape level). Forests never grow over rivers.

use rand::Rng;

use super::feature::{FeatureGenerator, FeatureParams};
use crate::pipeline::GeneratorLevel;
use crate::terrain::TerrainKind;

pub const NAME: &str = "ForestGenerator";

pub fn forest_generator<R: Rng + ?Sized>(params: &FeatureParams, rng: &mut R) -> FeatureGenerator {
    FeatureGenerator::new(NAME, TerrainKind::Forest, GeneratorLevel::Landscape, params, rng)
        .avoiding(&[TerrainKind::River])
}
