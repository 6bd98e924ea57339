//! Concrete map generators

pub mod city;
pub mod desert;
pub mod feature;
pub mod forest;
pub mod mountain;
pub mod river;
pub mod sea;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::pipeline::MapGenerator;

pub use city::{CityGenerator, CityParams};
pub use feature::{FeatureGenerator, FeatureParams};
pub use river::{RiverGenerator, RiverParams};

/// Generator families a region template can draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    Mountain,
    Sea,
    Forest,
    Desert,
    River,
    City,
}

impl GeneratorKind {
    /// Build a fresh generator, rolling its ranges from `config`.
    pub fn build<R: Rng + ?Sized>(&self, config: &GenerationConfig, rng: &mut R) -> Box<dyn MapGenerator> {
        match self {
            GeneratorKind::Mountain => Box::new(mountain::mountain_generator(&config.mountain, rng)),
            GeneratorKind::Sea => Box::new(sea::sea_generator(&config.sea, rng)),
            GeneratorKind::Forest => Box::new(forest::forest_generator(&config.forest, rng)),
            GeneratorKind::Desert => Box::new(desert::desert_generator(&config.desert, rng)),
            GeneratorKind::River => Box::new(RiverGenerator::new(&config.river, rng)),
            GeneratorKind::City => Box::new(CityGenerator::new(&config.city, rng)),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorKind::Mountain => mountain::NAME,
            GeneratorKind::Sea => sea::NAME,
            GeneratorKind::Forest => forest::NAME,
            GeneratorKind::Desert => desert::NAME,
            GeneratorKind::River => river::NAME,
            GeneratorKind::City => city::NAME,
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::GeneratorLevel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_built_generators_match_their_kind() {
        let config = GenerationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let expected = [
            (GeneratorKind::Mountain, GeneratorLevel::Ground),
            (GeneratorKind::Sea, GeneratorLevel::Ground),
            (GeneratorKind::Forest, GeneratorLevel::Landscape),
            (GeneratorKind::Desert, GeneratorLevel::Landscape),
            (GeneratorKind::River, GeneratorLevel::River),
            (GeneratorKind::City, GeneratorLevel::Structure),
        ];
        for (kind, level) in expected {
            let generator = kind.build(&config, &mut rng);
            assert_eq!(generator.level(), level);
            assert_eq!(generator.name(), kind.to_string());
        }
    }
}
